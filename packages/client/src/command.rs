//! Commands of the interactive client.

use std::path::PathBuf;

use pilgrim_sync_server::Channel;
use thiserror::Error;

use crate::domain::SyncMessage;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace a local collection and publish it
    Publish(SyncMessage),
    /// Publish a collection read from a JSON file
    Load { channel: Channel, path: PathBuf },
    Show(Channel),
    Status,
    Reconnect,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("Missing {0}")]
    MissingArgument(&'static str),

    #[error("Unknown collection '{0}', expected pilgrims, groups or users")]
    UnknownChannel(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

pub const HELP: &str = "\
commands:
  pilgrims <json>         replace and publish the pilgrims collection
  groups <json>           replace and publish the groups collection
  users <json>            replace and publish the users collection
  load <collection> <file> publish a collection from a JSON file
  show <collection>       print the local collection
  status                  connection state and collection sizes
  reconnect               drop the connection and start over
  quit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "" => Err(CommandError::Empty),
            "pilgrims" | "groups" | "users" => {
                let channel = parse_channel(word)?;
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("JSON payload"));
                }
                let data: serde_json::Value = serde_json::from_str(rest)
                    .map_err(|e| CommandError::InvalidPayload(e.to_string()))?;
                parse_payload(channel, data).map(Command::Publish)
            }
            "load" => {
                let (name, path) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::MissingArgument("collection and file"))?;
                Ok(Command::Load {
                    channel: parse_channel(name)?,
                    path: PathBuf::from(path.trim()),
                })
            }
            "show" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("collection"));
                }
                parse_channel(rest).map(Command::Show)
            }
            "status" => Ok(Command::Status),
            "reconnect" => Ok(Command::Reconnect),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Accepts the short collection name or the wire channel name
pub fn parse_channel(name: &str) -> Result<Channel, CommandError> {
    match name {
        "pilgrims" => Ok(Channel::PilgrimsUpdate),
        "groups" => Ok(Channel::GroupsUpdate),
        "users" => Ok(Channel::UsersUpdate),
        other => Channel::from_name(other).ok_or_else(|| CommandError::UnknownChannel(other.to_string())),
    }
}

/// Decode a bare JSON payload for `channel`
pub fn parse_payload(channel: Channel, data: serde_json::Value) -> Result<SyncMessage, CommandError> {
    SyncMessage::from_payload(channel, data).map_err(|e| CommandError::InvalidPayload(e.to_string()))
}
