//! Typed Message Frames.
//!
//! A frame is decoded once, at the boundary, into [`SyncMessage`]; handlers
//! only ever see the typed value.

use pilgrim_sync_server::Channel;
use serde::{Deserialize, Serialize};

use super::{
    error::MessageError,
    record::{Group, Pilgrim, User},
};

/// One update on one channel. The payload is always the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SyncMessage {
    PilgrimsUpdate(Vec<Pilgrim>),
    GroupsUpdate(Vec<Group>),
    UsersUpdate(Vec<User>),
}

impl SyncMessage {
    pub fn channel(&self) -> Channel {
        match self {
            SyncMessage::PilgrimsUpdate(_) => Channel::PilgrimsUpdate,
            SyncMessage::GroupsUpdate(_) => Channel::GroupsUpdate,
            SyncMessage::UsersUpdate(_) => Channel::UsersUpdate,
        }
    }

    /// Number of records carried
    pub fn len(&self) -> usize {
        match self {
            SyncMessage::PilgrimsUpdate(items) => items.len(),
            SyncMessage::GroupsUpdate(items) => items.len(),
            SyncMessage::UsersUpdate(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn decode(raw: &str) -> Result<Self, MessageError> {
        serde_json::from_str(raw).map_err(|e| MessageError::Decode(e.to_string()))
    }

    pub fn encode(&self) -> Result<String, MessageError> {
        serde_json::to_string(self).map_err(|e| MessageError::Encode(e.to_string()))
    }

    /// Build a message from a channel and a bare JSON payload
    pub fn from_payload(channel: Channel, data: serde_json::Value) -> Result<Self, MessageError> {
        let frame = serde_json::json!({ "type": channel.as_str(), "data": data });
        serde_json::from_value(frame).map_err(|e| MessageError::Decode(e.to_string()))
    }
}
