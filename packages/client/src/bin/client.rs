//! Interactive client for the pilgrim sync relay.
//!
//! Prints every update received from other peers and publishes collections
//! typed at the prompt or loaded from JSON files.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin pilgrim-sync-client -- --url ws://127.0.0.1:3001/ws
//! ```

use std::{sync::Arc, thread};

use clap::Parser;
use pilgrim_sync_client::{
    Channel, ClientArgs, ClientConfig, CollectionSync, Group, Pilgrim, SyncClient, SyncMessage,
    User,
    command::{Command, CommandError, HELP, parse_payload},
    endpoint::EndpointError,
};
use pilgrim_sync_shared::logger::setup_logger;
use rustyline::{DefaultEditor, error::ReadlineError};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedSender};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error("Failed to start line editor: {0}")]
    Editor(#[from] ReadlineError),
}

struct Collections {
    pilgrims: CollectionSync<Pilgrim>,
    groups: CollectionSync<Group>,
    users: CollectionSync<User>,
}

#[tokio::main]
async fn main() {
    let args = ClientArgs::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if let Err(e) = run(&args).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: &ClientArgs) -> Result<(), CliError> {
    let config = ClientConfig::try_from(args)?;
    let editor = DefaultEditor::new()?;

    let client = Arc::new(SyncClient::new(config.url.as_str(), config.policy));
    let collections = Collections {
        pilgrims: CollectionSync::with_on_change(client.clone(), |items: &[Pilgrim]| {
            println!("<< pilgrims_update: {} record(s)", items.len());
        }),
        groups: CollectionSync::with_on_change(client.clone(), |items: &[Group]| {
            println!("<< groups_update: {} record(s)", items.len());
        }),
        users: CollectionSync::with_on_change(client.clone(), |items: &[User]| {
            println!("<< users_update: {} record(s)", items.len());
        }),
    };

    client.connect();
    println!("Relay: {} (type 'help' for commands)", client.url());

    // rustyline blocks, so it gets its own thread
    let (line_tx, mut line_rx) = mpsc::unbounded_channel();
    thread::spawn(move || read_lines(editor, line_tx));

    while let Some(line) = line_rx.recv().await {
        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => execute(command, &client, &collections).await,
            Err(CommandError::Empty) => {}
            Err(e) => println!("error: {}", e),
        }
    }

    client.close();
    Ok(())
}

fn read_lines(mut editor: DefaultEditor, lines: UnboundedSender<String>) {
    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                let quit = matches!(line.trim(), "quit" | "exit");
                if lines.send(line).is_err() || quit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                let _ = lines.send("quit".to_string());
                break;
            }
            Err(e) => {
                tracing::error!("Failed to read line: {}", e);
                let _ = lines.send("quit".to_string());
                break;
            }
        }
    }
}

async fn execute(command: Command, client: &SyncClient, collections: &Collections) {
    match command {
        Command::Publish(message) => publish(message, collections),
        Command::Load { channel, path } => {
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    println!("error: failed to read {}: {}", path.display(), e);
                    return;
                }
            };
            let message = serde_json::from_str(&content)
                .map_err(|e| CommandError::InvalidPayload(e.to_string()))
                .and_then(|data| parse_payload(channel, data));
            match message {
                Ok(message) => publish(message, collections),
                Err(e) => println!("error: {}", e),
            }
        }
        Command::Show(channel) => show(channel, collections),
        Command::Status => println!(
            "{} ({}): {} pilgrims, {} groups, {} users",
            client.state(),
            client.url(),
            collections.pilgrims.len(),
            collections.groups.len(),
            collections.users.len()
        ),
        Command::Reconnect => {
            client.close();
            client.connect();
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
}

fn publish(message: SyncMessage, collections: &Collections) {
    let channel = message.channel();
    let count = message.len();
    let sent = match message {
        SyncMessage::PilgrimsUpdate(items) => collections.pilgrims.replace(items),
        SyncMessage::GroupsUpdate(items) => collections.groups.replace(items),
        SyncMessage::UsersUpdate(items) => collections.users.replace(items),
    };

    if sent {
        println!(">> {}: {} record(s)", channel, count);
    } else {
        println!("!! not connected, {} kept locally only", channel);
    }
}

fn show(channel: Channel, collections: &Collections) {
    let rendered = match channel {
        Channel::PilgrimsUpdate => serde_json::to_string_pretty(&collections.pilgrims.items()),
        Channel::GroupsUpdate => serde_json::to_string_pretty(&collections.groups.items()),
        Channel::UsersUpdate => serde_json::to_string_pretty(&collections.users.items()),
    };
    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => println!("error: {}", e),
    }
}
