//! Typed sync client for the pilgrim sync relay.
//!
//! [`SyncClient`] keeps a connection to the relay with linear reconnect
//! backoff, decodes every inbound frame once into a [`SyncMessage`] and
//! dispatches it to the handlers registered for its channel.
//! [`CollectionSync`] binds one local collection to its channel.

pub mod client;
pub mod collection;
pub mod command;
pub mod config;
pub mod domain;
pub mod endpoint;
pub mod reconnect;
pub mod subscription;
pub mod transport;

#[cfg(test)]
mod test_helpers;

pub use client::{ConnectionState, SyncClient};
pub use collection::CollectionSync;
pub use config::{ClientArgs, ClientConfig};
pub use domain::{Group, MessageError, Pilgrim, SyncMessage, SyncedRecord, User};
pub use endpoint::relay_url;
pub use pilgrim_sync_server::Channel;
pub use reconnect::ReconnectPolicy;
pub use subscription::Handler;
