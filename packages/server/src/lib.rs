//! WebSocket broadcast relay for the pilgrim sync protocol.
//!
//! Every text frame received from one peer is validated as a Message Frame
//! and forwarded unchanged to every other open connection. Half-open
//! connections are reaped by a periodic ping/pong liveness sweep.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::{ServerArgs, ServerConfig};
pub use error::ServerError;
pub use infrastructure::dto::websocket::{Channel, MessageFrame};
pub use ui::{RelayServer, run};
