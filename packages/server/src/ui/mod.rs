//! WebSocket relay server: router, handlers and runner.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{RelayServer, run};
pub use signal::shutdown_signal;
