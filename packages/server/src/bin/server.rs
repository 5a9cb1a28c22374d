//! WebSocket broadcast relay server.
//!
//! Relays pilgrim, group and user updates between all connected clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin pilgrim-sync-server -- --port 3001
//! ```

use clap::Parser;
use pilgrim_sync_server::{ServerArgs, ServerConfig};
use pilgrim_sync_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = ServerArgs::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the server
    if let Err(e) = pilgrim_sync_server::run(ServerConfig::from(&args)).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
