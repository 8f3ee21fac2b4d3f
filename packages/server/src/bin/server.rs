//! Multiplayer lobby server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin lobby-server -- --port 8080
//! ```

use clap::Parser;
use lobby_server::ServerConfig;
use lobby_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    // Run the server
    if let Err(e) = lobby_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
