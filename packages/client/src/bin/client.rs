//! Watch-party CLI client.
//!
//! Joins a room on the sync server, keeps a simulated player in step with the
//! room and sends local play/pause/seek commands to the other viewers.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin syncvia-client -- --room movie --name alice
//! cargo run --bin syncvia-client -- -r movie -n bob -u ws://127.0.0.1:5000/ws
//! ```

use clap::Parser;

use syncvia_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "syncvia-client")]
#[command(about = "Watch-party client with drift correction and echo suppression", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:5000/ws")]
    url: String,

    /// Room to join
    #[arg(short = 'r', long)]
    room: String,

    /// Display name shown to the other participants
    #[arg(short = 'n', long, default_value = "anonymous")]
    name: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = syncvia_client::run_client(args.url, args.room, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
