//! Watchroom CLI client.
//!
//! Joins a room as host or viewer over WebSocket. The host drives playback
//! with `/play`, `/pause`, `/seek` and `/url`; viewers follow the host's
//! position. Every other line is sent as a chat message. Reconnects
//! automatically on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin watchroom-client -- --room movie-night --role host --name alice
//! cargo run --bin watchroom-client -- --room movie-night --role viewer --name bob
//! ```

use clap::Parser;

use watchroom_client::{SessionConfig, domain::ClientRole, run_client};
use watchroom_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "watchroom-client")]
#[command(about = "Watch-party CLI client that joins a room as host or viewer", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:4000/ws")]
    url: String,

    /// Room to join (created on first join)
    #[arg(short = 'r', long)]
    room: String,

    /// Role to join with
    #[arg(long, value_enum, default_value_t = ClientRole::Viewer)]
    role: ClientRole,

    /// Display name shown to the other members
    #[arg(short = 'n', long, default_value = "anonymous")]
    name: String,

    /// Optional external user id attached to chat messages
    #[arg(long)]
    user_id: Option<String>,

    /// Video URL announced to the room (host only)
    #[arg(long)]
    video_url: Option<String>,

    /// Log level
    #[arg(long, env = "WATCHROOM_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = SessionConfig {
        url: args.url,
        room_id: args.room,
        role: args.role,
        display_name: args.name,
        user_id: args.user_id,
        video_url: args.video_url,
    };

    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
