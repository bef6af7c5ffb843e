//! Line-oriented TCP chat server.
//!
//! Clients send their display name as the first line, then one chat message
//! per line. Every participant receives everyone's messages plus server
//! announcements.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-server
//! cargo run --bin irori-server -- --host 0.0.0.0 --port 7000
//! ```

use std::time::Duration;

use clap::Parser;
use irori_server::{Server, ServerConfig, ui::shutdown_signal};
use irori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "irori-server")]
#[command(about = "TCP chat server broadcasting every line to every participant", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "6969")]
    port: u16,

    /// Inactivity ceiling for a single client read, in seconds
    #[arg(long, default_value = "300")]
    read_timeout_secs: u64,

    /// Deadline for writing one line to a client, in milliseconds
    #[arg(long, default_value = "10000")]
    write_timeout_ms: u64,

    /// How often each client's writer checks for new messages, in milliseconds
    #[arg(long, default_value = "100")]
    poll_interval_ms: u64,

    /// Time allowed for farewells after a shutdown signal, in milliseconds
    #[arg(long, default_value = "2000")]
    grace_ms: u64,

    /// How long a connection lingers after its farewell, in milliseconds
    #[arg(long, default_value = "250")]
    farewell_hold_ms: u64,

    /// Maximum bytes taken from a client per read
    #[arg(long, default_value = "512")]
    buffer_size: usize,

    /// Log real peer addresses instead of [REDACTED]
    #[arg(long)]
    show_peer_addresses: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            read_timeout: Duration::from_secs(args.read_timeout_secs),
            write_timeout: Duration::from_millis(args.write_timeout_ms),
            poll_interval: Duration::from_millis(args.poll_interval_ms),
            shutdown_grace: Duration::from_millis(args.grace_ms),
            farewell_hold: Duration::from_millis(args.farewell_hold_ms),
            read_buffer_size: args.buffer_size,
            redact_peer_addresses: !args.show_peer_addresses,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::from(Args::parse());

    let server = match Server::bind(config).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Server startup failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run(shutdown_signal()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
