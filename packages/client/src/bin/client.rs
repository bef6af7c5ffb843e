//! Line chat client.
//!
//! Connects to the chat server, announces a display name and sends every line
//! typed at the prompt. Automatically reconnects on connection loss (max 5
//! attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-client -- --name alice
//! cargo run --bin irori-client -- -n bob -a 127.0.0.1:6969
//! ```

use clap::Parser;

use irori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "irori-client")]
#[command(about = "Line chat client", long_about = None)]
struct Args {
    /// Display name shown next to your messages
    #[arg(short = 'n', long)]
    name: String,

    /// Chat server address
    #[arg(short = 'a', long, default_value = "127.0.0.1:6969")]
    addr: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = irori_client::run_client(args.addr, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
