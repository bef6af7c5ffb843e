//! Network-facing layer: acceptor, connection supervisor and per-session loops.

mod connection;
mod line_reader;
mod reader;
mod server;
mod signal;
pub mod state;
mod writer;

pub use connection::{ConnectionId, handle_connection};
pub use server::Server;
pub use signal::shutdown_signal;
