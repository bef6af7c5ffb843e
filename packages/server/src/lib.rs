//! Multi-client TCP chat broadcaster.
//!
//! Clients connect, send a display name, then exchange newline-delimited chat
//! lines. Every chat line and every join/leave announcement is appended to a
//! shared append-only log; each connection runs a reader loop that appends
//! and a writer loop that polls the log and relays what its client has not
//! seen yet.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
pub mod error;
pub mod lifecycle;

pub use config::ServerConfig;
pub use error::{ServerError, SessionError};
pub use ui::Server;
