//! Interactive line client for the Irori chat server.

pub mod error;
pub mod formatter;
pub mod input;
pub mod runner;
pub mod session;
pub mod ui;

pub use runner::run_client;
