//! Shared pieces of the Irori line chat: wire protocol, logging and time helpers.

pub mod logger;
pub mod protocol;
pub mod time;
