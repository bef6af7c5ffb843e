//! Infrastructure layer: concrete implementations of domain contracts.

pub mod message_log;

pub use message_log::InMemoryMessageLog;
