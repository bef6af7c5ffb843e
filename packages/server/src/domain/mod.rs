//! Domain layer: chat events, display names and the message log contract.

mod entry;
mod message_log;
mod name;
mod session;

pub use entry::LogEntry;
pub use message_log::MessageLog;
#[cfg(test)]
pub use message_log::MockMessageLog;
pub use name::DisplayName;
pub use session::Session;
