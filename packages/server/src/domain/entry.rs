//! Chat event stored in the message log.

use std::fmt;

use irori_shared::protocol::{SERVER_NAME, format_chat_line};

/// One immutable chat event: who said it and what was said.
///
/// Entries are addressed by their zero-based position in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    sender: String,
    content: String,
}

impl LogEntry {
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
        }
    }

    /// Create an announcement authored by the server.
    pub fn from_server(content: impl Into<String>) -> Self {
        Self::new(SERVER_NAME, content)
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Wire representation: `"<sender>: <content>"`.
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_chat_line(&self.sender, &self.content))
    }
}
