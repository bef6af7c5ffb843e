//! Line protocol spoken between the chat server and its clients.
//!
//! Every frame is a single UTF-8 line terminated by `\n`. The first line a
//! client sends is its display name; every later line is one chat message.
//! The server answers with `"<sender>: <content>"` lines.

use thiserror::Error;

/// Sender name used for announcements authored by the server itself.
pub const SERVER_NAME: &str = "SERVER";

/// Line sent to every connected client when the server shuts down.
pub const FAREWELL_LINE: &str = "SERVER: Server is shutting down. Goodbye!";

/// Line terminator appended to every outbound frame.
pub const LINE_TERMINATOR: &str = "\n";

/// Reasons a requested display name is refused during the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Name cannot be empty")]
    Empty,

    #[error("Name '{}' is reserved", SERVER_NAME)]
    Reserved,
}

impl NameError {
    /// The single line sent to the client before the connection is closed.
    pub fn rejection_line(&self) -> String {
        format!("{}: {}", SERVER_NAME, self)
    }
}

/// Normalize and validate a requested display name.
///
/// Leading and trailing whitespace (including line terminators) is stripped
/// before the checks run.
pub fn validate_display_name(raw: &str) -> Result<&str, NameError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name == SERVER_NAME {
        return Err(NameError::Reserved);
    }
    Ok(name)
}

/// Line sent to a client whose name has been accepted.
pub fn welcome_line(name: &str) -> String {
    format!("{}: Welcome to the chat, {}!", SERVER_NAME, name)
}

/// Announcement content appended to the log when a client joins.
pub fn joined_announcement(name: &str) -> String {
    format!("{} has joined the chat", name)
}

/// Announcement content appended to the log when a client leaves.
pub fn left_announcement(name: &str) -> String {
    format!("{} has left the chat", name)
}

/// Render a chat event the way it travels on the wire (without terminator).
pub fn format_chat_line(sender: &str, content: &str) -> String {
    format!("{}: {}", sender, content)
}

/// Whether a line received from the server was authored by the server.
pub fn is_server_line(line: &str) -> bool {
    line.strip_prefix(SERVER_NAME)
        .is_some_and(|rest| rest.starts_with(": "))
}
