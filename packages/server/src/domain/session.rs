//! Per-connection chat session.

use super::DisplayName;

/// Server-side state of one connected client.
///
/// `cursor` is the index of the next log entry this client has not been sent
/// yet. Only the session's writer advances it, one entry at a time, so it is
/// non-decreasing and never passes the log length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    name: DisplayName,
    cursor: usize,
}

impl Session {
    pub fn new(name: DisplayName, cursor: usize) -> Self {
        Self { name, cursor }
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Mark the entry at the current cursor as delivered.
    pub fn advance(&mut self) {
        self.cursor += 1;
    }
}
