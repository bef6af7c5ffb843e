//! Message formatting utilities for client display.

use irori_shared::{
    protocol::is_server_line,
    time::{Clock, SystemClock, format_clock_time},
};

/// Message formatter for client display
pub struct MessageFormatter {
    clock: Box<dyn Clock>,
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl MessageFormatter {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
        }
    }

    /// Format a line received from the server
    ///
    /// Lines are prefixed with the local receive time; server announcements
    /// are additionally marked with `*`.
    pub fn format_incoming(&self, line: &str) -> String {
        let received_at = format_clock_time(&self.clock.now());
        if is_server_line(line) {
            format!("[{}] * {}", received_at, line)
        } else {
            format!("[{}] {}", received_at, line)
        }
    }
}
