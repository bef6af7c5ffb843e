//! Server configuration.

use std::time::Duration;

use crate::error::ServerError;

/// Tunables of the chat server.
///
/// The binary fills this from command-line arguments; tests build it directly.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to bind to (`0` picks an ephemeral port)
    pub port: u16,

    /// Inactivity ceiling for a single read; expiring is not a disconnect
    pub read_timeout: Duration,

    /// Deadline for writing one line to a client
    pub write_timeout: Duration,

    /// How often each writer checks the log for new entries
    pub poll_interval: Duration,

    /// How long the server waits for farewells after shutdown is triggered
    pub shutdown_grace: Duration,

    /// How long a connection lingers after its farewell line so it can flush
    pub farewell_hold: Duration,

    /// Upper bound on bytes taken from the socket per read
    pub read_buffer_size: usize,

    /// Log `[REDACTED]` instead of peer addresses
    pub redact_peer_addresses: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6969,
            read_timeout: Duration::from_secs(300),
            write_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(100),
            shutdown_grace: Duration::from_secs(2),
            farewell_hold: Duration::from_millis(250),
            read_buffer_size: 512,
            redact_peer_addresses: true,
        }
    }
}

impl ServerConfig {
    /// `host:port` string used for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check that the values can drive a running server.
    pub fn validate(&self) -> Result<(), ServerError> {
        let durations = [
            ("read_timeout", self.read_timeout),
            ("write_timeout", self.write_timeout),
            ("poll_interval", self.poll_interval),
        ];
        if let Some((field, _)) = durations.iter().find(|(_, value)| value.is_zero()) {
            return Err(ServerError::InvalidConfig(format!(
                "{} must be greater than zero",
                field
            )));
        }
        if self.read_buffer_size == 0 {
            return Err(ServerError::InvalidConfig(
                "read_buffer_size must be greater than zero".to_string(),
            ));
        }
        if self.farewell_hold > self.shutdown_grace {
            return Err(ServerError::InvalidConfig(format!(
                "farewell_hold ({:?}) must not exceed shutdown_grace ({:?})",
                self.farewell_hold, self.shutdown_grace
            )));
        }
        Ok(())
    }
}
