//! Client execution logic with reconnection support.

use std::time::Duration;

use irori_shared::protocol::validate_display_name;

use super::{
    error::ClientError, formatter::MessageFormatter, input::spawn_input_thread,
    session::run_client_session,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the chat client with reconnection logic
///
/// The name is checked locally before any connection is made. Rejections
/// and server shutdown end the client; lost connections are retried.
pub async fn run_client(addr: String, name: String) -> Result<(), ClientError> {
    let name = validate_display_name(&name)?.to_string();
    let mut input_rx = spawn_input_thread(format!("{}> ", name));
    let formatter = MessageFormatter::default();
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            addr,
            name,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&addr, &name, &mut input_rx, &formatter).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(ClientError::ServerShutdown) => {
                tracing::info!("Server closed the chat");
                return Ok(());
            }
            Err(e @ (ClientError::NameRejected(_) | ClientError::InvalidName(_))) => {
                return Err(e);
            }
            Err(e) => {
                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if reconnect_count >= MAX_RECONNECT_ATTEMPTS {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}
