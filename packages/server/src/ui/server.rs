//! Server execution logic: listener, acceptor and shutdown sequence.

use std::{future::Future, net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;

use crate::{
    config::ServerConfig,
    domain::MessageLog,
    error::ServerError,
    infrastructure::InMemoryMessageLog,
    lifecycle::ShutdownCoordinator,
};

use super::{
    connection::{ConnectionId, handle_connection},
    state::AppState,
};

/// TCP chat server
///
/// # Example
///
/// ```ignore
/// let server = Server::bind(ServerConfig::default()).await?;
/// server.run(shutdown_signal()).await?;
/// ```
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Bind the listening socket with a fresh in-memory log.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for unusable settings, `Bind` if the socket cannot be
    /// created. Both are fatal to the process.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        Self::bind_with_log(config, Arc::new(InMemoryMessageLog::new())).await
    }

    /// Bind the listening socket around an existing log.
    pub async fn bind_with_log(
        config: ServerConfig,
        message_log: Arc<dyn MessageLog>,
    ) -> Result<Self, ServerError> {
        config.validate()?;

        let addr = config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Self {
            listener,
            state: Arc::new(AppState::new(config, message_log)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle that can trigger or observe shutdown from elsewhere.
    pub fn shutdown_handle(&self) -> ShutdownCoordinator {
        self.state.shutdown.clone()
    }

    pub fn message_log(&self) -> Arc<dyn MessageLog> {
        self.state.message_log.clone()
    }

    /// Accept connections until `signal` resolves or shutdown is triggered,
    /// then wait up to the grace period for connections to say goodbye.
    pub async fn run<F>(self, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        let Self { listener, state } = self;

        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        let acceptor = tokio::spawn(accept_loop(listener, state.clone()));

        tokio::select! {
            _ = signal => tracing::info!("Chat server received termination signal"),
            _ = state.shutdown.triggered() => tracing::info!("Chat server shutdown requested"),
        }
        state.shutdown.trigger();

        if let Err(e) = acceptor.await {
            tracing::warn!("Acceptor task failed: {}", e);
        }

        let grace = state.config.shutdown_grace;
        tracing::info!(
            "Waiting up to {:?} for {} connection(s) to close",
            grace,
            state.shutdown.active_connections()
        );
        if !state.shutdown.wait_for_connections(grace).await {
            tracing::warn!(
                "Grace period expired with {} connection(s) still open",
                state.shutdown.active_connections()
            );
        }

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Accept connections and hand each one to its own supervisor task.
///
/// Accept errors are logged and the loop carries on; only shutdown stops it.
/// Dropping the listener on return closes the listening socket.
async fn accept_loop(listener: TcpListener, state: Arc<AppState>) {
    loop {
        let accepted = tokio::select! {
            biased;
            _ = state.shutdown.triggered() => break,
            accepted = listener.accept() => accepted,
        };

        match accepted {
            Ok((stream, peer)) => {
                let conn_id = ConnectionId::generate();
                tracing::info!(
                    "Accepted connection {} from {}",
                    conn_id,
                    peer_label(peer, state.config.redact_peer_addresses)
                );
                state
                    .shutdown
                    .track(handle_connection(stream, conn_id, state.clone()));
            }
            Err(e) => tracing::warn!("{}", ServerError::Accept(e)),
        }
    }

    tracing::info!("Stopped accepting connections");
}

/// Peer address as it may appear in logs.
fn peer_label(peer: SocketAddr, redact: bool) -> String {
    if redact {
        "[REDACTED]".to_string()
    } else {
        peer.to_string()
    }
}
