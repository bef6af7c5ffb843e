//! Connection supervisor.
//!
//! Drives one accepted connection through
//! `ACCEPTED -> AWAITING_NAME -> ACTIVE -> CLOSING -> CLOSED`:
//!
//! - AWAITING_NAME: read the display name; reject blank or reserved names
//!   with a single line, otherwise welcome the client and announce the join.
//! - ACTIVE: run the reader and writer loops until shutdown or disconnect.
//! - CLOSING: on shutdown send the farewell and linger briefly; on disconnect
//!   announce the departure. Both loops are stopped either way.
//! - CLOSED: the stream is released.

use std::{fmt, sync::Arc};

use irori_shared::protocol::{FAREWELL_LINE, LINE_TERMINATOR, welcome_line};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

use crate::{domain::DisplayName, error::SessionError, lifecycle::DisconnectSignal};

use super::{
    line_reader::LineReader,
    reader::reader_loop,
    state::AppState,
    writer::{write_line, writer_loop},
};

/// Random id attached to every log line about one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Result of waiting for the first line.
#[derive(Debug, PartialEq, Eq)]
enum NameOutcome {
    Received(String),
    Closed,
    Shutdown,
}

/// Why an active session is being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseReason {
    Shutdown,
    ClientLeft,
}

/// Supervise one connection from handshake to close.
///
/// Every failure stays inside this connection; nothing is returned.
pub async fn handle_connection<S>(stream: S, conn_id: ConnectionId, state: Arc<AppState>)
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let config = &state.config;
    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut lines = LineReader::new(read_half, config.read_buffer_size, config.read_timeout);

    // AWAITING_NAME
    let raw_name = match await_name(&mut lines, &state, conn_id).await {
        NameOutcome::Received(raw_name) => raw_name,
        NameOutcome::Closed => {
            tracing::info!("Connection {} closed before sending a name", conn_id);
            return;
        }
        NameOutcome::Shutdown => {
            say_farewell(&mut write_half, false, &state, conn_id).await;
            return;
        }
    };

    let name = match accept_name(&raw_name) {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Connection {} rejected: {}", conn_id, e);
            if let Some(notice) = e.client_notice() {
                if let Err(e) = write_line(&mut write_half, &notice, config.write_timeout).await {
                    tracing::debug!("Connection {} could not receive rejection: {}", conn_id, e);
                }
            }
            close_stream(&mut write_half, &state).await;
            return;
        }
    };

    if let Err(e) = write_line(&mut write_half, &welcome_line(name.as_str()), config.write_timeout).await {
        tracing::debug!("Connection {} lost before welcome: {}", conn_id, e);
        return;
    }
    let session = state.join_chat_usecase.execute(name.clone()).await;
    tracing::info!(
        "'{}' joined the chat on connection {} (cursor {})",
        name,
        conn_id,
        session.cursor()
    );

    // ACTIVE
    let stop = state.shutdown.child_token();
    let disconnect = DisconnectSignal::new();
    let reader = tokio::spawn(reader_loop(
        lines,
        name.clone(),
        state.post_message_usecase.clone(),
        stop.clone(),
        disconnect.clone(),
        conn_id,
    ));
    let writer = tokio::spawn(writer_loop(
        write_half,
        session,
        state.message_log.clone(),
        config.poll_interval,
        config.write_timeout,
        stop.clone(),
        disconnect.clone(),
        conn_id,
    ));

    let reason = tokio::select! {
        biased;
        _ = state.shutdown.triggered() => CloseReason::Shutdown,
        _ = disconnect.notified() => CloseReason::ClientLeft,
    };

    // CLOSING
    stop.cancel();
    let exit = match writer.await {
        Ok(exit) => {
            tracing::debug!(
                "Connection {} writer finished at cursor {}",
                conn_id,
                exit.session.cursor()
            );
            Some(exit)
        }
        Err(e) => {
            tracing::warn!("Connection {} writer task failed: {}", conn_id, e);
            None
        }
    };

    match reason {
        CloseReason::Shutdown => {
            if let Some(mut exit) = exit {
                say_farewell(&mut exit.writer, exit.line_cut, &state, conn_id).await;
            }
        }
        CloseReason::ClientLeft => {
            state.leave_chat_usecase.execute(&name).await;
            tracing::info!("'{}' left the chat (connection {})", name, conn_id);
        }
    }

    if let Err(e) = reader.await {
        tracing::warn!("Connection {} reader task failed: {}", conn_id, e);
    }

    // CLOSED
    tracing::info!("Closing connection {}", conn_id);
}

/// Wait for the first line, retrying read timeouts, unless shutdown comes first.
async fn await_name<R>(
    lines: &mut LineReader<R>,
    state: &AppState,
    conn_id: ConnectionId,
) -> NameOutcome
where
    R: AsyncRead + Unpin,
{
    loop {
        let read = tokio::select! {
            biased;
            _ = state.shutdown.triggered() => return NameOutcome::Shutdown,
            read = lines.read_line() => read,
        };

        match read {
            Ok(line) => return NameOutcome::Received(line),
            Err(e) if e.is_transient() => continue,
            Err(e) => {
                tracing::debug!("Connection {} handshake ended: {}", conn_id, e);
                return NameOutcome::Closed;
            }
        }
    }
}

fn accept_name(raw_name: &str) -> Result<DisplayName, SessionError> {
    Ok(DisplayName::parse(raw_name)?)
}

/// Send the shutdown farewell, give it time to flush, then close our side.
///
/// `line_cut` terminates a line the writer left unfinished first. The write
/// never outlasts the shutdown grace period.
async fn say_farewell<W>(writer: &mut W, line_cut: bool, state: &AppState, conn_id: ConnectionId)
where
    W: AsyncWrite + Unpin,
{
    let config = &state.config;
    let farewell = if line_cut {
        format!("{}{}", LINE_TERMINATOR, FAREWELL_LINE)
    } else {
        FAREWELL_LINE.to_string()
    };
    let deadline = config.write_timeout.min(config.shutdown_grace);
    match write_line(writer, &farewell, deadline).await {
        Ok(()) => tokio::time::sleep(config.farewell_hold).await,
        Err(e) => tracing::debug!("Connection {} missed the farewell: {}", conn_id, e),
    }
    close_stream(writer, state).await;
}

async fn close_stream<W>(writer: &mut W, state: &AppState)
where
    W: AsyncWrite + Unpin,
{
    // FIN after any pending bytes; errors mean the peer is already gone.
    let _ = tokio::time::timeout(state.config.write_timeout, writer.shutdown()).await;
}
