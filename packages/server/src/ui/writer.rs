//! Writer loop: relays unseen log entries to one client on a fixed cadence.
//!
//! Delivery is by polling rather than per-append notification, so a slow
//! client never holds up whoever is appending.

use std::{sync::Arc, time::Duration};

use irori_shared::protocol::LINE_TERMINATOR;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    time::MissedTickBehavior,
};
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{MessageLog, Session},
    error::SessionError,
    lifecycle::DisconnectSignal,
};

use super::connection::ConnectionId;

/// Write one line plus terminator, bounded by `write_timeout`.
pub async fn write_line<W>(
    writer: &mut W,
    line: &str,
    write_timeout: Duration,
) -> Result<(), SessionError>
where
    W: AsyncWrite + Unpin,
{
    let frame = format!("{}{}", line, LINE_TERMINATOR);
    let write = async {
        writer.write_all(frame.as_bytes()).await?;
        writer.flush().await
    };
    match tokio::time::timeout(write_timeout, write).await {
        Err(_elapsed) => Err(SessionError::TransientIoTimeout),
        Ok(result) => result.map_err(SessionError::IoFailure),
    }
}

/// Send every entry from the session cursor up to the current log length.
///
/// The cursor advances after each successful write. The log lock is only
/// held while the length and the slice are read, never during the writes.
/// `stop` is checked between lines.
///
/// Returns the number of lines sent.
pub async fn relay_unseen<W>(
    writer: &mut W,
    session: &mut Session,
    message_log: &dyn MessageLog,
    write_timeout: Duration,
    stop: &CancellationToken,
) -> Result<usize, SessionError>
where
    W: AsyncWrite + Unpin,
{
    let length = message_log.length().await;
    if session.cursor() >= length {
        return Ok(0);
    }

    let entries = message_log.slice(session.cursor(), length).await;
    let mut sent = 0;
    for entry in &entries {
        if stop.is_cancelled() {
            break;
        }
        write_line(writer, &entry.to_string(), write_timeout).await?;
        session.advance();
        sent += 1;
    }
    Ok(sent)
}

/// What a stopped writer hands back to its supervisor.
#[derive(Debug)]
pub struct WriterExit<W> {
    pub writer: W,
    pub session: Session,
    /// A relay was abandoned part way, so the peer may hold an unterminated line.
    pub line_cut: bool,
}

/// Poll the log every `poll_interval` and push unseen entries to the client.
///
/// Ends when `stop` fires or a write fails or times out. A failed write
/// raises `disconnect`. `stop` also abandons a write that is still waiting
/// on a client that does not read, so the supervisor gets the writer half
/// back without sitting out `write_timeout`.
#[allow(clippy::too_many_arguments)]
pub async fn writer_loop<W>(
    mut writer: W,
    mut session: Session,
    message_log: Arc<dyn MessageLog>,
    poll_interval: Duration,
    write_timeout: Duration,
    stop: CancellationToken,
    disconnect: DisconnectSignal,
    conn_id: ConnectionId,
) -> WriterExit<W>
where
    W: AsyncWrite + Unpin,
{
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut line_cut = false;

    loop {
        tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let relay = relay_unseen(
            &mut writer,
            &mut session,
            message_log.as_ref(),
            write_timeout,
            &stop,
        );
        // The relay goes first so a stop only interrupts work that is pending.
        let outcome = tokio::select! {
            biased;
            outcome = relay => outcome,
            _ = stop.cancelled() => {
                tracing::debug!("Connection {} writer interrupted by stop", conn_id);
                line_cut = true;
                break;
            }
        };

        match outcome {
            Ok(0) => {}
            Ok(sent) => tracing::trace!(
                "Connection {} relayed {} line(s), cursor now {}",
                conn_id,
                sent,
                session.cursor()
            ),
            Err(e) => {
                tracing::debug!("Connection {} writer stopping: {}", conn_id, e);
                disconnect.notify();
                break;
            }
        }
    }

    WriterExit {
        writer,
        session,
        line_cut,
    }
}
