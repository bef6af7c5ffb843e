//! Reader loop: inbound client lines become log entries.

use std::sync::Arc;

use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::DisplayName,
    lifecycle::DisconnectSignal,
    usecase::{PostMessageError, PostMessageUseCase},
};

use super::{connection::ConnectionId, line_reader::LineReader};

/// Read lines from one client until it disconnects or `stop` fires.
///
/// Read timeouts are retried. A closed stream or a read error raises
/// `disconnect` and ends the loop. Empty lines are dropped.
pub async fn reader_loop<R>(
    mut lines: LineReader<R>,
    name: DisplayName,
    post_message: Arc<PostMessageUseCase>,
    stop: CancellationToken,
    disconnect: DisconnectSignal,
    conn_id: ConnectionId,
) where
    R: AsyncRead + Unpin,
{
    loop {
        let read = tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            read = lines.read_line() => read,
        };

        let line = match read {
            Ok(line) => line,
            Err(e) if e.is_transient() => {
                tracing::trace!("Connection {} idle past read timeout", conn_id);
                continue;
            }
            Err(e) => {
                tracing::debug!("Connection {} reader stopping: {}", conn_id, e);
                disconnect.notify();
                break;
            }
        };

        match post_message.execute(&name, &line).await {
            Ok(index) => tracing::debug!("'{}' posted entry #{}", name, index),
            Err(PostMessageError::EmptyContent) => {}
        }
    }
}
