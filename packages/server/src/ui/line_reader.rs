//! Bounded, timeout-guarded line reads from a client stream.

use std::{collections::VecDeque, io, time::Duration};

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::SessionError;

/// Splits the inbound byte stream of one connection into lines.
///
/// Each read takes at most `buffer_size` bytes. Bytes are kept until a `\n`
/// arrives, so a line may span any number of reads; a trailing `\r` is
/// stripped. `buffer_size` also caps the line length: once more than that
/// many unterminated bytes are held, the line is cut on a UTF-8 character
/// boundary and delivered in pieces. An unterminated
/// tail left when the peer closes is delivered before `PeerClosed`.
///
/// Complete lines are queued, so the handshake can hand the reader to the
/// reader loop without losing anything that arrived together with the name.
pub struct LineReader<R> {
    inner: R,
    buffer: Vec<u8>,
    partial: Vec<u8>,
    pending: VecDeque<String>,
    read_timeout: Duration,
}

impl<R> LineReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(inner: R, buffer_size: usize, read_timeout: Duration) -> Self {
        Self {
            inner,
            buffer: vec![0; buffer_size],
            partial: Vec::with_capacity(buffer_size),
            pending: VecDeque::new(),
            read_timeout,
        }
    }

    /// Next line without its terminator.
    ///
    /// # Errors
    ///
    /// * `TransientIoTimeout` - nothing arrived within the read timeout
    /// * `PeerClosed` - zero-byte read with no unterminated bytes left
    /// * `IoFailure` - any other read error
    ///
    /// # Cancel safety
    ///
    /// Cancel safe: the only suspension point is the underlying read, and
    /// the reader state only changes after it completes.
    pub async fn read_line(&mut self) -> Result<String, SessionError> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Ok(line);
            }

            let read =
                tokio::time::timeout(self.read_timeout, self.inner.read(&mut self.buffer)).await;
            let num = match read {
                Err(_elapsed) => return Err(SessionError::TransientIoTimeout),
                Ok(Err(e)) if is_timeout(&e) => return Err(SessionError::TransientIoTimeout),
                Ok(Err(e)) => return Err(SessionError::IoFailure(e)),
                Ok(Ok(0)) if self.partial.is_empty() => return Err(SessionError::PeerClosed),
                Ok(Ok(0)) => {
                    let tail = std::mem::take(&mut self.partial);
                    return Ok(decode_line(&tail));
                }
                Ok(Ok(num)) => num,
            };

            self.partial.extend_from_slice(&self.buffer[..num]);
            self.split_complete_lines();
        }
    }

    fn split_complete_lines(&mut self) {
        while let Some(pos) = self.partial.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.partial.drain(..=pos).collect();
            self.pending.push_back(decode_line(&line[..pos]));
        }

        let cap = self.buffer.len();
        while self.partial.len() > cap {
            let cut = char_boundary_at_or_before(&self.partial, cap);
            let piece: Vec<u8> = self.partial.drain(..cut).collect();
            self.pending.push_back(decode_line(&piece));
        }
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Largest cut point `<= limit` that does not split a UTF-8 sequence.
///
/// Falls back to `limit` for invalid input so progress is always made.
fn char_boundary_at_or_before(bytes: &[u8], limit: usize) -> usize {
    let limit = limit.min(bytes.len());
    let lead = (limit.saturating_sub(4)..limit)
        .rev()
        .find(|&i| !is_continuation_byte(bytes[i]));
    match lead {
        Some(i) if i > 0 && i + utf8_sequence_len(bytes[i]) > limit => i,
        _ => limit,
    }
}

fn utf8_sequence_len(lead: u8) -> usize {
    match lead.leading_ones() {
        2 => 2,
        3 => 3,
        4 => 4,
        _ => 1,
    }
}

fn is_continuation_byte(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

fn is_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}
