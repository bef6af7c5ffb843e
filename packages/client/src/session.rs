//! One TCP chat session: handshake, then relay between terminal and server.

use irori_shared::protocol::{FAREWELL_LINE, LINE_TERMINATOR, welcome_line};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines},
    net::TcpStream,
    sync::mpsc,
};

use super::{error::ClientError, formatter::MessageFormatter, ui::print_above_prompt};

/// Connect to `addr` as `name` and chat until the user quits or the
/// connection ends.
///
/// # Returns
///
/// * `Ok(())` - the user ended the session
/// * `Err(ClientError::ServerShutdown)` - the server said goodbye
/// * `Err(ClientError::NameRejected)` - the handshake was refused
/// * `Err(ClientError::ConnectionError)` - the connection failed or dropped
pub async fn run_client_session(
    addr: &str,
    name: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
    formatter: &MessageFormatter,
) -> Result<(), ClientError> {
    let stream = TcpStream::connect(addr).await?;
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();

    let welcome = handshake(&mut lines, &mut write, name).await?;
    tracing::info!("Connected to chat server at {}", addr);
    println!(
        "\n{}\nType messages and press Enter to send. Press Ctrl+C to exit.\n",
        formatter.format_incoming(&welcome)
    );

    relay(&mut lines, &mut write, name, input_rx, formatter).await
}

/// Send the name and wait for the welcome line.
async fn handshake<R, W>(
    lines: &mut Lines<R>,
    write: &mut W,
    name: &str,
) -> Result<String, ClientError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    send_line(write, name).await?;

    match lines.next_line().await? {
        Some(line) if line == welcome_line(name) => Ok(line),
        Some(line) if line == FAREWELL_LINE => Err(ClientError::ServerShutdown),
        Some(line) => Err(ClientError::NameRejected(line)),
        None => Err(ClientError::ConnectionError(
            "server closed the connection during the handshake".to_string(),
        )),
    }
}

/// Print server lines and forward terminal input until one side ends.
async fn relay<R, W>(
    lines: &mut Lines<R>,
    write: &mut W,
    name: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
    formatter: &MessageFormatter,
) -> Result<(), ClientError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        tokio::select! {
            incoming = lines.next_line() => match incoming? {
                Some(line) => {
                    print_above_prompt(&formatter.format_incoming(&line), name);
                    if line == FAREWELL_LINE {
                        return Err(ClientError::ServerShutdown);
                    }
                }
                None => {
                    return Err(ClientError::ConnectionError(
                        "server closed the connection".to_string(),
                    ));
                }
            },
            input = input_rx.recv() => match input {
                Some(text) => send_line(write, &text).await?,
                None => return Ok(()),
            },
        }
    }
}

async fn send_line<W>(write: &mut W, line: &str) -> Result<(), ClientError>
where
    W: AsyncWrite + Unpin,
{
    write
        .write_all(format!("{}{}", line, LINE_TERMINATOR).as_bytes())
        .await?;
    write.flush().await?;
    Ok(())
}
