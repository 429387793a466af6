use log::{debug, error, info, warn};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, BufReader};
use tokio::sync::mpsc;

use crate::client::connection::spawn_writer;
use crate::client::{ClientRegistry, ClientSession, ConnectionHandle, SlotId};
use crate::config::ServerConfig;
use crate::middleware::logging::log_command;
use crate::protocol::responses::LINE_TOO_LONG;
use crate::protocol::{CommandStatus, handle_command, parse_command};

/// Outcome of reading one protocol line.
#[derive(Debug, PartialEq)]
enum LineRead {
    Eof,
    Line,
    TooLong,
}

/// Handles one chat connection using Tokio async runtime.
///
/// - Spawns the writer task that drains `outbound` into `write_half`.
/// - Reads newline-terminated lines from `read_half` and dispatches them with
///   `handle_command`.
/// - Ends on LEAVE, end of stream, a read error, or writer failure, and always
///   releases `slot` on the way out.
pub async fn handle_client<R, W>(
    read_half: R,
    write_half: W,
    slot: SlotId,
    connection: ConnectionHandle,
    outbound: mpsc::Receiver<String>,
    registry: Arc<ClientRegistry>,
    config: Arc<ServerConfig>,
) where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let peer = connection.peer();
    let mut writer = spawn_writer(write_half, outbound, peer);
    let mut writer_finished = false;

    let mut reader = BufReader::new(read_half);
    let mut session = ClientSession::new(peer, slot);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        tokio::select! {
            read = read_line(&mut reader, &mut buf, config.max_line_length) => match read {
                Ok(LineRead::Eof) => {
                    info!("Connection closed by client {}", peer);
                    break;
                }
                Ok(LineRead::TooLong) => {
                    warn!("Line from {} exceeds {} bytes", peer, config.max_line_length);
                    if !connection.send(LINE_TOO_LONG.to_string()).await {
                        break;
                    }
                }
                Ok(LineRead::Line) => {
                    let line = String::from_utf8_lossy(&buf);
                    let command = parse_command(&line);
                    log_command(&peer, &command);

                    let result = handle_command(&mut session, &command, &registry).await;

                    if let Some(msg) = result.message {
                        if !connection.send(msg).await {
                            break;
                        }
                    }

                    match result.status {
                        CommandStatus::CloseConnection => {
                            info!("Client {} left", peer);
                            break;
                        }
                        CommandStatus::Success => {}
                        CommandStatus::Failure(reason) => {
                            debug!("Command from {} rejected: {}", peer, reason);
                        }
                    }
                }
                Err(e) => {
                    error!("Failed to read from {}: {}", peer, e);
                    break;
                }
            },
            _ = &mut writer => {
                writer_finished = true;
                warn!("Output to {} failed, ending session", peer);
                break;
            }
        }
    }

    session.release(&registry).await;

    // The writer exits once the last handle is gone and the queue is flushed.
    drop(connection);
    if !writer_finished
        && tokio::time::timeout(config.drain_timeout(), &mut writer)
            .await
            .is_err()
    {
        warn!("Timed out flushing output to {}", peer);
        writer.abort();
    }

    info!("Client {} disconnected", peer);
}

/// Reads one line into `buf`, consuming at most `limit` bytes of it.
///
/// An over-long line is discarded up to and including its terminator.
async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>, limit: usize) -> io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    let n = (&mut *reader).take(limit as u64).read_until(b'\n', buf).await?;
    if n == 0 {
        return Ok(LineRead::Eof);
    }
    if buf.ends_with(b"\n") {
        return Ok(LineRead::Line);
    }
    if n < limit || reader.fill_buf().await?.is_empty() {
        // Final line without a terminator.
        return Ok(LineRead::Line);
    }

    discard_rest_of_line(reader).await?;
    Ok(LineRead::TooLong)
}

async fn discard_rest_of_line<R>(reader: &mut R) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                reader.consume(pos + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_line_splits_lines() {
        let mut reader = BufReader::new(&b"JOIN Alice\nhi\nlast"[..]);
        let mut buf = Vec::new();

        assert_eq!(read_line(&mut reader, &mut buf, 64).await.unwrap(), LineRead::Line);
        assert_eq!(buf, b"JOIN Alice\n");

        buf.clear();
        assert_eq!(read_line(&mut reader, &mut buf, 64).await.unwrap(), LineRead::Line);
        assert_eq!(buf, b"hi\n");

        buf.clear();
        assert_eq!(read_line(&mut reader, &mut buf, 64).await.unwrap(), LineRead::Line);
        assert_eq!(buf, b"last");

        buf.clear();
        assert_eq!(read_line(&mut reader, &mut buf, 64).await.unwrap(), LineRead::Eof);
    }

    #[tokio::test]
    async fn test_read_line_discards_long_line() {
        let mut reader = BufReader::new(&b"0123456789abcdef\nWHO\n"[..]);
        let mut buf = Vec::new();

        assert_eq!(read_line(&mut reader, &mut buf, 8).await.unwrap(), LineRead::TooLong);

        buf.clear();
        assert_eq!(read_line(&mut reader, &mut buf, 8).await.unwrap(), LineRead::Line);
        assert_eq!(buf, b"WHO\n");
    }

    #[tokio::test]
    async fn test_read_line_exact_limit() {
        let mut reader = BufReader::new(&b"abc\n"[..]);
        let mut buf = Vec::new();
        assert_eq!(read_line(&mut reader, &mut buf, 4).await.unwrap(), LineRead::Line);
        assert_eq!(buf, b"abc\n");
    }

    #[tokio::test]
    async fn test_read_line_final_line_at_limit() {
        let mut reader = BufReader::new(&b"abcd"[..]);
        let mut buf = Vec::new();
        assert_eq!(read_line(&mut reader, &mut buf, 4).await.unwrap(), LineRead::Line);
        assert_eq!(buf, b"abcd");

        buf.clear();
        assert_eq!(read_line(&mut reader, &mut buf, 4).await.unwrap(), LineRead::Eof);
    }

    #[tokio::test]
    async fn test_write_failure_releases_slot() {
        use crate::client::outbound_channel;
        use std::net::SocketAddr;
        use std::time::Duration;
        use tokio::io::AsyncWriteExt;

        let peer = SocketAddr::from(([127, 0, 0, 1], 9001));
        let registry = Arc::new(ClientRegistry::new(2));
        let config = Arc::new(ServerConfig::default());
        let (connection, outbound) = outbound_channel(peer, 8);
        let slot = registry.reserve(connection.clone()).await.unwrap();

        // Separate pipes for each direction so the output side can break
        // while input stays open.
        let (mut client_input, server_input) = tokio::io::duplex(1024);
        let (client_output, server_output) = tokio::io::duplex(1024);

        let session = tokio::spawn(handle_client(
            server_input,
            server_output,
            slot,
            connection,
            outbound,
            Arc::clone(&registry),
            config,
        ));

        client_input.write_all(b"JOIN Alice\n").await.unwrap();
        let mut output = BufReader::new(client_output);
        let mut welcome = String::new();
        output.read_line(&mut welcome).await.unwrap();
        assert_eq!(welcome, "Welcome to the chat room, Alice!\n");
        assert_eq!(registry.who().await, vec!["Alice"]);

        drop(output);
        client_input.write_all(b"hello\n").await.unwrap();

        tokio::time::timeout(Duration::from_secs(2), session)
            .await
            .expect("session should end after its output fails")
            .unwrap();
        assert_eq!(registry.occupied().await, 0);
        assert!(registry.who().await.is_empty());
        drop(client_input);
    }
}
