//! Per-connection plumbing between a socket and the session.

use crate::games::quoridor::SeatId;
use crate::protocol::{ClientCommand, LineCodec, ServerMessage};
use crate::session::SessionHandle;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// A seated connection: one reader task and one writer task.
///
/// The reader decodes command lines and forwards them to the session;
/// malformed lines are logged and skipped, unknown commands ignored. The
/// writer drains the seat's outbox onto the socket, one line per message.
#[derive(Debug)]
pub struct ConnectionChannel {
    seat: SeatId,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl ConnectionChannel {
    /// Seats the connection in the session and starts both tasks.
    #[instrument(skip(reader, writer, session))]
    pub fn spawn<R, W>(reader: R, writer: W, seat: SeatId, session: SessionHandle) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (outbox, inbox) = unbounded_channel();
        if session.join(seat, outbox).is_err() {
            warn!("Session already closed, connection will idle");
        }
        Self {
            seat,
            reader: tokio::spawn(read_loop(reader, seat, session)),
            writer: tokio::spawn(write_loop(writer, seat, inbox)),
        }
    }

    /// The seat this connection owns.
    pub fn seat(&self) -> SeatId {
        self.seat
    }

    /// Waits for the peer to hang up and for queued replies to go out.
    ///
    /// The writer stops once the session drops the seat's outbox, which it
    /// does when the reader reports the seat has left.
    pub async fn closed(self) {
        if let Err(e) = self.reader.await {
            error!(seat = self.seat, error = %e, "Reader task failed");
        }
        if let Err(e) = self.writer.await {
            error!(seat = self.seat, error = %e, "Writer task failed");
        }
    }
}

/// Reads command lines until EOF or a transport error, then leaves the session.
///
/// Bytes that are not valid UTF-8 are replaced before decoding, so a garbled
/// line is reported as malformed and the connection keeps listening.
pub async fn read_loop<R>(reader: R, seat: SeatId, session: SessionHandle)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                info!(seat, "Connection closed by peer");
                break;
            }
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']);
                match ClientCommand::decode(line) {
                    Ok(Some(command)) => {
                        if session.command(seat, command).is_err() {
                            warn!(seat, "Session closed, dropping connection");
                            break;
                        }
                    }
                    Ok(None) => debug!(seat, %line, "Ignoring line"),
                    Err(e) => warn!(seat, %line, error = %e, "Malformed command"),
                }
            }
            Err(e) => {
                error!(seat, error = %e, "Read failed");
                break;
            }
        }
    }
    let _ = session.leave(seat);
}

/// Writes every outbox message as a line until the outbox closes or the
/// socket fails.
pub async fn write_loop<W>(mut writer: W, seat: SeatId, mut inbox: UnboundedReceiver<ServerMessage>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = inbox.recv().await {
        let line = format!("{}\n", message.encode());
        if let Err(e) = writer.write_all(line.as_bytes()).await {
            error!(seat, error = %e, "Write failed");
            break;
        }
        if let Err(e) = writer.flush().await {
            error!(seat, error = %e, "Flush failed");
            break;
        }
    }
    debug!(seat, "Writer finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::quoridor::Board;
    use crate::session::GameSession;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, DuplexStream, duplex};

    /// Seats one connection over an in-memory pipe and returns the peer end.
    fn seat_one() -> DuplexStream {
        let (session, handle) = GameSession::new(Board::default());
        tokio::spawn(session.run());
        let (peer, server) = duplex(1024);
        let (reader, writer) = tokio::io::split(server);
        let channel = ConnectionChannel::spawn(reader, writer, 1, handle);
        tokio::spawn(channel.closed());
        peer
    }

    async fn transcript(mut peer: DuplexStream, input: &[u8]) -> String {
        peer.write_all(input).await.unwrap();
        peer.shutdown().await.unwrap();
        let mut output = String::new();
        tokio::time::timeout(Duration::from_secs(5), peer.read_to_string(&mut output))
            .await
            .expect("connection never closed")
            .unwrap();
        output
    }

    #[tokio::test]
    async fn test_non_utf8_line_is_skipped() {
        let output = transcript(seat_one(), b"move \xff 1 1\navailable\n").await;
        assert_eq!(
            output,
            "setID 1\nhighlight 3 0\nhighlight 5 0\nhighlight 4 1\n"
        );
    }

    #[tokio::test]
    async fn test_replies_flushed_after_half_close() {
        let output = transcript(seat_one(), b"start-coordinates\navailable\n").await;
        assert_eq!(
            output,
            "setID 1\ncoordinate 4 0 4 8\nhighlight 3 0\nhighlight 5 0\nhighlight 4 1\n"
        );
    }

    #[tokio::test]
    async fn test_crlf_line_endings_accepted() {
        let output = transcript(seat_one(), b"available\r\n").await;
        assert_eq!(output, "setID 1\nhighlight 3 0\nhighlight 5 0\nhighlight 4 1\n");
    }
}
