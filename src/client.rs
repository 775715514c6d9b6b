//! Networked client.
//!
//! [`GameClient`] owns one TCP connection. The reading side decodes server
//! lines and records the connection's seat and boot state; the writing
//! side sends the five client commands on behalf of that seat.

use crate::games::quoridor::{SeatId, WallSegment};
use crate::protocol::{ClientCommand, LineCodec, ServerMessage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Client-side failure.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ClientError {
    /// A seat-scoped command was sent before `setID` arrived.
    #[display("No seat has been assigned yet")]
    NoSeat,

    /// The socket failed.
    #[display("Connection error: {_0}")]
    #[from]
    Io(std::io::Error),
}

/// What the server has told this connection about itself.
#[derive(Debug, Default)]
struct Identity {
    seat: OnceLock<SeatId>,
    booted: AtomicBool,
}

impl Identity {
    fn observe(&self, message: &ServerMessage) {
        match message {
            ServerMessage::SetId(seat) => {
                if self.seat.set(*seat).is_ok() {
                    info!(seat, "Seat assigned");
                } else {
                    debug!(seat, "Ignoring repeated setID");
                }
            }
            ServerMessage::BootGui => {
                self.booted.store(true, Ordering::Release);
            }
            _ => {}
        }
    }
}

/// Decoding half of a connection.
#[derive(Debug)]
pub struct ClientReader {
    lines: Lines<BufReader<OwnedReadHalf>>,
    identity: Arc<Identity>,
}

impl ClientReader {
    /// Next decoded notification, or `None` once the server hangs up.
    ///
    /// Unknown and malformed lines are skipped.
    pub async fn next_message(&mut self) -> Result<Option<ServerMessage>, ClientError> {
        while let Some(line) = self.lines.next_line().await? {
            match ServerMessage::decode(&line) {
                Ok(Some(message)) => {
                    self.identity.observe(&message);
                    return Ok(Some(message));
                }
                Ok(None) => debug!(%line, "Ignoring line"),
                Err(e) => warn!(%line, error = %e, "Malformed server message"),
            }
        }
        Ok(None)
    }

    /// Moves decoding onto its own task and returns the message queue.
    ///
    /// Whoever holds the receiver is the only one applying notifications.
    pub fn forward(mut self) -> (UnboundedReceiver<ServerMessage>, JoinHandle<()>) {
        let (tx, rx) = unbounded_channel();
        let task = tokio::spawn(async move {
            loop {
                match self.next_message().await {
                    Ok(Some(message)) => {
                        if tx.send(message).is_err() {
                            debug!("Message queue dropped");
                            break;
                        }
                    }
                    Ok(None) => {
                        info!("Server closed the connection");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "Connection lost");
                        break;
                    }
                }
            }
        });
        (rx, task)
    }
}

/// Sending half of a connection.
#[derive(Debug)]
pub struct ClientSender {
    writer: OwnedWriteHalf,
    identity: Arc<Identity>,
}

impl ClientSender {
    /// Seat assigned by the first `setID`.
    pub fn player_id(&self) -> Option<SeatId> {
        self.identity.seat.get().copied()
    }

    /// Whether `bootGUI` has arrived.
    pub fn gui_can_be_launched(&self) -> bool {
        self.identity.booted.load(Ordering::Acquire)
    }

    /// `move x y id`
    pub async fn send_move(&mut self, x: u8, y: u8) -> Result<(), ClientError> {
        let seat = self.seat()?;
        self.send(ClientCommand::Move { x, y, seat }).await
    }

    /// `wall x y ORIENTATION id`
    pub async fn send_wall(&mut self, segment: WallSegment) -> Result<(), ClientError> {
        let seat = self.seat()?;
        self.send(ClientCommand::Wall { segment, seat }).await
    }

    /// `remove-wall x y ORIENTATION id`
    pub async fn send_remove_wall(&mut self, segment: WallSegment) -> Result<(), ClientError> {
        let seat = self.seat()?;
        self.send(ClientCommand::RemoveWall { segment, seat }).await
    }

    /// `available`
    pub async fn request_available_moves(&mut self) -> Result<(), ClientError> {
        self.send(ClientCommand::Available).await
    }

    /// `start-coordinates`
    pub async fn request_start_coordinates(&mut self) -> Result<(), ClientError> {
        self.send(ClientCommand::StartCoordinates).await
    }

    /// Writes one command line.
    #[instrument(skip(self), fields(seat = ?self.player_id()))]
    pub async fn send(&mut self, command: ClientCommand) -> Result<(), ClientError> {
        let line = format!("{}\n", command.encode());
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;
        debug!(%command, "Command sent");
        Ok(())
    }

    fn seat(&self) -> Result<SeatId, ClientError> {
        self.player_id().ok_or(ClientError::NoSeat)
    }
}

/// A connection to a game server.
#[derive(Debug)]
pub struct GameClient {
    reader: ClientReader,
    sender: ClientSender,
}

impl GameClient {
    /// Connects to a server.
    #[instrument(skip(addr))]
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await?;
        info!(peer = ?stream.peer_addr().ok(), "Connected to server");
        Ok(Self::from_stream(stream))
    }

    /// Wraps an established stream.
    pub fn from_stream(stream: TcpStream) -> Self {
        let (read, write) = stream.into_split();
        let identity = Arc::new(Identity::default());
        Self {
            reader: ClientReader {
                lines: BufReader::new(read).lines(),
                identity: Arc::clone(&identity),
            },
            sender: ClientSender {
                writer: write,
                identity,
            },
        }
    }

    /// Seat assigned by the first `setID`.
    pub fn player_id(&self) -> Option<SeatId> {
        self.sender.player_id()
    }

    /// Whether `bootGUI` has arrived.
    pub fn gui_can_be_launched(&self) -> bool {
        self.sender.gui_can_be_launched()
    }

    /// Next decoded notification; see [`ClientReader::next_message`].
    pub async fn next_message(&mut self) -> Result<Option<ServerMessage>, ClientError> {
        self.reader.next_message().await
    }

    /// The sending half.
    pub fn sender(&mut self) -> &mut ClientSender {
        &mut self.sender
    }

    /// Separates the two halves.
    pub fn into_split(self) -> (ClientReader, ClientSender) {
        (self.reader, self.sender)
    }
}
