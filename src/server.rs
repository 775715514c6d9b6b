//! TCP game server.

use crate::channel::ConnectionChannel;
use crate::config::ServerConfig;
use crate::games::quoridor::{Board, SeatId, Seats};
use crate::session::{GameSession, SessionHandle};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, instrument, warn};

/// Accepts connections, seats them in order and feeds one game session.
#[derive(Debug)]
pub struct GameServer {
    listener: TcpListener,
    seats: Seats,
    session: GameSession,
    handle: SessionHandle,
}

impl GameServer {
    /// Binds the listener and prepares the session.
    #[instrument(skip(config), fields(address = %config.address()))]
    pub async fn bind(config: &ServerConfig) -> anyhow::Result<Self> {
        let seats = config.seat_layout()?;
        let board = Board::with_walls(seats, *config.walls_per_seat());
        let (session, handle) = GameSession::new(board);

        let listener = TcpListener::bind(config.address()).await?;
        info!(
            address = %listener.local_addr()?,
            seats = seats.count(),
            walls_per_seat = config.walls_per_seat(),
            "Server listening"
        );

        Ok(Self {
            listener,
            seats,
            session,
            handle,
        })
    }

    /// The bound address.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the session and the accept loop.
    ///
    /// Seats are handed out in connection order. Once the table is full,
    /// further connections are closed straight away.
    pub async fn serve(self) -> anyhow::Result<()> {
        let Self {
            listener,
            seats,
            session,
            handle,
        } = self;
        tokio::spawn(session.run());

        let mut next_seat: SeatId = 1;
        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!(error = %e, "Accept failed");
                    continue;
                }
            };

            if next_seat > seats.count() {
                warn!(%peer, "Table full, refusing connection");
                drop(stream);
                continue;
            }

            info!(%peer, seat = next_seat, "Connection accepted");
            let (reader, writer) = stream.into_split();
            let channel = ConnectionChannel::spawn(reader, writer, next_seat, handle.clone());
            tokio::spawn(channel.closed());
            next_seat += 1;
        }
    }
}
