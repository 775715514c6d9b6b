//! Networked game session.
//!
//! One session task owns the engine. Connections never touch game state;
//! they send [`SessionEvent`]s through a [`SessionHandle`] and receive
//! [`ServerMessage`]s on their own outbox. Events are processed strictly
//! one at a time, in arrival order.

use crate::broadcast::Broadcaster;
use crate::engine::TurnEngine;
use crate::games::quoridor::{ActionError, Board, SeatId, Seats};
use crate::protocol::{ClientCommand, ServerMessage};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info, instrument, warn};

/// Something that happened on a connection.
#[derive(Debug)]
pub enum SessionEvent {
    /// A connection was accepted and given a seat.
    Joined {
        /// Assigned seat.
        seat: SeatId,
        /// Where the seat's notifications go.
        outbox: UnboundedSender<ServerMessage>,
    },
    /// A decoded command arrived.
    Command {
        /// Seat the connection owns.
        seat: SeatId,
        /// The command.
        command: ClientCommand,
    },
    /// The connection closed.
    Left {
        /// Seat the connection owned.
        seat: SeatId,
    },
}

/// The session task has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Game session is no longer running")]
pub struct SessionClosed;

/// Cloneable sender into a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: UnboundedSender<SessionEvent>,
}

impl SessionHandle {
    /// Announces a newly seated connection.
    pub fn join(
        &self,
        seat: SeatId,
        outbox: UnboundedSender<ServerMessage>,
    ) -> Result<(), SessionClosed> {
        self.send(SessionEvent::Joined { seat, outbox })
    }

    /// Forwards a command from `seat`.
    pub fn command(&self, seat: SeatId, command: ClientCommand) -> Result<(), SessionClosed> {
        self.send(SessionEvent::Command { seat, command })
    }

    /// Reports that `seat`'s connection closed.
    pub fn leave(&self, seat: SeatId) -> Result<(), SessionClosed> {
        self.send(SessionEvent::Left { seat })
    }

    fn send(&self, event: SessionEvent) -> Result<(), SessionClosed> {
        self.tx.send(event).map_err(|_| SessionClosed)
    }
}

/// Single owner of a networked game.
#[derive(Debug)]
pub struct GameSession {
    engine: TurnEngine<Broadcaster>,
    seats: Seats,
    booted: bool,
    inbox: UnboundedReceiver<SessionEvent>,
}

impl GameSession {
    /// Creates a session over `board` and the handle that feeds it.
    #[instrument(skip(board), fields(seats = board.seats().count()))]
    pub fn new(board: Board) -> (Self, SessionHandle) {
        let seats = board.seats();
        let (tx, inbox) = unbounded_channel();
        info!("Creating game session");
        let session = Self {
            engine: TurnEngine::new(board, Broadcaster::default()),
            seats,
            booted: false,
            inbox,
        };
        (session, SessionHandle { tx })
    }

    /// The engine, for inspection.
    pub fn engine(&self) -> &TurnEngine<Broadcaster> {
        &self.engine
    }

    /// Whether `bootGUI` has gone out.
    pub fn is_booted(&self) -> bool {
        self.booted
    }

    /// Processes events until every handle is dropped.
    pub async fn run(mut self) {
        while let Some(event) = self.inbox.recv().await {
            self.handle(event);
        }
        info!("All session handles dropped, session ending");
    }

    /// Processes one event.
    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Joined { seat, outbox } => self.join(seat, outbox),
            SessionEvent::Command { seat, command } => self.command(seat, command),
            SessionEvent::Left { seat } => self.leave(seat),
        }
    }

    #[instrument(skip(self, outbox))]
    fn join(&mut self, seat: SeatId, outbox: UnboundedSender<ServerMessage>) {
        let broadcaster = self.engine.presenter_mut();
        broadcaster.add(seat, outbox);
        broadcaster.unicast(seat, ServerMessage::SetId(seat));
        info!(connected = broadcaster.len(), "Seat joined");

        if !self.booted && broadcaster.len() == self.seats.count() as usize {
            info!("All seats connected, booting views");
            broadcaster.broadcast(ServerMessage::BootGui);
            self.booted = true;
        }
    }

    #[instrument(skip(self), fields(current = self.engine.current_seat()))]
    fn command(&mut self, seat: SeatId, command: ClientCommand) {
        debug!(%command, "Command received");
        match command {
            ClientCommand::Available => {
                self.engine.available_moves();
            }
            ClientCommand::StartCoordinates => {
                self.engine.start_coordinates(seat);
            }
            ClientCommand::Move { .. }
            | ClientCommand::Wall { .. }
            | ClientCommand::RemoveWall { .. } => {
                let Some((claimed, action)) = command.action() else {
                    return;
                };
                if claimed != seat {
                    warn!(claimed, "Command claims another seat");
                    self.engine.reject(seat, ActionError::OutOfTurn);
                    return;
                }
                if let Ok(transition) = self.engine.submit(seat, action) {
                    debug!(?transition, "Action accepted");
                }
            }
        }
    }

    #[instrument(skip(self))]
    fn leave(&mut self, seat: SeatId) {
        if self.engine.presenter_mut().remove(seat) {
            info!("Seat left");
        }
    }
}
