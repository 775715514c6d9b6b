//! Strictly Quoridor library - a turn-based wall-and-pawn race
//!
//! One authoritative engine owns the board and publishes every change
//! through a [`Presenter`]. The same engine drives a hot-seat game at one
//! terminal and a networked game where each seat is a TCP connection
//! speaking a newline-terminated text protocol.
//!
//! # Architecture
//!
//! - **Games**: board state, rules and invariants
//! - **Engine**: turn order, dispatch and publication of deltas
//! - **Session**: single actor serializing every networked action
//! - **Channel / Server / Client**: line protocol over TCP
//! - **View**: headless presentation state with timed effects
//!
//! # Example
//!
//! ```
//! use strictly_quoridor::{LocalGame, Seats, ViewModel};
//!
//! let view = ViewModel::new();
//! let mut game = LocalGame::new(Seats::Two, view.clone());
//! game.move_pawn(4, 1).unwrap();
//! assert_eq!(view.snapshot().pawns().get(&1), Some(&(4, 1)));
//! assert_eq!(*view.snapshot().current(), Some(2));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod broadcast;
mod channel;
mod client;
mod config;
mod engine;
mod games;
mod presenter;
mod protocol;
mod server;
mod session;
mod view;

// Crate-level exports - Game types
pub use games::quoridor::invariants;
pub use games::quoridor::{
    Action, ActionError, Board, GRID_SIZE, GoalEdge, Orientation, PlacedWall, Player, Position,
    STARTING_WALLS, SeatId, Seats, Side, Transition, WallSegment,
};

// Crate-level exports - Engine
pub use engine::{LocalGame, TurnEngine};
pub use presenter::Presenter;

// Crate-level exports - Protocol
pub use protocol::{ClientCommand, LineCodec, ProtocolError, ServerMessage};

// Crate-level exports - Networking
pub use broadcast::Broadcaster;
pub use channel::{ConnectionChannel, read_loop, write_loop};
pub use client::{ClientError, ClientReader, ClientSender, GameClient};
pub use server::GameServer;
pub use session::{GameSession, SessionClosed, SessionEvent, SessionHandle};

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Presentation
pub use view::{EFFECT_WINDOW, ViewModel, ViewState};
