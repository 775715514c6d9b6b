//! First-class action types.
//!
//! Actions are the player's intent. They are validated by the board and
//! either applied in full or rejected without touching state.

use super::types::{Orientation, SeatId, WallSegment};

/// Something a seat can do on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Step the pawn to an adjacent cell.
    MovePawn {
        /// Destination column.
        x: u8,
        /// Destination row.
        y: u8,
    },
    /// Place a wall.
    PlaceWall(WallSegment),
    /// Take a previously placed wall off the board.
    RemoveWall(WallSegment),
}

impl Action {
    /// Shorthand for a wall placement.
    pub fn wall(x: u8, y: u8, orientation: Orientation) -> Self {
        Action::PlaceWall(WallSegment::new(x, y, orientation))
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::MovePawn { x, y } => write!(f, "move to ({}, {})", x, y),
            Action::PlaceWall(segment) => write!(f, "wall at {}", segment),
            Action::RemoveWall(segment) => write!(f, "remove wall at {}", segment),
        }
    }
}

/// A rule violation.
///
/// The display text is exactly what the acting seat is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ActionError {
    /// Coordinates fall outside the grid.
    #[display("Position ({x}, {y}) is out of range")]
    OutOfRange {
        /// Requested column.
        x: u8,
        /// Requested row.
        y: u8,
    },

    /// Destination is not an adjacent, unwalled cell.
    #[display("That isn't a valid move")]
    InvalidMove,

    /// Destination holds another pawn.
    #[display("Position is occupied")]
    PositionOccupied,

    /// The seat has used all of its walls.
    #[display("You have no remaining walls")]
    NoWallsRemaining,

    /// Someone other than the current seat tried to act.
    #[display("It isn't your turn.")]
    OutOfTurn,

    /// The wall would overlap or cross an existing wall.
    #[display("There is already a wall there")]
    WallOverlap,

    /// No wall with that top-left and orientation exists.
    #[display("There is no wall there")]
    WallNotFound,
}

/// How the game moved on after an accepted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Turn passed to the next seat.
    Advanced {
        /// Seat that acted.
        acted: SeatId,
        /// Seat now holding the turn.
        next: SeatId,
    },
    /// A pawn reached its goal edge and the board was reset.
    Reset {
        /// Seat that reached its goal.
        winner: SeatId,
    },
}
