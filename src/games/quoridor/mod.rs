//! Wall-and-pawn race on a 9×9 grid.

mod action;
mod board;
pub mod invariants;
mod types;

pub use action::{Action, ActionError, Transition};
pub use board::Board;
pub use types::{
    GRID_SIZE, GoalEdge, Orientation, PlacedWall, Player, Position, STARTING_WALLS, SeatId, Seats,
    Side, WallSegment,
};
