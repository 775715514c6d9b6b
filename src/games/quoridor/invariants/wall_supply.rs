//! Wall supply invariant: every seat holds between 0 and 10 walls.

use super::super::{Board, STARTING_WALLS};
use super::Invariant;

/// Invariant: `0 <= wall_count <= 10` for every seat.
pub struct WallSupplyInvariant;

impl Invariant<Board> for WallSupplyInvariant {
    fn holds(board: &Board) -> bool {
        board
            .players()
            .iter()
            .all(|player| player.wall_count() <= STARTING_WALLS)
    }

    fn description() -> &'static str {
        "Every seat holds at most 10 walls"
    }
}
