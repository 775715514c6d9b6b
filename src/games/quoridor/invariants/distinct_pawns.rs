//! Distinct pawns invariant: every pawn is on the grid and no two share a cell.

use super::super::Board;
use super::Invariant;
use std::collections::HashSet;

/// Invariant: each pawn occupies exactly one on-grid cell, none shared.
pub struct DistinctPawnsInvariant;

impl Invariant<Board> for DistinctPawnsInvariant {
    fn holds(board: &Board) -> bool {
        let mut seen = HashSet::new();
        board.players().iter().all(|player| {
            board.position(player.x(), player.y()).is_ok() && seen.insert(player.coordinates())
        })
    }

    fn description() -> &'static str {
        "Pawns stand on distinct cells of the grid"
    }
}
