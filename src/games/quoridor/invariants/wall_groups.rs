//! Wall group invariant: flags only ever exist as whole 4-flag segments.

use super::super::{Board, Position};
use super::Invariant;
use std::collections::HashSet;

/// Invariant: the set wall flags are exactly the union of the placed
/// segments' flags, four per segment.
pub struct WallGroupsInvariant;

impl Invariant<Board> for WallGroupsInvariant {
    fn holds(board: &Board) -> bool {
        let expected: HashSet<_> = board
            .walls()
            .iter()
            .flat_map(|placed| placed.segment().covered())
            .collect();

        let set_flags: usize = board.positions().map(Position::wall_flag_count).sum();

        expected.len() == board.walls().len() * 4
            && set_flags == expected.len()
            && expected.iter().all(|(x, y, side)| {
                board
                    .position(*x, *y)
                    .is_ok_and(|position| position.has_wall(*side))
            })
    }

    fn description() -> &'static str {
        "Wall flags are set in whole groups of four"
    }
}
