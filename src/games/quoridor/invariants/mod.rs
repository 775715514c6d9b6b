//! First-class board invariants.
//!
//! Invariants are logical properties that hold after every accepted action.
//! The board checks them in debug builds and they can be tested on their own.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for triples of [`Invariant`]s.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
            (I3::holds(state), I3::description()),
        ]
        .into_iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(description))
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

pub mod distinct_pawns;
pub mod wall_groups;
pub mod wall_supply;

pub use distinct_pawns::DistinctPawnsInvariant;
pub use wall_groups::WallGroupsInvariant;
pub use wall_supply::WallSupplyInvariant;

/// All board invariants as a composable set.
pub type BoardInvariants = (WallSupplyInvariant, DistinctPawnsInvariant, WallGroupsInvariant);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::quoridor::{Board, Orientation, Seats, WallSegment};

    #[test]
    fn test_invariant_set_holds_for_new_board() {
        assert!(BoardInvariants::check_all(&Board::new(Seats::Two)).is_ok());
        assert!(BoardInvariants::check_all(&Board::new(Seats::Four)).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_actions() {
        let mut board = Board::default();
        board.move_pawn(4, 1).unwrap();
        board
            .place_wall(WallSegment::new(2, 5, Orientation::Horizontal))
            .unwrap();
        board
            .place_wall(WallSegment::new(6, 1, Orientation::Vertical))
            .unwrap();
        board
            .remove_wall(WallSegment::new(2, 5, Orientation::Horizontal))
            .unwrap();
        assert!(BoardInvariants::check_all(&board).is_ok());
    }
}
