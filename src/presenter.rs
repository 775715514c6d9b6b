//! Outward surface from the engine to whatever shows the game.

use crate::games::quoridor::{SeatId, WallSegment};

/// Everything the engine tells a presentation layer.
///
/// The engine only ever calls outward through this trait and never reads
/// presentation state back. Implementations decide fan-out: a local view
/// applies each call to its one screen, the networked broadcaster turns
/// each call into protocol lines for every connected seat.
///
/// `display_error` and `set_initial_positions` are addressed to a single
/// seat; presenters with only one view may ignore the seat.
pub trait Presenter {
    /// A seat's move counter changed.
    fn update_move_count(&mut self, count: u32, seat: SeatId);

    /// A seat's wall supply changed.
    fn update_wall_count(&mut self, count: u8, seat: SeatId);

    /// Both counters of a seat changed together.
    fn update_stats(&mut self, move_count: u32, wall_count: u8, seat: SeatId) {
        self.update_move_count(move_count, seat);
        self.update_wall_count(wall_count, seat);
    }

    /// A pawn now stands on `(x, y)`.
    fn update_pawn_position(&mut self, x: u8, y: u8, seat: SeatId);

    /// The turn passed to `seat`.
    fn update_current_player(&mut self, seat: SeatId);

    /// A wall was placed by `seat`.
    fn display_wall(&mut self, segment: WallSegment, seat: SeatId);

    /// A wall was taken off the board.
    fn remove_wall_display(&mut self, segment: WallSegment);

    /// `(x, y)` is a legal destination for the current seat.
    fn highlight_availability(&mut self, x: u8, y: u8);

    /// Show a rule violation to `seat`.
    fn display_error(&mut self, seat: SeatId, text: &str);

    /// Every wall display should be cleared.
    fn reset_walls(&mut self);

    /// Pawn coordinates in seat order, for `seat`'s initial layout.
    fn set_initial_positions(&mut self, seat: SeatId, positions: &[(u8, u8)]);

    /// `seat` reached its goal edge; the board resets right after.
    fn announce_winner(&mut self, _seat: SeatId) {}
}
