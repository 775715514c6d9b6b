//! Turn-ordered state machine over the board.
//!
//! The engine owns the [`Board`] and a [`Presenter`]. It enforces whose turn
//! it is, dispatches accepted actions to the board, and publishes the
//! resulting state. Rejected actions never touch the board and are reported
//! to the acting seat only.

use crate::games::quoridor::{
    Action, ActionError, Board, Player, SeatId, Seats, Transition, WallSegment,
};
use crate::presenter::Presenter;
use tracing::{debug, info, instrument, warn};

/// Authoritative game engine.
///
/// The state machine is `AwaitingMove(seat)`, rotating through the seats in
/// ascending order. Only an accepted action by the current seat moves it on.
/// A pawn reaching its goal edge resets the board in place and publishes
/// the full starting state.
#[derive(Debug)]
pub struct TurnEngine<P> {
    board: Board,
    presenter: P,
}

impl<P: Presenter> TurnEngine<P> {
    /// Creates an engine over an existing board.
    pub fn new(board: Board, presenter: P) -> Self {
        Self { board, presenter }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Mutable access to the presenter.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Seat holding the turn.
    pub fn current_seat(&self) -> SeatId {
        self.board.current_player().id()
    }

    /// Applies any action on behalf of `seat`.
    pub fn submit(&mut self, seat: SeatId, action: Action) -> Result<Transition, ActionError> {
        match action {
            Action::MovePawn { x, y } => self.move_pawn(seat, x, y),
            Action::PlaceWall(segment) => self.place_wall(seat, segment),
            Action::RemoveWall(segment) => self.remove_wall(seat, segment),
        }
    }

    /// Moves `seat`'s pawn to `(x, y)`.
    ///
    /// Publishes the pawn, the mover's stats and the new current seat. If the
    /// pawn reached its goal edge the whole board is reset and republished.
    #[instrument(skip(self), fields(current = self.current_seat()))]
    pub fn move_pawn(&mut self, seat: SeatId, x: u8, y: u8) -> Result<Transition, ActionError> {
        self.check_turn(seat)?;
        let won = self
            .board
            .move_pawn(x, y)
            .map_err(|e| self.reject(seat, e))?;

        let mover = self.board.previous_player().clone();
        self.presenter
            .update_pawn_position(mover.x(), mover.y(), mover.id());
        self.publish_stats(&mover);

        if won {
            info!(winner = mover.id(), "Goal edge reached, restarting game");
            self.presenter.announce_winner(mover.id());
            self.reset_game();
            return Ok(Transition::Reset { winner: mover.id() });
        }

        self.presenter.update_current_player(self.current_seat());
        Ok(Transition::Advanced {
            acted: mover.id(),
            next: self.current_seat(),
        })
    }

    /// Places a wall for `seat`.
    ///
    /// Publishes the wall, the placer's stats and the new current seat.
    #[instrument(skip(self), fields(current = self.current_seat(), %segment))]
    pub fn place_wall(
        &mut self,
        seat: SeatId,
        segment: WallSegment,
    ) -> Result<Transition, ActionError> {
        self.check_turn(seat)?;
        self.board
            .place_wall(segment)
            .map_err(|e| self.reject(seat, e))?;

        let placer = self.board.previous_player().clone();
        self.presenter.display_wall(segment, placer.id());
        self.publish_stats(&placer);
        self.presenter.update_current_player(self.current_seat());

        Ok(Transition::Advanced {
            acted: placer.id(),
            next: self.current_seat(),
        })
    }

    /// Removes a wall as `seat`'s action.
    ///
    /// Publishes the removal, every seat's stats and the new current seat.
    #[instrument(skip(self), fields(current = self.current_seat(), %segment))]
    pub fn remove_wall(
        &mut self,
        seat: SeatId,
        segment: WallSegment,
    ) -> Result<Transition, ActionError> {
        self.check_turn(seat)?;
        let removed = self
            .board
            .remove_wall(segment)
            .map_err(|e| self.reject(seat, e))?;
        debug!(owner = removed.owner(), "Wall taken off the board");

        self.presenter.remove_wall_display(segment);
        for player in self.board.players() {
            self.presenter
                .update_stats(player.move_count(), player.wall_count(), player.id());
        }
        self.presenter.update_current_player(self.current_seat());

        Ok(Transition::Advanced {
            acted: seat,
            next: self.current_seat(),
        })
    }

    /// Highlights and returns the current seat's legal destinations.
    #[instrument(skip(self), fields(current = self.current_seat()))]
    pub fn available_moves(&mut self) -> Vec<(u8, u8)> {
        let moves: Vec<_> = self
            .board
            .occupiable_positions(self.current_seat())
            .map(|pos| (pos.x(), pos.y()))
            .collect();

        for &(x, y) in &moves {
            self.presenter.highlight_availability(x, y);
        }
        debug!(count = moves.len(), "Available moves published");
        moves
    }

    /// Sends every pawn's coordinates, in seat order, to `seat`.
    #[instrument(skip(self))]
    pub fn start_coordinates(&mut self, seat: SeatId) -> Vec<(u8, u8)> {
        let positions: Vec<_> = self
            .board
            .players()
            .iter()
            .map(Player::coordinates)
            .collect();
        self.presenter.set_initial_positions(seat, &positions);
        positions
    }

    /// Resets the board and publishes the whole starting state.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self) {
        self.board.reset_game();
        for player in self.board.players() {
            self.presenter
                .update_stats(player.move_count(), player.wall_count(), player.id());
            self.presenter
                .update_pawn_position(player.x(), player.y(), player.id());
        }
        self.presenter.reset_walls();
        self.presenter.update_current_player(self.current_seat());
    }

    /// Reports a rule violation to `seat` and hands the error back.
    pub fn reject(&mut self, seat: SeatId, error: ActionError) -> ActionError {
        warn!(seat, %error, "Action rejected");
        self.presenter.display_error(seat, &error.to_string());
        error
    }

    fn check_turn(&mut self, seat: SeatId) -> Result<(), ActionError> {
        if seat == self.current_seat() {
            Ok(())
        } else {
            Err(self.reject(seat, ActionError::OutOfTurn))
        }
    }

    fn publish_stats(&mut self, player: &Player) {
        self.presenter
            .update_stats(player.move_count(), player.wall_count(), player.id());
    }
}

/// Hot-seat front end: whoever calls acts as the seat holding the turn.
#[derive(Debug)]
pub struct LocalGame<P> {
    engine: TurnEngine<P>,
}

impl<P: Presenter> LocalGame<P> {
    /// Starts a fresh local game.
    #[instrument(skip(presenter))]
    pub fn new(seats: Seats, presenter: P) -> Self {
        info!(seats = seats.count(), "Starting local game");
        Self {
            engine: TurnEngine::new(Board::new(seats), presenter),
        }
    }

    /// The underlying engine.
    pub fn engine(&self) -> &TurnEngine<P> {
        &self.engine
    }

    /// The board.
    pub fn board(&self) -> &Board {
        self.engine.board()
    }

    /// The presenter.
    pub fn presenter(&self) -> &P {
        self.engine.presenter()
    }

    /// Moves the current seat's pawn.
    pub fn move_pawn(&mut self, x: u8, y: u8) -> Result<Transition, ActionError> {
        let seat = self.engine.current_seat();
        self.engine.move_pawn(seat, x, y)
    }

    /// Places a wall for the current seat.
    pub fn place_wall(&mut self, segment: WallSegment) -> Result<Transition, ActionError> {
        let seat = self.engine.current_seat();
        self.engine.place_wall(seat, segment)
    }

    /// Removes a wall as the current seat's action.
    pub fn remove_wall(&mut self, segment: WallSegment) -> Result<Transition, ActionError> {
        let seat = self.engine.current_seat();
        self.engine.remove_wall(seat, segment)
    }

    /// Applies any action for the current seat.
    pub fn apply(&mut self, action: Action) -> Result<Transition, ActionError> {
        let seat = self.engine.current_seat();
        self.engine.submit(seat, action)
    }

    /// Highlights the current seat's legal destinations.
    pub fn available_moves(&mut self) -> Vec<(u8, u8)> {
        self.engine.available_moves()
    }

    /// Publishes the pawn layout to the local view.
    pub fn start_coordinates(&mut self) -> Vec<(u8, u8)> {
        let seat = self.engine.current_seat();
        self.engine.start_coordinates(seat)
    }

    /// Resets the board.
    pub fn reset_game(&mut self) {
        self.engine.reset_game()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::quoridor::Orientation;

    /// Presenter that records every call as a protocol-like line.
    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Presenter for Recorder {
        fn update_move_count(&mut self, count: u32, seat: SeatId) {
            self.calls.push(format!("moves {} {}", count, seat));
        }
        fn update_wall_count(&mut self, count: u8, seat: SeatId) {
            self.calls.push(format!("walls {} {}", count, seat));
        }
        fn update_pawn_position(&mut self, x: u8, y: u8, seat: SeatId) {
            self.calls.push(format!("pawn {} {} {}", x, y, seat));
        }
        fn update_current_player(&mut self, seat: SeatId) {
            self.calls.push(format!("currentPlayer {}", seat));
        }
        fn display_wall(&mut self, segment: WallSegment, seat: SeatId) {
            self.calls.push(format!("wall {} {}", segment, seat));
        }
        fn remove_wall_display(&mut self, segment: WallSegment) {
            self.calls.push(format!("remove-wall-display {}", segment));
        }
        fn highlight_availability(&mut self, x: u8, y: u8) {
            self.calls.push(format!("highlight {} {}", x, y));
        }
        fn display_error(&mut self, seat: SeatId, text: &str) {
            self.calls.push(format!("error@{} {}", seat, text));
        }
        fn reset_walls(&mut self) {
            self.calls.push("reset".to_string());
        }
        fn set_initial_positions(&mut self, seat: SeatId, positions: &[(u8, u8)]) {
            self.calls.push(format!("coordinate@{} {:?}", seat, positions));
        }
        fn announce_winner(&mut self, seat: SeatId) {
            self.calls.push(format!("winner {}", seat));
        }
    }

    fn engine() -> TurnEngine<Recorder> {
        TurnEngine::new(Board::default(), Recorder::default())
    }

    fn drain(engine: &mut TurnEngine<Recorder>) -> Vec<String> {
        std::mem::take(&mut engine.presenter_mut().calls)
    }

    #[test]
    fn test_accepted_move_publishes_delta() {
        let mut engine = engine();
        let transition = engine.move_pawn(1, 4, 1).unwrap();

        assert_eq!(transition, Transition::Advanced { acted: 1, next: 2 });
        assert_eq!(
            drain(&mut engine),
            vec![
                "pawn 4 1 1",
                "moves 1 1",
                "walls 10 1",
                "currentPlayer 2",
            ]
        );
    }

    #[test]
    fn test_out_of_turn_never_touches_board() {
        let mut engine = engine();
        let before = engine.board().clone();

        assert_eq!(engine.move_pawn(2, 4, 7), Err(ActionError::OutOfTurn));
        assert_eq!(engine.board(), &before);
        assert_eq!(drain(&mut engine), vec!["error@2 It isn't your turn."]);
    }

    #[test]
    fn test_rule_violation_reported_to_actor() {
        let mut engine = engine();
        assert_eq!(engine.move_pawn(1, 4, 3), Err(ActionError::InvalidMove));
        assert_eq!(drain(&mut engine), vec!["error@1 That isn't a valid move"]);
        assert_eq!(engine.current_seat(), 1);
    }

    #[test]
    fn test_wall_publishes_placer_stats() {
        let mut engine = engine();
        engine
            .place_wall(1, WallSegment::new(3, 2, Orientation::Vertical))
            .unwrap();
        assert_eq!(
            drain(&mut engine),
            vec![
                "wall 3 2 VERTICAL 1",
                "moves 1 1",
                "walls 9 1",
                "currentPlayer 2",
            ]
        );
    }

    #[test]
    fn test_remove_wall_publishes_every_seat() {
        let mut engine = engine();
        let wall = WallSegment::new(3, 2, Orientation::Vertical);
        engine.place_wall(1, wall).unwrap();
        drain(&mut engine);

        engine.remove_wall(2, wall).unwrap();
        assert_eq!(
            drain(&mut engine),
            vec![
                "remove-wall-display 3 2 VERTICAL",
                "moves 1 1",
                "walls 9 1",
                "moves 1 2",
                "walls 10 2",
                "currentPlayer 1",
            ]
        );
    }

    #[test]
    fn test_goal_resets_and_republishes() {
        let mut engine = engine();
        let seat_two_path = [(3, 8), (3, 7), (3, 6), (3, 5), (3, 4), (3, 3), (3, 2)];
        for (step, (x, y)) in (1..8u8).zip(seat_two_path) {
            engine.move_pawn(1, 4, step).unwrap();
            engine.move_pawn(2, x, y).unwrap();
        }
        engine
            .place_wall(1, WallSegment::new(0, 0, Orientation::Vertical))
            .unwrap();
        engine.move_pawn(2, 3, 1).unwrap();
        drain(&mut engine);

        assert_eq!(
            engine.move_pawn(1, 4, 8),
            Ok(Transition::Reset { winner: 1 })
        );
        assert_eq!(engine.board(), &Board::default());
        assert_eq!(
            drain(&mut engine),
            vec![
                "pawn 4 8 1",
                "moves 9 1",
                "walls 9 1",
                "winner 1",
                "moves 0 1",
                "walls 10 1",
                "pawn 4 0 1",
                "moves 0 2",
                "walls 10 2",
                "pawn 4 8 2",
                "reset",
                "currentPlayer 1",
            ]
        );
    }

    #[test]
    fn test_local_game_acts_for_current_seat() {
        let mut game = LocalGame::new(Seats::Two, Recorder::default());
        game.move_pawn(4, 1).unwrap();
        game.move_pawn(4, 7).unwrap();
        assert_eq!(game.board().current_player().id(), 1);
        assert_eq!(game.available_moves(), vec![(3, 1), (5, 1), (4, 0), (4, 2)]);
    }
}
