//! Tests for the engine driving a view, locally and through protocol replay.

use strictly_quoridor::{
    ActionError, Board, LineCodec, LocalGame, Orientation, Seats, ServerMessage, Transition,
    TurnEngine, ViewModel, WallSegment,
};

/// Walks seat 1 down column 4 while seat 2 walks column 3, stopping one
/// step short of seat 1's goal with seat 1 to move.
fn play_to_brink(game: &mut LocalGame<ViewModel>) {
    let seat_two_path = [(3, 8), (3, 7), (3, 6), (3, 5), (3, 4), (3, 3), (3, 2)];
    for (step, (x, y)) in (1..8u8).zip(seat_two_path) {
        game.move_pawn(4, step).unwrap();
        game.move_pawn(x, y).unwrap();
    }
}

#[test]
fn test_local_move_updates_view() {
    let view = ViewModel::new();
    let mut game = LocalGame::new(Seats::Two, view.clone());

    assert_eq!(
        game.move_pawn(4, 1),
        Ok(Transition::Advanced { acted: 1, next: 2 })
    );
    let state = view.snapshot();
    assert_eq!(state.pawns().get(&1), Some(&(4, 1)));
    assert_eq!(state.stats().get(&1), Some(&(1, 10)));
    assert_eq!(*state.current(), Some(2));
}

#[test]
fn test_local_rejection_shows_error() {
    let view = ViewModel::new();
    let mut game = LocalGame::new(Seats::Two, view.clone());

    assert_eq!(game.move_pawn(0, 0), Err(ActionError::InvalidMove));
    assert_eq!(view.snapshot().error(), "That isn't a valid move");
    assert_eq!(*view.snapshot().current(), None);
}

#[test]
fn test_local_win_announced_then_reset() {
    let view = ViewModel::new();
    let mut game = LocalGame::new(Seats::Two, view.clone());
    play_to_brink(&mut game);
    game.place_wall(WallSegment::new(0, 0, Orientation::Horizontal))
        .unwrap();
    game.move_pawn(3, 1).unwrap();

    assert_eq!(game.move_pawn(4, 8), Ok(Transition::Reset { winner: 1 }));
    assert_eq!(game.board(), &Board::default());

    let state = view.snapshot();
    assert_eq!(*state.winner(), Some(1));
    assert!(state.walls().is_empty());
    assert_eq!(state.pawns().get(&1), Some(&(4, 0)));
    assert_eq!(state.pawns().get(&2), Some(&(4, 8)));
    assert_eq!(state.stats().get(&1), Some(&(0, 10)));
    assert_eq!(*state.current(), Some(1));
}

#[test]
fn test_exhausted_walls_rejected() {
    let mut engine = TurnEngine::new(Board::with_walls(Seats::Two, 1), ViewModel::new());
    engine
        .place_wall(1, WallSegment::new(0, 0, Orientation::Vertical))
        .unwrap();
    engine.move_pawn(2, 4, 7).unwrap();

    assert_eq!(
        engine.place_wall(1, WallSegment::new(5, 5, Orientation::Vertical)),
        Err(ActionError::NoWallsRemaining)
    );
    assert_eq!(engine.presenter().snapshot().error(), "You have no remaining walls");
    assert_eq!(engine.board().player(1).map(|p| p.wall_count()), Some(0));
    assert_eq!(engine.current_seat(), 1);
}

#[test]
fn test_replayed_lines_reproduce_view() {
    let view = ViewModel::new();
    let mut game = LocalGame::new(Seats::Two, view.clone());
    game.move_pawn(4, 1).unwrap();
    game.place_wall(WallSegment::new(3, 2, Orientation::Horizontal))
        .unwrap();

    let lines = [
        "pawn 4 1 1",
        "stats 1 10 1",
        "currentPlayer 2",
        "wall 3 2 HORIZONTAL 2",
        "stats 1 9 2",
        "currentPlayer 1",
    ];
    let mut replica = ViewModel::new();
    for line in lines {
        let message = ServerMessage::decode(line).unwrap().unwrap();
        message.apply(&mut replica, 1);
    }

    let (local, remote) = (view.snapshot(), replica.snapshot());
    assert_eq!(local.walls(), remote.walls());
    assert_eq!(local.stats().get(&1), remote.stats().get(&1));
    assert_eq!(local.stats().get(&2), remote.stats().get(&2));
    assert_eq!(local.pawns().get(&1), remote.pawns().get(&1));
    assert_eq!(local.current(), remote.current());
}
