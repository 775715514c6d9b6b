//! Timing tests for transient view effects, on tokio's paused clock.

use std::time::Duration;
use strictly_quoridor::{EFFECT_WINDOW, Presenter, ViewModel};
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn test_error_text_reverts_after_window() {
    let mut view = ViewModel::new();
    view.display_error(1, "That isn't a valid move");
    assert_eq!(view.snapshot().error(), "That isn't a valid move");

    sleep(EFFECT_WINDOW + Duration::from_millis(1)).await;
    assert_eq!(view.snapshot().error(), "");
}

#[tokio::test(start_paused = true)]
async fn test_older_revert_clobbers_newer_error() {
    let mut view = ViewModel::new();
    view.display_error(1, "Position is occupied");

    sleep(Duration::from_millis(500)).await;
    view.display_error(1, "You have no remaining walls");
    assert_eq!(view.snapshot().error(), "You have no remaining walls");

    // The first revert fires at 1000ms and clears the second message early.
    sleep(Duration::from_millis(501)).await;
    assert_eq!(view.snapshot().error(), "");
}

#[tokio::test(start_paused = true)]
async fn test_highlight_revert_clears_every_cell() {
    let mut view = ViewModel::new();
    view.highlight_availability(3, 0);
    sleep(Duration::from_millis(900)).await;
    view.highlight_availability(5, 0);
    assert_eq!(view.snapshot().highlights().len(), 2);

    sleep(Duration::from_millis(101)).await;
    assert!(view.snapshot().highlights().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_board_state_is_not_transient() {
    let mut view = ViewModel::new();
    view.update_pawn_position(4, 1, 1);
    view.update_stats(1, 10, 1);

    sleep(EFFECT_WINDOW * 3).await;
    let state = view.snapshot();
    assert_eq!(state.pawns().get(&1), Some(&(4, 1)));
    assert_eq!(state.stats().get(&1), Some(&(1, 10)));
}
