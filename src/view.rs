//! Headless view model.
//!
//! Keeps what a screen would show and applies the transient effects:
//! highlights and error text revert after a fixed window. Reverts are
//! one-shot and never cancelled, so an older revert firing after a newer
//! effect clears that newer effect too.

use crate::games::quoridor::{GRID_SIZE, Orientation, SeatId, WallSegment};
use crate::presenter::Presenter;
use derive_getters::Getters;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info};

/// How long highlights and error text stay up.
pub const EFFECT_WINDOW: Duration = Duration::from_millis(1000);

/// What the view currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct ViewState {
    /// Move and wall counters per seat.
    stats: BTreeMap<SeatId, (u32, u8)>,
    /// Pawn cells per seat.
    pawns: BTreeMap<SeatId, (u8, u8)>,
    /// Seat holding the turn.
    current: Option<SeatId>,
    /// Walls on display and who placed them.
    walls: BTreeMap<WallSegment, SeatId>,
    /// Highlighted cells.
    highlights: BTreeSet<(u8, u8)>,
    /// Error text, empty when none.
    error: String,
    /// Last seat to reach its goal.
    winner: Option<SeatId>,
}

impl ViewState {
    /// Draws the grid: seat digits for pawns, `*` for highlights, `|` and
    /// `-` for walls, followed by the counters and any error. Seats past 9
    /// are drawn as `?`.
    pub fn render(&self) -> String {
        let mut right = BTreeSet::new();
        let mut below = BTreeSet::new();
        for segment in self.walls.keys() {
            let (x, y) = (segment.x(), segment.y());
            match segment.orientation() {
                Orientation::Vertical => {
                    right.insert((x, y));
                    right.insert((x, y + 1));
                }
                Orientation::Horizontal => {
                    below.insert((x, y));
                    below.insert((x + 1, y));
                }
            }
        }

        let mut out = String::new();
        for y in 0..GRID_SIZE {
            let mut under = String::new();
            for x in 0..GRID_SIZE {
                let cell = self
                    .pawns
                    .iter()
                    .find(|(_, at)| **at == (x, y))
                    .map(|(seat, _)| char::from_digit(u32::from(*seat), 10).unwrap_or('?'))
                    .unwrap_or(if self.highlights.contains(&(x, y)) { '*' } else { '.' });
                out.push(cell);
                under.push(if below.contains(&(x, y)) { '-' } else { ' ' });
                if x + 1 < GRID_SIZE {
                    out.push(if right.contains(&(x, y)) { '|' } else { ' ' });
                    under.push(' ');
                }
            }
            out.push('\n');
            if y + 1 < GRID_SIZE {
                out.push_str(under.trim_end());
                out.push('\n');
            }
        }

        for (seat, (moves, walls)) in &self.stats {
            let marker = if self.current == Some(*seat) { '>' } else { ' ' };
            out.push_str(&format!(
                "{} seat {}: {} moves, {} walls\n",
                marker, seat, moves, walls
            ));
        }
        if !self.error.is_empty() {
            out.push_str(&format!("! {}\n", self.error));
        }
        out
    }
}

/// [`Presenter`] over a shared [`ViewState`].
///
/// Clones share the same state. Reverts need a tokio runtime; without one
/// the effect simply stays until overwritten.
#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    state: Arc<Mutex<ViewState>>,
}

impl ViewModel {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ViewState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn revert_later(&self, revert: impl FnOnce(&mut ViewState) + Send + 'static) {
        let Ok(runtime) = Handle::try_current() else {
            debug!("No runtime, transient effect stays");
            return;
        };
        let state = Arc::clone(&self.state);
        runtime.spawn(async move {
            tokio::time::sleep(EFFECT_WINDOW).await;
            let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
            revert(&mut *guard);
        });
    }
}

impl Presenter for ViewModel {
    fn update_move_count(&mut self, count: u32, seat: SeatId) {
        self.lock().stats.entry(seat).or_default().0 = count;
    }

    fn update_wall_count(&mut self, count: u8, seat: SeatId) {
        self.lock().stats.entry(seat).or_default().1 = count;
    }

    fn update_pawn_position(&mut self, x: u8, y: u8, seat: SeatId) {
        self.lock().pawns.insert(seat, (x, y));
    }

    fn update_current_player(&mut self, seat: SeatId) {
        self.lock().current = Some(seat);
    }

    fn display_wall(&mut self, segment: WallSegment, seat: SeatId) {
        self.lock().walls.insert(segment, seat);
    }

    fn remove_wall_display(&mut self, segment: WallSegment) {
        self.lock().walls.remove(&segment);
    }

    fn highlight_availability(&mut self, x: u8, y: u8) {
        self.lock().highlights.insert((x, y));
        self.revert_later(|state| state.highlights.clear());
    }

    fn display_error(&mut self, _seat: SeatId, text: &str) {
        self.lock().error = text.to_string();
        self.revert_later(|state| state.error.clear());
    }

    fn reset_walls(&mut self) {
        self.lock().walls.clear();
    }

    fn set_initial_positions(&mut self, _seat: SeatId, positions: &[(u8, u8)]) {
        let mut state = self.lock();
        for (seat, &at) in (1..=SeatId::MAX).zip(positions) {
            state.pawns.insert(seat, at);
        }
    }

    fn announce_winner(&mut self, seat: SeatId) {
        info!(seat, "Seat reached its goal");
        self.lock().winner = Some(seat);
    }
}
