//! The 9×9 board: cells, seats, walls and turn bookkeeping.

use super::action::ActionError;
use super::invariants::{BoardInvariants, InvariantSet};
use super::types::{
    GRID_SIZE, PlacedWall, Player, Position, STARTING_WALLS, SeatId, Seats, Side, WallSegment,
};
use strum::IntoEnumIterator;
use tracing::{debug, instrument, warn};

/// Authoritative board state.
///
/// Owns all 81 positions, the seats, and the walls on the board. Every
/// mutating operation either applies completely or returns an error with
/// the board untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Cells in row-major order, indexed `[y][x]`.
    positions: [[Position; GRID_SIZE as usize]; GRID_SIZE as usize],
    seats: Seats,
    players: Vec<Player>,
    current: usize,
    walls: Vec<PlacedWall>,
}

impl Board {
    /// Creates a board for the given table size with the standard wall supply.
    #[instrument]
    pub fn new(seats: Seats) -> Self {
        Self::with_walls(seats, STARTING_WALLS)
    }

    /// Creates a board with a custom wall supply (capped at 10).
    #[instrument]
    pub fn with_walls(seats: Seats, walls_per_seat: u8) -> Self {
        let walls_per_seat = walls_per_seat.min(STARTING_WALLS);
        let positions = std::array::from_fn(|y| std::array::from_fn(|x| Position::new(x as u8, y as u8)));
        let players = seats
            .ids()
            .filter_map(|id| {
                Seats::layout(id).map(|(start, goal)| Player::new(id, start, goal, walls_per_seat))
            })
            .collect();

        debug!(seats = seats.count(), walls_per_seat, "Created board");
        Self {
            positions,
            seats,
            players,
            current: 0,
            walls: Vec::new(),
        }
    }

    /// Returns the cell at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::OutOfRange`] if either coordinate is off the grid.
    pub fn position(&self, x: u8, y: u8) -> Result<&Position, ActionError> {
        self.positions
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .ok_or(ActionError::OutOfRange { x, y })
    }

    /// All cells in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter().flatten()
    }

    /// Table size this board was created for.
    pub fn seats(&self) -> Seats {
        self.seats
    }

    /// Seats in turn order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Looks up a seat by id.
    pub fn player(&self, seat: SeatId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == seat)
    }

    /// Walls currently on the board, oldest first.
    pub fn walls(&self) -> &[PlacedWall] {
        &self.walls
    }

    /// The seat whose turn it is.
    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    /// The seat that made the most recent accepted action.
    pub fn previous_player(&self) -> &Player {
        let n = self.players.len();
        &self.players[(self.current + n - 1) % n]
    }

    /// Seat whose pawn stands on `(x, y)`, if any.
    pub fn occupant(&self, x: u8, y: u8) -> Option<SeatId> {
        self.players
            .iter()
            .find(|p| p.coordinates() == (x, y))
            .map(Player::id)
    }

    /// Cells a seat could step into right now.
    ///
    /// Orthogonal neighbours that are on the grid, not held by another pawn,
    /// and not cut off by a wall flag on either side of the shared edge.
    /// The returned iterator is cheap to clone and can be walked again.
    pub fn occupiable_positions(
        &self,
        seat: SeatId,
    ) -> impl Iterator<Item = &Position> + Clone + '_ {
        let origin = self
            .player(seat)
            .and_then(|p| self.position(p.x(), p.y()).ok());

        origin.into_iter().flat_map(move |from| {
            Side::iter().filter_map(move |side| {
                if from.has_wall(side) {
                    return None;
                }
                let (nx, ny) = side.step(from.x(), from.y())?;
                let to = self.position(nx, ny).ok()?;
                if to.has_wall(side.opposite()) || self.occupant(nx, ny).is_some() {
                    return None;
                }
                Some(to)
            })
        })
    }

    /// Moves the current seat's pawn.
    ///
    /// Returns `true` when the destination is on the seat's goal edge.
    ///
    /// # Errors
    ///
    /// - [`ActionError::OutOfRange`] for coordinates off the grid
    /// - [`ActionError::PositionOccupied`] if another pawn stands there
    /// - [`ActionError::InvalidMove`] if the cell is not adjacent or is walled off
    #[instrument(skip(self), fields(seat = self.current_player().id()))]
    pub fn move_pawn(&mut self, x: u8, y: u8) -> Result<bool, ActionError> {
        let target = *self.position(x, y)?;
        let seat = self.current_player().id();

        if self.occupant(x, y).is_some_and(|other| other != seat) {
            warn!(x, y, "Destination occupied");
            return Err(ActionError::PositionOccupied);
        }

        let reachable = self
            .occupiable_positions(seat)
            .any(|pos| pos.x() == x && pos.y() == y);
        if !reachable {
            warn!(x, y, "Destination not reachable");
            return Err(ActionError::InvalidMove);
        }

        let player = &mut self.players[self.current];
        player.move_to(x, y);
        let won = target.is_on(player.goal());
        debug!(x, y, move_count = player.move_count(), won, "Pawn moved");

        self.advance();
        self.debug_check();
        Ok(won)
    }

    /// Places a wall for the current seat.
    ///
    /// # Errors
    ///
    /// - [`ActionError::NoWallsRemaining`] if the seat's supply is exhausted
    /// - [`ActionError::OutOfRange`] if the 2×2 block leaves the grid
    /// - [`ActionError::WallOverlap`] if it touches an existing wall
    #[instrument(skip(self), fields(seat = self.current_player().id()))]
    pub fn place_wall(&mut self, segment: WallSegment) -> Result<(), ActionError> {
        if !self.current_player().has_walls() {
            warn!("No walls remaining");
            return Err(ActionError::NoWallsRemaining);
        }
        if !segment.in_range() {
            return Err(ActionError::OutOfRange {
                x: segment.x(),
                y: segment.y(),
            });
        }
        if self
            .walls
            .iter()
            .any(|placed| placed.segment().conflicts_with(&segment))
        {
            warn!(%segment, "Wall overlaps an existing wall");
            return Err(ActionError::WallOverlap);
        }

        self.set_flags(segment, true);
        let player = &mut self.players[self.current];
        player.spend_wall();
        self.walls.push(PlacedWall::new(segment, player.id()));
        debug!(
            %segment,
            wall_count = player.wall_count(),
            move_count = player.move_count(),
            "Wall placed"
        );

        self.advance();
        self.debug_check();
        Ok(())
    }

    /// Takes a wall off the board as the current seat's action.
    ///
    /// The wall is not returned to its owner's supply.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::WallNotFound`] if no wall with exactly this
    /// top-left and orientation is on the board.
    #[instrument(skip(self), fields(seat = self.current_player().id()))]
    pub fn remove_wall(&mut self, segment: WallSegment) -> Result<PlacedWall, ActionError> {
        let index = self
            .walls
            .iter()
            .position(|placed| placed.segment() == segment)
            .ok_or(ActionError::WallNotFound)?;

        let removed = self.walls.remove(index);
        self.set_flags(segment, false);
        self.players[self.current].count_move();
        debug!(%segment, owner = removed.owner(), "Wall removed");

        self.advance();
        self.debug_check();
        Ok(removed)
    }

    /// Clears every recorded wall flag.
    #[instrument(skip(self), fields(walls = self.walls.len()))]
    pub fn reset_walled_off_positions(&mut self) {
        for placed in std::mem::take(&mut self.walls) {
            self.set_flags(placed.segment(), false);
        }
    }

    /// Restores the starting layout: walls cleared, pawns home, counters
    /// reset, seat 1 to move.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self) {
        self.reset_walled_off_positions();
        for player in &mut self.players {
            player.reset();
        }
        self.current = 0;
        debug!("Board reset");
        self.debug_check();
    }

    /// Formats the board as text, pawns as seat digits and walls as `|`/`-`.
    pub fn display(&self) -> String {
        let mut out = String::new();
        for (y, row) in self.positions.iter().enumerate() {
            let mut below = String::new();
            for (x, cell) in row.iter().enumerate() {
                match self.occupant(x as u8, y as u8) {
                    Some(seat) => out.push_str(&seat.to_string()),
                    None => out.push('.'),
                }
                below.push(if cell.has_wall(Side::Bottom) { '-' } else { ' ' });
                if x + 1 < row.len() {
                    out.push(if cell.has_wall(Side::Right) { '|' } else { ' ' });
                    below.push(' ');
                }
            }
            out.push('\n');
            if y + 1 < self.positions.len() {
                out.push_str(below.trim_end());
                out.push('\n');
            }
        }
        out
    }

    fn set_flags(&mut self, segment: WallSegment, present: bool) {
        for (x, y, side) in segment.covered() {
            self.positions[y as usize][x as usize].set_wall(side, present);
        }
    }

    fn advance(&mut self) {
        self.current = (self.current + 1) % self.players.len();
    }

    fn debug_check(&self) {
        if cfg!(debug_assertions)
            && let Err(violations) = BoardInvariants::check_all(self)
        {
            panic!("Board invariants violated: {:?}", violations);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Seats::Two)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::quoridor::Orientation;

    fn flag_count(board: &Board) -> usize {
        board.positions().map(Position::wall_flag_count).sum()
    }

    #[test]
    fn test_new_board_layout() {
        let board = Board::new(Seats::Two);
        assert_eq!(board.seats(), Seats::Two);
        assert_eq!(board.positions().count(), 81);
        assert_eq!(board.current_player().id(), 1);
        assert_eq!(board.previous_player().id(), 2);
        assert_eq!(board.player(1).map(Player::coordinates), Some((4, 0)));
        assert_eq!(board.player(2).map(Player::coordinates), Some((4, 8)));
        assert!(board.players().iter().all(|p| p.wall_count() == 10));
    }

    #[test]
    fn test_position_out_of_range() {
        let board = Board::default();
        assert!(board.position(8, 8).is_ok());
        assert_eq!(board.position(9, 0), Err(ActionError::OutOfRange { x: 9, y: 0 }));
    }

    #[test]
    fn test_occupiable_positions_from_top_edge() {
        let board = Board::default();
        let mut cells: Vec<_> = board
            .occupiable_positions(1)
            .map(|p| (p.x(), p.y()))
            .collect();
        cells.sort();
        assert_eq!(cells, vec![(3, 0), (4, 1), (5, 0)]);
    }

    #[test]
    fn test_occupiable_positions_is_restartable() {
        let board = Board::default();
        let moves = board.occupiable_positions(1);
        assert_eq!(moves.clone().count(), moves.count());
    }

    #[test]
    fn test_walls_on_either_side_block_movement() {
        let mut board = Board::default();
        // Seat 1 walls the edge below itself (between rows 0 and 1).
        board
            .place_wall(WallSegment::new(4, 0, Orientation::Horizontal))
            .unwrap();
        let reachable: Vec<_> = board.occupiable_positions(1).map(|p| (p.x(), p.y())).collect();
        assert!(!reachable.contains(&(4, 1)));
    }

    #[test]
    fn test_occupied_neighbour_excluded() {
        let mut board = Board::default();
        // Walk the pawns face to face: seat 1 ends on (4,4), seat 2 on (4,5).
        for (x, y) in [(4, 1), (4, 7), (4, 2), (4, 6), (4, 3), (4, 5), (4, 4)] {
            board.move_pawn(x, y).unwrap();
        }
        let reachable: Vec<_> = board.occupiable_positions(2).map(|p| (p.x(), p.y())).collect();
        assert!(!reachable.contains(&(4, 4)));
        assert_eq!(board.move_pawn(4, 4), Err(ActionError::PositionOccupied));
        assert_eq!(board.current_player().id(), 2);
    }

    #[test]
    fn test_move_pawn_advances_turn() {
        let mut board = Board::default();
        assert_eq!(board.move_pawn(4, 1), Ok(false));
        assert_eq!(board.player(1).map(Player::move_count), Some(1));
        assert_eq!(board.current_player().id(), 2);
        assert_eq!(board.previous_player().id(), 1);
    }

    #[test]
    fn test_rejected_move_leaves_board_unchanged() {
        let mut board = Board::default();
        let before = board.clone();
        assert_eq!(board.move_pawn(4, 2), Err(ActionError::InvalidMove));
        assert_eq!(board.move_pawn(5, 1), Err(ActionError::InvalidMove));
        assert_eq!(board.move_pawn(4, 0), Err(ActionError::InvalidMove));
        assert_eq!(board, before);
    }

    #[test]
    fn test_place_wall_flips_four_flags() {
        let mut board = Board::default();
        board
            .place_wall(WallSegment::new(3, 2, Orientation::Vertical))
            .unwrap();

        assert_eq!(flag_count(&board), 4);
        assert!(board.position(3, 2).unwrap().has_wall(Side::Right));
        assert!(board.position(4, 2).unwrap().has_wall(Side::Left));
        assert!(board.position(3, 3).unwrap().has_wall(Side::Right));
        assert!(board.position(4, 3).unwrap().has_wall(Side::Left));
        assert_eq!(board.player(1).map(Player::wall_count), Some(9));
        assert_eq!(board.player(1).map(Player::move_count), Some(1));
        assert_eq!(board.current_player().id(), 2);
    }

    #[test]
    fn test_place_wall_without_supply_fails() {
        let mut board = Board::with_walls(Seats::Two, 0);
        let before = board.clone();
        assert_eq!(
            board.place_wall(WallSegment::new(0, 0, Orientation::Vertical)),
            Err(ActionError::NoWallsRemaining)
        );
        assert_eq!(board, before);
        assert_eq!(flag_count(&board), 0);
    }

    #[test]
    fn test_overlapping_wall_rejected() {
        let mut board = Board::default();
        board
            .place_wall(WallSegment::new(3, 2, Orientation::Vertical))
            .unwrap();
        let before = board.clone();
        assert_eq!(
            board.place_wall(WallSegment::new(3, 2, Orientation::Horizontal)),
            Err(ActionError::WallOverlap)
        );
        assert_eq!(
            board.place_wall(WallSegment::new(3, 3, Orientation::Vertical)),
            Err(ActionError::WallOverlap)
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_wall_off_grid_rejected() {
        let mut board = Board::default();
        assert_eq!(
            board.place_wall(WallSegment::new(8, 0, Orientation::Vertical)),
            Err(ActionError::OutOfRange { x: 8, y: 0 })
        );
    }

    #[test]
    fn test_remove_wall_clears_group() {
        let mut board = Board::default();
        let wall = WallSegment::new(3, 2, Orientation::Vertical);
        board.place_wall(wall).unwrap();
        let removed = board.remove_wall(wall).unwrap();

        assert_eq!(removed.owner(), 1);
        assert_eq!(flag_count(&board), 0);
        assert_eq!(board.player(2).map(Player::move_count), Some(1));
        assert_eq!(board.player(1).map(Player::wall_count), Some(9));
        assert_eq!(board.current_player().id(), 1);
    }

    #[test]
    fn test_remove_missing_wall_fails() {
        let mut board = Board::default();
        assert_eq!(
            board.remove_wall(WallSegment::new(3, 2, Orientation::Vertical)),
            Err(ActionError::WallNotFound)
        );
        assert_eq!(board.current_player().id(), 1);
    }

    #[test]
    fn test_reaching_goal_edge_reports_win() {
        let mut board = Board::default();
        let seat_two_path = [(3, 8), (3, 7), (3, 6), (3, 5), (3, 4), (3, 3), (3, 2)];
        for (step, (x, y)) in (1..8u8).zip(seat_two_path) {
            assert_eq!(board.move_pawn(4, step), Ok(false));
            assert_eq!(board.move_pawn(x, y), Ok(false));
        }
        assert_eq!(board.move_pawn(4, 8), Ok(true));
    }

    #[test]
    fn test_reset_game_restores_start() {
        let mut board = Board::default();
        board.move_pawn(4, 1).unwrap();
        board
            .place_wall(WallSegment::new(0, 0, Orientation::Horizontal))
            .unwrap();
        board.reset_game();

        assert_eq!(board, Board::default());
        assert_eq!(flag_count(&board), 0);
    }

    #[test]
    fn test_four_seat_rotation() {
        let mut board = Board::new(Seats::Four);
        assert_eq!(board.player(3).map(Player::coordinates), Some((0, 4)));
        assert_eq!(board.player(4).map(Player::coordinates), Some((8, 4)));

        board.move_pawn(4, 1).unwrap();
        board.move_pawn(4, 7).unwrap();
        board.move_pawn(1, 4).unwrap();
        assert_eq!(board.current_player().id(), 4);
        board.move_pawn(7, 4).unwrap();
        assert_eq!(board.current_player().id(), 1);
    }

    #[test]
    fn test_display_marks_pawns_and_walls() {
        let mut board = Board::default();
        board
            .place_wall(WallSegment::new(0, 0, Orientation::Vertical))
            .unwrap();
        let text = board.display();
        let first = text.lines().next().unwrap();
        assert_eq!(first, ".|. . . 1 . . . .");
        assert!(text.lines().last().unwrap().contains('2'));
    }
}
