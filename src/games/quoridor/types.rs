//! Core domain types for the wall-and-pawn game.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Width and height of the logical grid.
pub const GRID_SIZE: u8 = 9;

/// Walls each seat starts with.
pub const STARTING_WALLS: u8 = 10;

/// Seat identifier (1-4).
pub type SeatId = u8;

/// Orientation of a wall segment.
///
/// Rendered on the wire as `VERTICAL` / `HORIZONTAL`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Orientation {
    /// Blocks movement between two columns.
    Vertical,
    /// Blocks movement between two rows.
    Horizontal,
}

/// Side of a cell a wall flag sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Side {
    /// Towards `x - 1`.
    Left,
    /// Towards `x + 1`.
    Right,
    /// Towards `y - 1`.
    Top,
    /// Towards `y + 1`.
    Bottom,
}

impl Side {
    /// The facing side of the neighbouring cell.
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }

    /// Coordinates of the neighbour across this side, if on the grid.
    pub fn step(self, x: u8, y: u8) -> Option<(u8, u8)> {
        let (nx, ny) = match self {
            Side::Left => (x.checked_sub(1)?, y),
            Side::Right => (x + 1, y),
            Side::Top => (x, y.checked_sub(1)?),
            Side::Bottom => (x, y + 1),
        };
        (nx < GRID_SIZE && ny < GRID_SIZE).then_some((nx, ny))
    }
}

/// Board edge a seat must reach to win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalEdge {
    /// Row `y == 0`.
    Top,
    /// Row `y == 8`.
    Bottom,
    /// Column `x == 0`.
    Left,
    /// Column `x == 8`.
    Right,
}

/// A single grid cell and the wall flags on its four sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    x: u8,
    y: u8,
    left_wall: bool,
    right_wall: bool,
    top_wall: bool,
    bottom_wall: bool,
}

impl Position {
    /// Creates an unwalled cell.
    pub fn new(x: u8, y: u8) -> Self {
        Self {
            x,
            y,
            left_wall: false,
            right_wall: false,
            top_wall: false,
            bottom_wall: false,
        }
    }

    /// Column.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Row.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Whether a wall flag is set on the given side.
    pub fn has_wall(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left_wall,
            Side::Right => self.right_wall,
            Side::Top => self.top_wall,
            Side::Bottom => self.bottom_wall,
        }
    }

    pub(super) fn set_wall(&mut self, side: Side, present: bool) {
        match side {
            Side::Left => self.left_wall = present,
            Side::Right => self.right_wall = present,
            Side::Top => self.top_wall = present,
            Side::Bottom => self.bottom_wall = present,
        }
    }

    /// Number of wall flags set on this cell.
    pub fn wall_flag_count(&self) -> usize {
        Side::iter().filter(|side| self.has_wall(*side)).count()
    }

    /// On the top row.
    pub fn is_top(&self) -> bool {
        self.y == 0
    }

    /// On the bottom row.
    pub fn is_bottom(&self) -> bool {
        self.y == GRID_SIZE - 1
    }

    /// On the left column.
    pub fn is_left(&self) -> bool {
        self.x == 0
    }

    /// On the right column.
    pub fn is_right(&self) -> bool {
        self.x == GRID_SIZE - 1
    }

    /// Whether this cell lies on the given goal edge.
    pub fn is_on(&self, edge: GoalEdge) -> bool {
        match edge {
            GoalEdge::Top => self.is_top(),
            GoalEdge::Bottom => self.is_bottom(),
            GoalEdge::Left => self.is_left(),
            GoalEdge::Right => self.is_right(),
        }
    }
}

/// Number of seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seats {
    /// Seats 1 and 2.
    Two,
    /// Seats 1 through 4.
    Four,
}

impl Seats {
    /// Number of seats.
    pub fn count(self) -> u8 {
        match self {
            Seats::Two => 2,
            Seats::Four => 4,
        }
    }

    /// Seat ids in turn order.
    pub fn ids(self) -> impl Iterator<Item = SeatId> + Clone {
        1..=self.count()
    }

    /// Starting cell and goal edge of a seat.
    pub fn layout(seat: SeatId) -> Option<((u8, u8), GoalEdge)> {
        match seat {
            1 => Some(((4, 0), GoalEdge::Bottom)),
            2 => Some(((4, 8), GoalEdge::Top)),
            3 => Some(((0, 4), GoalEdge::Right)),
            4 => Some(((8, 4), GoalEdge::Left)),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Seats {
    type Error = u8;

    fn try_from(count: u8) -> Result<Self, Self::Error> {
        match count {
            2 => Ok(Seats::Two),
            4 => Ok(Seats::Four),
            other => Err(other),
        }
    }
}

/// A seat's pawn and counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: SeatId,
    x: u8,
    y: u8,
    move_count: u32,
    wall_count: u8,
    start: (u8, u8),
    starting_walls: u8,
    goal: GoalEdge,
}

impl Player {
    /// Creates a seat at its starting cell.
    pub fn new(id: SeatId, start: (u8, u8), goal: GoalEdge, starting_walls: u8) -> Self {
        Self {
            id,
            x: start.0,
            y: start.1,
            move_count: 0,
            wall_count: starting_walls,
            start,
            starting_walls,
            goal,
        }
    }

    /// Seat id.
    pub fn id(&self) -> SeatId {
        self.id
    }

    /// Current column.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Current row.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Current cell as a pair.
    pub fn coordinates(&self) -> (u8, u8) {
        (self.x, self.y)
    }

    /// Accepted actions since the last reset.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Walls left to place.
    pub fn wall_count(&self) -> u8 {
        self.wall_count
    }

    /// Whether any walls remain.
    pub fn has_walls(&self) -> bool {
        self.wall_count > 0
    }

    /// Starting cell.
    pub fn start(&self) -> (u8, u8) {
        self.start
    }

    /// Edge this seat is racing towards.
    pub fn goal(&self) -> GoalEdge {
        self.goal
    }

    pub(super) fn move_to(&mut self, x: u8, y: u8) {
        self.x = x;
        self.y = y;
        self.move_count += 1;
    }

    pub(super) fn spend_wall(&mut self) {
        self.wall_count = self.wall_count.saturating_sub(1);
        self.move_count += 1;
    }

    pub(super) fn count_move(&mut self) {
        self.move_count += 1;
    }

    pub(super) fn reset(&mut self) {
        self.x = self.start.0;
        self.y = self.start.1;
        self.move_count = 0;
        self.wall_count = self.starting_walls;
    }
}

/// A wall addressed by the top-left cell of the 2×2 block it splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_new::new)]
pub struct WallSegment {
    x: u8,
    y: u8,
    orientation: Orientation,
}

impl WallSegment {
    /// Top-left column.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Top-left row.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Whether the whole 2×2 block lies on the grid.
    pub fn in_range(&self) -> bool {
        self.x < GRID_SIZE - 1 && self.y < GRID_SIZE - 1
    }

    /// The four `(x, y, side)` flags this segment sets.
    ///
    /// Only meaningful when [`in_range`](Self::in_range) holds.
    pub fn covered(&self) -> [(u8, u8, Side); 4] {
        let (x, y) = (self.x, self.y);
        match self.orientation {
            Orientation::Vertical => [
                (x, y, Side::Right),
                (x + 1, y, Side::Left),
                (x, y + 1, Side::Right),
                (x + 1, y + 1, Side::Left),
            ],
            Orientation::Horizontal => [
                (x, y, Side::Bottom),
                (x, y + 1, Side::Top),
                (x + 1, y, Side::Bottom),
                (x + 1, y + 1, Side::Top),
            ],
        }
    }

    /// Whether two segments share a flag or cross at the same centre.
    pub fn conflicts_with(&self, other: &WallSegment) -> bool {
        if self.x == other.x && self.y == other.y {
            return true;
        }
        let ours = self.covered();
        other.covered().iter().any(|flag| ours.contains(flag))
    }
}

impl std::fmt::Display for WallSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.orientation)
    }
}

/// A wall on the board and the seat that placed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_new::new)]
pub struct PlacedWall {
    segment: WallSegment,
    owner: SeatId,
}

impl PlacedWall {
    /// The segment.
    pub fn segment(&self) -> WallSegment {
        self.segment
    }

    /// Seat that placed it.
    pub fn owner(&self) -> SeatId {
        self.owner
    }
}
