//! Line-oriented text protocol between server and clients.
//!
//! Each message is one line: a command word followed by space-separated
//! arguments. Coordinates are 0-based on the 9×9 grid and orientations use
//! their upper-case names.

use crate::games::quoridor::{Action, Orientation, SeatId, WallSegment};
use crate::presenter::Presenter;
use std::fmt;
use std::str::{FromStr, SplitWhitespace};
use tracing::debug;

/// A malformed line for a known command.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ProtocolError {
    /// The command needs more arguments than the line carried.
    #[display("'{command}' is missing argument {index}")]
    MissingArgument {
        /// Command word.
        command: String,
        /// 1-based argument position.
        index: usize,
    },

    /// A numeric argument did not parse.
    #[display("'{token}' is not a valid number")]
    InvalidNumber {
        /// Offending token.
        token: String,
    },

    /// An orientation argument was neither `VERTICAL` nor `HORIZONTAL`.
    #[display("'{token}' is not a valid orientation")]
    InvalidOrientation {
        /// Offending token.
        token: String,
    },
}

/// Encoding and decoding of one protocol line.
pub trait LineCodec: Sized + fmt::Display {
    /// Parses one line.
    ///
    /// Returns `Ok(None)` for blank lines and unknown command words, which
    /// are ignored by both ends.
    fn decode(line: &str) -> Result<Option<Self>, ProtocolError>;

    /// Renders the message as a line, without the terminator.
    fn encode(&self) -> String {
        self.to_string()
    }
}

/// Cursor over a line's arguments.
struct Args<'a> {
    command: &'a str,
    tokens: SplitWhitespace<'a>,
    index: usize,
}

impl<'a> Args<'a> {
    fn split(line: &'a str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let command = tokens.next()?;
        Some(Self {
            command,
            tokens,
            index: 0,
        })
    }

    fn token(&mut self) -> Result<&'a str, ProtocolError> {
        self.index += 1;
        self.tokens
            .next()
            .ok_or_else(|| ProtocolError::MissingArgument {
                command: self.command.to_string(),
                index: self.index,
            })
    }

    fn number<T: FromStr>(&mut self) -> Result<T, ProtocolError> {
        let token = self.token()?;
        token.parse().map_err(|_| ProtocolError::InvalidNumber {
            token: token.to_string(),
        })
    }

    fn orientation(&mut self) -> Result<Orientation, ProtocolError> {
        let token = self.token()?;
        token.parse().map_err(|_| ProtocolError::InvalidOrientation {
            token: token.to_string(),
        })
    }

    fn segment(&mut self) -> Result<WallSegment, ProtocolError> {
        Ok(WallSegment::new(
            self.number()?,
            self.number()?,
            self.orientation()?,
        ))
    }

    fn is_exhausted(&self) -> bool {
        self.tokens.clone().next().is_none()
    }

    fn rest(self) -> Vec<&'a str> {
        self.tokens.collect()
    }
}

/// Server → client notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Every seat is connected; the client may start its view.
    BootGui,
    /// The receiving connection's seat.
    SetId(SeatId),
    /// A seat's counters.
    Stats {
        /// Accepted actions so far.
        move_count: u32,
        /// Walls left.
        wall_count: u8,
        /// Seat the counters belong to.
        seat: SeatId,
    },
    /// A pawn's location.
    Pawn {
        /// Column.
        x: u8,
        /// Row.
        y: u8,
        /// Owning seat.
        seat: SeatId,
    },
    /// The seat holding the turn.
    CurrentPlayer(SeatId),
    /// A legal destination for the current seat.
    Highlight {
        /// Column.
        x: u8,
        /// Row.
        y: u8,
    },
    /// A rule violation, addressed to the receiving seat.
    Error(String),
    /// A wall was placed.
    Wall {
        /// Segment placed.
        segment: WallSegment,
        /// Seat that placed it.
        seat: SeatId,
    },
    /// Clear all wall displays.
    Reset,
    /// A wall was removed.
    RemoveWallDisplay(WallSegment),
    /// Pawn coordinates in seat order.
    Coordinate(Vec<(u8, u8)>),
}

impl ServerMessage {
    /// Replays the notification onto a presenter.
    ///
    /// `own_seat` addresses the seat-specific calls. `bootGUI` and `setID`
    /// are connection bookkeeping and leave the presenter alone.
    pub fn apply<P: Presenter + ?Sized>(&self, presenter: &mut P, own_seat: SeatId) {
        match self {
            ServerMessage::BootGui | ServerMessage::SetId(_) => {}
            ServerMessage::Stats {
                move_count,
                wall_count,
                seat,
            } => presenter.update_stats(*move_count, *wall_count, *seat),
            ServerMessage::Pawn { x, y, seat } => presenter.update_pawn_position(*x, *y, *seat),
            ServerMessage::CurrentPlayer(seat) => presenter.update_current_player(*seat),
            ServerMessage::Highlight { x, y } => presenter.highlight_availability(*x, *y),
            ServerMessage::Error(text) => presenter.display_error(own_seat, text),
            ServerMessage::Wall { segment, seat } => presenter.display_wall(*segment, *seat),
            ServerMessage::Reset => presenter.reset_walls(),
            ServerMessage::RemoveWallDisplay(segment) => presenter.remove_wall_display(*segment),
            ServerMessage::Coordinate(positions) => {
                presenter.set_initial_positions(own_seat, positions)
            }
        }
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::BootGui => write!(f, "bootGUI"),
            ServerMessage::SetId(seat) => write!(f, "setID {}", seat),
            ServerMessage::Stats {
                move_count,
                wall_count,
                seat,
            } => write!(f, "stats {} {} {}", move_count, wall_count, seat),
            ServerMessage::Pawn { x, y, seat } => write!(f, "pawn {} {} {}", x, y, seat),
            ServerMessage::CurrentPlayer(seat) => write!(f, "currentPlayer {}", seat),
            ServerMessage::Highlight { x, y } => write!(f, "highlight {} {}", x, y),
            ServerMessage::Error(text) => write!(f, "error {}", text),
            ServerMessage::Wall { segment, seat } => write!(f, "wall {} {}", segment, seat),
            ServerMessage::Reset => write!(f, "reset"),
            ServerMessage::RemoveWallDisplay(segment) => {
                write!(f, "remove-wall-display {}", segment)
            }
            ServerMessage::Coordinate(positions) => {
                write!(f, "coordinate")?;
                for (x, y) in positions {
                    write!(f, " {} {}", x, y)?;
                }
                Ok(())
            }
        }
    }
}

impl LineCodec for ServerMessage {
    fn decode(line: &str) -> Result<Option<Self>, ProtocolError> {
        let Some(mut args) = Args::split(line) else {
            return Ok(None);
        };

        let command = args.command;
        let message = match command {
            "bootGUI" => ServerMessage::BootGui,
            "setID" => ServerMessage::SetId(args.number()?),
            "stats" => ServerMessage::Stats {
                move_count: args.number()?,
                wall_count: args.number()?,
                seat: args.number()?,
            },
            "pawn" => ServerMessage::Pawn {
                x: args.number()?,
                y: args.number()?,
                seat: args.number()?,
            },
            "currentPlayer" => ServerMessage::CurrentPlayer(args.number()?),
            "highlight" => ServerMessage::Highlight {
                x: args.number()?,
                y: args.number()?,
            },
            "error" => ServerMessage::Error(args.rest().join(" ")),
            "wall" => ServerMessage::Wall {
                segment: args.segment()?,
                seat: args.number()?,
            },
            "reset" => ServerMessage::Reset,
            "remove-wall-display" => ServerMessage::RemoveWallDisplay(args.segment()?),
            "coordinate" => {
                let mut positions = vec![(args.number()?, args.number()?)];
                while !args.is_exhausted() {
                    positions.push((args.number()?, args.number()?));
                }
                ServerMessage::Coordinate(positions)
            }
            other => {
                debug!(command = other, "Ignoring unknown server message");
                return Ok(None);
            }
        };
        Ok(Some(message))
    }
}

/// Client → server request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    /// `move x y playerID`
    Move {
        /// Destination column.
        x: u8,
        /// Destination row.
        y: u8,
        /// Seat the client claims to act for.
        seat: SeatId,
    },
    /// `wall x y ORIENTATION playerID`
    Wall {
        /// Segment to place.
        segment: WallSegment,
        /// Claimed seat.
        seat: SeatId,
    },
    /// `remove-wall x y ORIENTATION playerID`
    RemoveWall {
        /// Segment to remove.
        segment: WallSegment,
        /// Claimed seat.
        seat: SeatId,
    },
    /// `available`
    Available,
    /// `start-coordinates`
    StartCoordinates,
}

impl ClientCommand {
    /// The game action carried by the command and the seat it claims, if
    /// the command is an action at all.
    pub fn action(&self) -> Option<(SeatId, Action)> {
        match *self {
            ClientCommand::Move { x, y, seat } => Some((seat, Action::MovePawn { x, y })),
            ClientCommand::Wall { segment, seat } => Some((seat, Action::PlaceWall(segment))),
            ClientCommand::RemoveWall { segment, seat } => {
                Some((seat, Action::RemoveWall(segment)))
            }
            ClientCommand::Available | ClientCommand::StartCoordinates => None,
        }
    }
}

impl fmt::Display for ClientCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientCommand::Move { x, y, seat } => write!(f, "move {} {} {}", x, y, seat),
            ClientCommand::Wall { segment, seat } => write!(f, "wall {} {}", segment, seat),
            ClientCommand::RemoveWall { segment, seat } => {
                write!(f, "remove-wall {} {}", segment, seat)
            }
            ClientCommand::Available => write!(f, "available"),
            ClientCommand::StartCoordinates => write!(f, "start-coordinates"),
        }
    }
}

impl LineCodec for ClientCommand {
    fn decode(line: &str) -> Result<Option<Self>, ProtocolError> {
        let Some(mut args) = Args::split(line) else {
            return Ok(None);
        };

        let word = args.command;
        let command = match word {
            "move" => ClientCommand::Move {
                x: args.number()?,
                y: args.number()?,
                seat: args.number()?,
            },
            "wall" => ClientCommand::Wall {
                segment: args.segment()?,
                seat: args.number()?,
            },
            "remove-wall" => ClientCommand::RemoveWall {
                segment: args.segment()?,
                seat: args.number()?,
            },
            "available" => ClientCommand::Available,
            "start-coordinates" => ClientCommand::StartCoordinates,
            other => {
                debug!(command = other, "Ignoring unknown client command");
                return Ok(None);
            }
        };
        Ok(Some(command))
    }
}
