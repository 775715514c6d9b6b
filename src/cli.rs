//! Command-line interface for strictly_quoridor.

use clap::{Parser, Subcommand};
use strictly_quoridor::{Orientation, WallSegment};

/// Strictly Quoridor - wall-and-pawn race over TCP or at one terminal
#[derive(Parser, Debug)]
#[command(name = "strictly_quoridor")]
#[command(about = "Turn-based wall-and-pawn game server and client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the game server
    Server {
        /// Path to the server config file (defaults apply if it doesn't exist)
        #[arg(short, long, default_value = "quoridor.toml")]
        config: std::path::PathBuf,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Number of seats, 2 or 4 (overrides the config file)
        #[arg(short, long)]
        seats: Option<u8>,

        /// Walls per seat, at most 10 (overrides the config file)
        #[arg(long)]
        walls: Option<u8>,
    },

    /// Connect to a game server and play from the terminal
    Client {
        /// Server host
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Server port
        #[arg(short, long, default_value = "4444")]
        port: u16,
    },

    /// Play a hot-seat game at this terminal
    Local {
        /// Number of seats, 2 or 4
        #[arg(short, long, default_value = "2")]
        seats: u8,
    },
}

/// A line typed at the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// `move X Y`
    Move(u8, u8),
    /// `wall X Y V|H`
    Wall(WallSegment),
    /// `remove X Y V|H`
    RemoveWall(WallSegment),
    /// `available`
    Available,
    /// `start`
    Start,
    /// `quit`
    Quit,
}

/// A terminal line that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InputError {
    /// A coordinate was left out.
    #[display("missing {name}")]
    MissingNumber {
        /// Coordinate name.
        name: &'static str,
    },

    /// A coordinate did not parse.
    #[display("{name} must be a number")]
    InvalidNumber {
        /// Coordinate name.
        name: &'static str,
    },

    /// A wall without `V` or `H`.
    #[display("missing orientation")]
    MissingOrientation,

    /// Orientation other than `V`/`H`.
    #[display("unknown orientation '{token}'")]
    UnknownOrientation {
        /// What was typed.
        token: String,
    },

    /// First word is not a command.
    #[display("unknown command '{word}'")]
    UnknownCommand {
        /// What was typed.
        word: String,
    },
}

impl Input {
    /// Parses a typed line; `None` for blank input.
    pub fn parse(line: &str) -> Result<Option<Self>, InputError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((verb, args)) = words.split_first() else {
            return Ok(None);
        };
        let number = |index: usize, name: &'static str| -> Result<u8, InputError> {
            args.get(index)
                .ok_or(InputError::MissingNumber { name })?
                .parse()
                .map_err(|_| InputError::InvalidNumber { name })
        };
        let wall = || segment(number(0, "x")?, number(1, "y")?, args.get(2).copied());

        let input = match verb.to_ascii_lowercase().as_str() {
            "move" | "m" => Input::Move(number(0, "x")?, number(1, "y")?),
            "wall" | "w" => Input::Wall(wall()?),
            "remove" | "r" => Input::RemoveWall(wall()?),
            "available" | "a" => Input::Available,
            "start" | "s" => Input::Start,
            "quit" | "q" => Input::Quit,
            other => {
                return Err(InputError::UnknownCommand {
                    word: other.to_string(),
                });
            }
        };
        Ok(Some(input))
    }
}

fn segment(x: u8, y: u8, orientation: Option<&str>) -> Result<WallSegment, InputError> {
    let orientation = match orientation.map(str::to_ascii_uppercase).as_deref() {
        Some("V") | Some("VERTICAL") => Orientation::Vertical,
        Some("H") | Some("HORIZONTAL") => Orientation::Horizontal,
        Some(other) => {
            return Err(InputError::UnknownOrientation {
                token: other.to_string(),
            });
        }
        None => return Err(InputError::MissingOrientation),
    };
    Ok(WallSegment::new(x, y, orientation))
}

/// Help text for the interactive modes.
pub const INPUT_HELP: &str = "commands: move X Y | wall X Y V|H | remove X Y V|H | available | start | quit";
