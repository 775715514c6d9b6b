//! Server configuration.

use crate::games::quoridor::{STARTING_WALLS, Seats};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Settings for a game server.
///
/// Loaded from TOML; every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind; 0 picks a free one.
    #[serde(default = "default_port")]
    port: u16,

    /// Number of seats, 2 or 4.
    #[serde(default = "default_seats")]
    seats: u8,

    /// Walls each seat starts with, at most 10.
    #[serde(default = "default_walls_per_seat")]
    walls_per_seat: u8,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4444
}

fn default_seats() -> u8 {
    2
}

fn default_walls_per_seat() -> u8 {
    STARTING_WALLS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            seats: default_seats(),
            walls_per_seat: default_walls_per_seat(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.seat_layout()?;

        info!(host = %config.host, port = config.port, seats = config.seats, "Config loaded");
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Replaces the bind host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Replaces the bind port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Replaces the seat count.
    pub fn with_seats(mut self, seats: u8) -> Self {
        self.seats = seats;
        self
    }

    /// Replaces the wall supply.
    pub fn with_walls_per_seat(mut self, walls: u8) -> Self {
        if walls > STARTING_WALLS {
            warn!(walls, "Wall supply capped at {}", STARTING_WALLS);
        }
        self.walls_per_seat = walls.min(STARTING_WALLS);
        self
    }

    /// The configured table size.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] unless `seats` is 2 or 4.
    pub fn seat_layout(&self) -> Result<Seats, ConfigError> {
        Seats::try_from(self.seats).map_err(|n| {
            ConfigError::new(format!("Unsupported seat count {}, expected 2 or 4", n))
        })
    }

    /// `host:port` for binding.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error at the caller's location.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
