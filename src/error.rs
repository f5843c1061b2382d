//! Centralized error types for the simulation core.
//!
//! Level loading is the only fallible part of the simulation; per-frame updates never fail.

use std::io;
use std::num::ParseIntError;

/// Main error type for the simulation core.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Error type for map parsing operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Returned by the per-character parser. Board parsing downgrades this to a warning.
    #[error("Unknown character in board: {0:?}")]
    UnknownCharacter(char),

    #[error("Map contains no rows")]
    EmptyMap,

    #[error("Map has no player spawn ('P')")]
    MissingPlayer,

    #[error("Map has {0} player spawns, expected exactly one")]
    MultiplePlayers(usize),

    #[error("Row {row} is {found} tiles wide, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
}

/// Errors related to map operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MapError {
    #[error("Tile ({x}, {y}) is outside the map")]
    OutOfBounds { x: i32, y: i32 },
}

/// Errors reading a `name score` leaderboard line.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ScoreEntryError {
    #[error("Expected `name score`, found {0:?}")]
    Malformed(String),

    #[error("Invalid score value: {0}")]
    InvalidScore(#[from] ParseIntError),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
