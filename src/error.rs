//! Error types for loading levels and settings.
//!
//! The simulation itself has no error path; only data coming in from outside
//! the core can be malformed.

use thiserror::Error;

/// Result type for Bubble Burst loading operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading configuration or level data.
#[derive(Debug, Error)]
pub enum Error {
    /// Level data failed validation
    #[error("Invalid level data: {0}")]
    Level(#[from] LevelError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A malformed level fill pattern.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level pack contains no levels")]
    EmptyPack,

    #[error("level {level}: {rows} rows given, the grid has {max}")]
    TooManyRows { level: usize, rows: usize, max: usize },

    #[error("level {level} row {row}: {len} cells given, the row holds {max}")]
    RowTooLong {
        level: usize,
        row: usize,
        len: usize,
        max: usize,
    },

    #[error("level {level} row {row} col {col}: unknown cell '{cell}'")]
    BadCell {
        level: usize,
        row: usize,
        col: usize,
        cell: char,
    },
}
