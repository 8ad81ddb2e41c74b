//! Error types for level progression, minigames and storage.

use thiserror::Error;

/// Rejected level transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// Level numbers start at 1
    #[error("invalid level {0}: levels start at 1")]
    Invalid(i64),

    /// The countdown ran out; the progression is over
    #[error("countdown expired, cannot show level {0}")]
    Expired(i64),

    /// A `data-next` attribute that isn't a level number
    #[error("unparsable level attribute {0:?}")]
    Unparsable(String),

    /// Debug skip outside the registered range
    #[error("level {level} is outside 1..={total}")]
    OutOfRange { level: i64, total: u32 },

    /// Registry entries must be numbered 1..=n in order
    #[error("level registry entry {index} is numbered {level}")]
    Misnumbered { index: usize, level: u32 },
}

/// Minigame initializer failures.
#[derive(Error, Debug)]
pub enum GameError {
    /// A content pool (questions, sentences, ...) has nothing to pick from
    #[error("{0} pool is empty")]
    EmptyPool(&'static str),

    /// Board dimensions don't match the cell data
    #[error("board of size {size} needs {expected} cells, got {actual}")]
    BoardShape {
        size: usize,
        expected: usize,
        actual: usize,
    },

    /// Answer validation pattern failed to compile
    #[error("bad validation pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Key/value storage failures (LocalStorage on web).
#[derive(Error, Debug)]
pub enum StorageError {
    /// No storage backend (private mode, no window)
    #[error("storage unavailable")]
    Unavailable,

    /// Backend refused the write
    #[error("failed to write {key}")]
    Write { key: String },

    /// Stored JSON didn't parse or serialize
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
