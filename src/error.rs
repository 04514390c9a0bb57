//! Error types for classification and input parsing.

use thiserror::Error;

/// Errors raised by the classifier itself. All are argument problems; the
/// core does no I/O.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KnnError {
    #[error("k must be at least 1, got {0}")]
    InvalidK(usize),

    #[error("no reference points to compare against")]
    EmptyReference,

    #[error("query point has a non-finite coordinate ({x}, {y})")]
    NonFiniteQuery { x: f32, y: f32 },

    /// Every reference distance was NaN, so nothing could be ranked.
    #[error("no comparable reference points")]
    NoCandidates,
}

/// Malformed input record. Always fatal for the CLI.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("line {line}, column {col}: expected {expected}")]
    Expected { expected: &'static str, line: usize, col: usize },

    #[error("line {line}, column {col}: invalid number {text:?}")]
    InvalidNumber { text: String, line: usize, col: usize },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: i64 },

    #[error("line {line}, column {col}: trailing input after query point")]
    TrailingInput { line: usize, col: usize },

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}
