//! Error types for tokenization.
//!
//! Lines that are simply not events are never errors. A [`LineError`] is
//! reserved for lines that have an event's shape but an internally
//! inconsistent field. It is the only place the raw line is retained.

use serde::Serialize;
use thiserror::Error;

/// Machine-readable classification of a [`LineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The `(…)` payload is all digits but does not fit in an `i64`.
    TimestampOutOfRange,
    /// The pipe after the timestamp is followed by an empty type token.
    MissingEventType,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::TimestampOutOfRange => write!(f, "TIMESTAMP_OUT_OF_RANGE"),
            ErrorCode::MissingEventType => write!(f, "MISSING_EVENT_TYPE"),
        }
    }
}

/// A line with a recognised event shape that could not be tokenized.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("line {line_number}: [{code}] {message}")]
#[serde(rename_all = "camelCase")]
pub struct LineError {
    pub code: ErrorCode,
    pub message: String,
    pub line_number: u32,
    /// The offending line, after the per-line length cap.
    pub raw_line: String,
}

impl LineError {
    pub fn new(code: ErrorCode, message: impl Into<String>, line_number: u32, raw_line: &str) -> Self {
        Self {
            code,
            message: message.into(),
            line_number,
            raw_line: raw_line.to_string(),
        }
    }
}

/// Total failure of the batch driver: nothing was recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeFailure {
    #[error("no event lines could be tokenized ({} line errors)", errors.len())]
    NoTokens { errors: Vec<LineError> },
}
