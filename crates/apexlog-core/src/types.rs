//! Core types for apexlog-core.
//!
//! This module defines the structures shared between the tokenizer and the
//! truncation layer: the per-line [`Token`], and the [`LogEvent`] /
//! [`EventKind`] pair consumed by truncation analysis.

use crate::registry::EventType;
use serde::Serialize;

/// One classified, structured representation of a single raw log line.
///
/// Tokens do not keep the raw line. Everything after the event type is kept
/// as pipe-separated `segments`, which is enough to rebuild it if needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// 1-based line number within the source content.
    pub line_number: u32,
    /// Nanoseconds since the start of the transaction, from the `(…)` group.
    pub timestamp: i64,
    pub event_type: EventType,
    /// Trimmed, non-empty pipe-separated fields following the event type.
    pub segments: Vec<String>,
}

/// Exception payload carried by `FATAL_ERROR` / `EXCEPTION_THROWN` events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
    pub exception_type: String,
    pub message: String,
    /// Continuation lines that followed the event, joined with `\n`.
    pub stack_trace: Option<String>,
}

impl ExceptionDetails {
    /// Length in characters of the captured stack trace (0 when absent).
    pub fn stack_trace_len(&self) -> usize {
        self.stack_trace
            .as_deref()
            .map(|t| t.trim().chars().count())
            .unwrap_or(0)
    }
}

/// What a [`LogEvent`] means to consumers, matched exhaustively instead of
/// probing for optional fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EventKind {
    ExecutionStarted,
    ExecutionFinished,
    /// Cumulative or per-namespace governor limit summary.
    LimitSummary,
    Exception(ExceptionDetails),
    /// Opens a scope closed by the registry partner of its event type.
    Enter,
    /// Closes a scope opened by the registry partner of its event type.
    Exit,
    Other,
}

/// An event as handed to the truncation layer by the event builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub id: u64,
    pub line_number: u32,
    pub timestamp: i64,
    pub event_type: EventType,
    pub duration_ns: Option<u64>,
    pub namespace: Option<String>,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl LogEvent {
    pub fn is_exception(&self) -> bool {
        matches!(self.kind, EventKind::Exception(_))
    }

    pub fn exception(&self) -> Option<&ExceptionDetails> {
        match &self.kind {
            EventKind::Exception(details) => Some(details),
            _ => None,
        }
    }
}
