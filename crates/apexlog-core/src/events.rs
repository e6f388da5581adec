//! Flat event assembly: turns tokens into [`LogEvent`]s for truncation
//! analysis.
//!
//! This is deliberately flat: no parent/child links and no durations. It only
//! classifies each token into an [`EventKind`] and gathers exception stack
//! trace continuation lines, which is everything the truncation detectors
//! inspect.

use crate::config::TokenizerConfig;
use crate::driver::{line_number, TokenizedLog};
use crate::error::LineError;
use crate::registry::EventType;
use crate::tokenizer::tokenize_line;
use crate::types::{EventKind, ExceptionDetails, LogEvent, Token};

impl LogEvent {
    /// Classify a token into an event with the given id.
    pub fn from_token(id: u64, token: &Token) -> LogEvent {
        LogEvent {
            id,
            line_number: token.line_number,
            timestamp: token.timestamp,
            event_type: token.event_type,
            duration_ns: None,
            namespace: namespace_of(token),
            kind: classify(token),
        }
    }
}

/// Tokenize `content` and build a flat event list.
///
/// Non-event lines directly following a `FATAL_ERROR` or `EXCEPTION_THROWN`
/// are appended to that event's stack trace. Line errors are skipped.
pub fn assemble_events(content: &str, config: &TokenizerConfig) -> Vec<LogEvent> {
    let mut assembler = Assembler::default();
    for (idx, line) in content.lines().enumerate() {
        match tokenize_line(line, line_number(idx), config) {
            Ok(Some(token)) => assembler.event(&token),
            Ok(None) => assembler.text(line),
            Err(err) => assembler.error(&err),
        }
    }
    assembler.finish()
}

/// Same as [`assemble_events`], reusing the tokens and errors of a batch pass
/// over the same `content` instead of tokenizing it again.
pub fn events_from_tokenized(content: &str, log: &TokenizedLog) -> Vec<LogEvent> {
    let mut tokens = log.tokens.iter().peekable();
    let mut errors = log.errors.iter().peekable();
    let mut assembler = Assembler::default();

    for (idx, line) in content.lines().enumerate() {
        let n = line_number(idx);
        if let Some(token) = tokens.next_if(|t| t.line_number == n) {
            assembler.event(token);
        } else if let Some(err) = errors.next_if(|e| e.line_number == n) {
            assembler.error(err);
        } else {
            assembler.text(line);
        }
    }
    assembler.finish()
}

#[derive(Default)]
struct Assembler {
    events: Vec<LogEvent>,
    /// Index of the exception still collecting trace lines.
    open_exception: Option<usize>,
}

impl Assembler {
    fn event(&mut self, token: &Token) {
        let event = LogEvent::from_token(self.events.len() as u64 + 1, token);
        self.open_exception = event.is_exception().then_some(self.events.len());
        self.events.push(event);
    }

    fn text(&mut self, line: &str) {
        let text = line.trim();
        if text.is_empty() {
            return;
        }
        if let Some(EventKind::Exception(details)) = self
            .open_exception
            .and_then(|i| self.events.get_mut(i))
            .map(|e| &mut e.kind)
        {
            append_trace_line(details, text);
        }
    }

    fn error(&mut self, err: &LineError) {
        tracing::debug!(line_number = err.line_number, code = %err.code, "skipping line error");
        self.open_exception = None;
    }

    fn finish(self) -> Vec<LogEvent> {
        tracing::debug!(events = self.events.len(), "flat event assembly complete");
        self.events
    }
}

fn classify(token: &Token) -> EventKind {
    match token.event_type {
        EventType::ExecutionStarted => EventKind::ExecutionStarted,
        EventType::ExecutionFinished => EventKind::ExecutionFinished,
        EventType::CumulativeLimitUsage
        | EventType::CumulativeLimitUsageEnd
        | EventType::LimitUsageForNs => EventKind::LimitSummary,
        EventType::ExceptionThrown | EventType::FatalError => {
            EventKind::Exception(exception_details(&token.segments))
        }
        ty if ty.opens_scope() => EventKind::Enter,
        ty if ty.closes_scope() => EventKind::Exit,
        _ => EventKind::Other,
    }
}

/// `[12]|System.NullPointerException: Attempt to de-reference a null object`
fn exception_details(segments: &[String]) -> ExceptionDetails {
    let text = segments
        .iter()
        .filter(|s| !is_line_ref(s))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("|");

    let (exception_type, message) = match text.split_once(": ") {
        Some((ty, msg)) => (ty.trim().to_string(), msg.trim().to_string()),
        None => (text.trim().to_string(), String::new()),
    };
    ExceptionDetails {
        exception_type,
        message,
        stack_trace: None,
    }
}

fn append_trace_line(details: &mut ExceptionDetails, line: &str) {
    match details.stack_trace.as_mut() {
        Some(trace) => {
            trace.push('\n');
            trace.push_str(line);
        }
        None => details.stack_trace = Some(line.to_string()),
    }
}

/// `[42]`: source line reference segment.
fn is_line_ref(segment: &str) -> bool {
    segment
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .is_some_and(|inner| !inner.is_empty() && inner.bytes().all(|b| b.is_ascii_digit()))
}

fn namespace_of(token: &Token) -> Option<String> {
    match token.event_type {
        EventType::EnteringManagedPkg | EventType::LimitUsageForNs => token
            .segments
            .first()
            .map(|ns| ns.trim_end_matches(':').to_string())
            .filter(|ns| !ns.is_empty() && ns != "(default)"),
        _ => None,
    }
}
