//! Line classifier: decides whether one raw line is an event and extracts
//! its fields.
//!
//! Two independent strategies produce a [`Token`]:
//!
//! - [`tokenize_line_fast`]: positional byte scan, no regex. Handles the
//!   overwhelmingly common line shape.
//! - [`tokenize_line_regex`]: one anchored pattern. Slower, stricter about the
//!   time string, more lenient about where the `(` sits. It doubles as the
//!   oracle the fast path is differentially tested against.
//!
//! [`tokenize_line`] dispatches: fast path first, regex retry only for lines
//! that still look event-shaped. A fast-path error is confirmed by the regex
//! before it is reported, so lines without a time string never error. Every
//! function returns `Ok(None)` for anything that is not confidently an event;
//! errors are reserved for event-shaped lines with an inconsistent field.
//!
//! ```text
//! 12:34:56.789 (123456789)|METHOD_ENTRY|[1]|MyClass.doWork
//! └─ time ───┘ └─ nanos ─┘ └─ type ───┘ └─ segments ─────┘
//! ```

use crate::config::TokenizerConfig;
use crate::error::{ErrorCode, LineError};
use crate::registry::EventType;
use crate::types::Token;
use regex::Regex;
use std::sync::LazyLock;

static EVENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{1,2}:\d{2}:\d{2}(?:\.\d+)?)\s+\((\d+)\)\|([^|\[]*)(\[[^\]|]*\])?(?:\|(.*))?$",
    )
    .expect("event line pattern is valid")
});

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Tokenize one line: fast path, then the regex path for event-shaped lines
/// the fast path declined.
pub fn tokenize_line(
    line: &str,
    line_number: u32,
    config: &TokenizerConfig,
) -> Result<Option<Token>, LineError> {
    if line.len() > config.max_line_length {
        tracing::debug!(line_number, len = line.len(), "line exceeds maximum length; truncated");
    }
    let line = prepare_line(line, config.max_line_length);

    match tokenize_line_fast(line, line_number, config) {
        Ok(Some(token)) => Ok(Some(token)),
        // A fast-path error only stands if the regex also sees an event line.
        Err(_) => tokenize_line_regex(line, line_number, config),
        Ok(None) if looks_event_shaped(line) => tokenize_line_regex(line, line_number, config),
        Ok(None) => Ok(None),
    }
}

/// Digit-leading and containing a pipe: worth a second opinion.
pub fn looks_event_shaped(line: &str) -> bool {
    line.as_bytes().first().is_some_and(u8::is_ascii_digit) && line.contains('|')
}

// ---------------------------------------------------------------------------
// Fast path
// ---------------------------------------------------------------------------

/// Positional tokenizer. See the module docs for the line layout.
pub fn tokenize_line_fast(
    line: &str,
    line_number: u32,
    config: &TokenizerConfig,
) -> Result<Option<Token>, LineError> {
    let line = prepare_line(line, config.max_line_length);
    let bytes = line.as_bytes();

    if !bytes.first().is_some_and(u8::is_ascii_digit) {
        return Ok(None);
    }
    if is_header_line(bytes, config.header_prefix_max_len) {
        return Ok(None);
    }

    let window = &bytes[..bytes.len().min(config.timestamp_search_window)];
    let Some(open) = window.iter().position(|&b| b == b'(') else {
        return Ok(None);
    };
    let Some(close) = bytes[open + 1..].iter().position(|&b| b == b')').map(|p| p + open + 1) else {
        return Ok(None);
    };
    let Some(timestamp) = parse_nanos(&line[open + 1..close], line_number, line)? else {
        return Ok(None);
    };

    let Some(rest) = line[close + 1..].strip_prefix('|') else {
        return Ok(None);
    };
    let (type_text, tail) = match rest.find('|') {
        Some(idx) => (&rest[..idx], Some(&rest[idx + 1..])),
        None => (rest, None),
    };

    let event_type = resolve_type(type_text, line_number, line)?;
    Ok(Some(Token {
        line_number,
        timestamp,
        event_type,
        segments: split_segments(tail),
    }))
}

// ---------------------------------------------------------------------------
// Regex path
// ---------------------------------------------------------------------------

/// Regex tokenizer. Agrees with [`tokenize_line_fast`] on `event_type` and
/// `timestamp` for every line both accept.
pub fn tokenize_line_regex(
    line: &str,
    line_number: u32,
    config: &TokenizerConfig,
) -> Result<Option<Token>, LineError> {
    let line = prepare_line(line, config.max_line_length);
    let Some(caps) = EVENT_LINE.captures(line) else {
        return Ok(None);
    };

    let nanos = caps.get(2).map_or("", |m| m.as_str());
    let Some(timestamp) = parse_nanos(nanos, line_number, line)? else {
        return Ok(None);
    };
    let type_text = caps.get(3).map_or("", |m| m.as_str());
    let event_type = resolve_type(type_text, line_number, line)?;

    Ok(Some(Token {
        line_number,
        timestamp,
        event_type,
        segments: split_segments(caps.get(5).map(|m| m.as_str())),
    }))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Strip the line terminator and cap the length on a char boundary.
fn prepare_line(line: &str, max_len: usize) -> &str {
    let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    if line.len() <= max_len {
        return line;
    }
    let mut end = max_len;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    &line[..end]
}

/// `48.0 APEX_CODE,FINEST;…`: a short numeric token, a space, then an
/// uppercase letter.
fn is_header_line(bytes: &[u8], max_prefix: usize) -> bool {
    let prefix_len = bytes
        .iter()
        .take_while(|b| b.is_ascii_digit() || **b == b'.')
        .count();
    prefix_len <= max_prefix
        && bytes.get(prefix_len) == Some(&b' ')
        && bytes.get(prefix_len + 1).is_some_and(u8::is_ascii_uppercase)
}

/// `Ok(None)` for a non-numeric payload, `Err` for digits that overflow.
fn parse_nanos(payload: &str, line_number: u32, line: &str) -> Result<Option<i64>, LineError> {
    if payload.is_empty() || !payload.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    payload.parse::<i64>().map(Some).map_err(|_| {
        LineError::new(
            ErrorCode::TimestampOutOfRange,
            format!("timestamp {payload} does not fit in 64 bits"),
            line_number,
            line,
        )
    })
}

fn resolve_type(type_text: &str, line_number: u32, line: &str) -> Result<EventType, LineError> {
    let name = type_text.split('[').next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(LineError::new(
            ErrorCode::MissingEventType,
            "event type is empty",
            line_number,
            line,
        ));
    }
    Ok(EventType::from_raw(name))
}

fn split_segments(tail: Option<&str>) -> Vec<String> {
    tail.map(|t| {
        t.split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
