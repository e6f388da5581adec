//! Truncation indicator detectors.
//!
//! Each detector is a pure function of the raw content and the parsed event
//! list. They share no state, so they can run in any order or in parallel.
//! [`detect_all`] runs the seven of them in the fixed order of
//! [`IndicatorKind::ALL`].

use crate::types::{IndicatorKind, TruncationIndicator};
use apexlog_core::registry::is_known_prefix;
use apexlog_core::{EventKind, EventType, LogEvent, TruncationConfig};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Signature shared by every detector.
pub type Detector = fn(&str, &[LogEvent], &TruncationConfig) -> TruncationIndicator;

/// Detectors in report order.
pub const DETECTORS: [(IndicatorKind, Detector); 7] = [
    (IndicatorKind::ExplicitMarker, detect_explicit_marker),
    (IndicatorKind::SizeThreshold, detect_size_threshold),
    (IndicatorKind::AbruptEnding, detect_abrupt_ending),
    (IndicatorKind::UnclosedEvents, detect_unclosed_events),
    (IndicatorKind::MissingLimits, detect_missing_limits),
    (IndicatorKind::MidLineCut, detect_mid_line_cut),
    (IndicatorKind::IncompleteStacktrace, detect_incomplete_stacktrace),
];

/// Banners the platform writes when it cuts a log.
pub const TRUNCATION_MARKERS: &[&str] = &[
    "*** Skipped",
    "MAXIMUM DEBUG LOG SIZE REACHED",
    "Maximum Debug Log Size Reached",
    "...TRUNCATED...",
    "[LOG TRUNCATED]",
];

/// Only this much of the final line is inspected; every cut signal sits at
/// its end.
pub const MID_LINE_TAIL_BYTES: usize = 8 * 1024;

static INCOMPLETE_QUERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bSELECT\b.*\b(FROM|WHERE|AND|OR|NOT|IN|LIKE|ORDER\s+BY|GROUP\s+BY|HAVING|LIMIT|OFFSET|WITH)\s*$",
    )
    .expect("incomplete query pattern is valid")
});

static CUT_EVENT_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}:\d{2}:\d{2}(?:\.\d+)?\s+\(\d+\)\|([A-Z_]+)$")
        .expect("cut event type pattern is valid")
});

/// Run every detector.
pub fn detect_all(
    content: &str,
    events: &[LogEvent],
    config: &TruncationConfig,
) -> Vec<TruncationIndicator> {
    DETECTORS
        .iter()
        .map(|(kind, detect)| {
            let indicator = detect(content, events, config);
            if indicator.found {
                tracing::debug!(
                    indicator = ?kind,
                    line_number = ?indicator.line_number,
                    details = indicator.details.as_deref().unwrap_or(""),
                    "truncation indicator found"
                );
            }
            indicator
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Content-level detectors
// ---------------------------------------------------------------------------

/// Substring match against the vendor truncation banners.
pub fn detect_explicit_marker(
    content: &str,
    _events: &[LogEvent],
    _config: &TruncationConfig,
) -> TruncationIndicator {
    let first = TRUNCATION_MARKERS
        .iter()
        .filter_map(|marker| content.find(marker).map(|pos| (pos, *marker)))
        .min_by_key(|(pos, _)| *pos);

    match first {
        Some((pos, marker)) => TruncationIndicator::found(
            IndicatorKind::ExplicitMarker,
            Some(line_number_at(content, pos)),
            format!("found truncation marker \"{marker}\""),
        ),
        None => TruncationIndicator::absent(IndicatorKind::ExplicitMarker),
    }
}

/// Content length against the platform cap.
pub fn detect_size_threshold(
    content: &str,
    _events: &[LogEvent],
    config: &TruncationConfig,
) -> TruncationIndicator {
    let ratio = size_ratio(content.len(), config);
    if config.max_log_size_bytes == 0 || ratio < config.size_warning_ratio {
        return TruncationIndicator::absent(IndicatorKind::SizeThreshold);
    }
    TruncationIndicator::found(
        IndicatorKind::SizeThreshold,
        None,
        format!(
            "log is {} bytes, {:.1}% of the {} byte limit",
            content.len(),
            ratio * 100.0,
            config.max_log_size_bytes
        ),
    )
}

/// Looks at the tail of the last non-empty raw line only.
pub fn detect_mid_line_cut(
    content: &str,
    _events: &[LogEvent],
    _config: &TruncationConfig,
) -> TruncationIndicator {
    let Some((idx, last)) = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .last()
    else {
        return TruncationIndicator::absent(IndicatorKind::MidLineCut);
    };

    let reasons = unfinished_line_reasons(line_tail(last.trim_end(), MID_LINE_TAIL_BYTES));
    if reasons.is_empty() {
        return TruncationIndicator::absent(IndicatorKind::MidLineCut);
    }
    TruncationIndicator::found(
        IndicatorKind::MidLineCut,
        Some(u32::try_from(idx + 1).unwrap_or(u32::MAX)),
        format!("final line looks unfinished: {}", reasons.join("; ")),
    )
}

fn unfinished_line_reasons(line: &str) -> Vec<&'static str> {
    let mut reasons = Vec::new();

    if line.ends_with(|c: char| matches!(c, '|' | ',' | ':' | '=')) {
        reasons.push("ends with a delimiter");
    }
    if unbalanced(line, '(', ')') || unbalanced(line, '[', ']') || unbalanced(line, '{', '}') {
        reasons.push("unclosed bracket");
    }
    if INCOMPLETE_QUERY.is_match(line) {
        reasons.push("incomplete query clause");
    }
    if let Some(caps) = CUT_EVENT_TYPE.captures(line) {
        let type_text = caps.get(1).map_or("", |m| m.as_str());
        if EventType::from_raw(type_text) == EventType::Unknown && is_known_prefix(type_text) {
            reasons.push("event type cut mid-word");
        }
    }
    reasons
}

fn unbalanced(line: &str, open: char, close: char) -> bool {
    line.matches(open).count() > line.matches(close).count()
}

/// Last `max` bytes of `line`, moved forward to a char boundary.
fn line_tail(line: &str, max: usize) -> &str {
    let mut start = line.len().saturating_sub(max);
    while !line.is_char_boundary(start) {
        start += 1;
    }
    &line[start..]
}

// ---------------------------------------------------------------------------
// Event-level detectors
// ---------------------------------------------------------------------------

/// No events in non-blank content, or no `EXECUTION_FINISHED` after the last
/// `EXECUTION_STARTED`. Blank content with no events is an empty log, not a
/// cut one.
pub fn detect_abrupt_ending(
    content: &str,
    events: &[LogEvent],
    _config: &TruncationConfig,
) -> TruncationIndicator {
    let Some(last) = events.last() else {
        if content.trim().is_empty() {
            return TruncationIndicator::absent(IndicatorKind::AbruptEnding);
        }
        return TruncationIndicator::found(
            IndicatorKind::AbruptEnding,
            None,
            "content present but no events were parsed",
        );
    };

    let since_last_start = match events
        .iter()
        .rposition(|e| matches!(e.kind, EventKind::ExecutionStarted))
    {
        Some(start) => &events[start..],
        None => events,
    };
    if since_last_start
        .iter()
        .any(|e| matches!(e.kind, EventKind::ExecutionFinished))
    {
        return TruncationIndicator::absent(IndicatorKind::AbruptEnding);
    }

    TruncationIndicator::found(
        IndicatorKind::AbruptEnding,
        Some(last.line_number),
        format!("log ends at {} without EXECUTION_FINISHED", last.event_type),
    )
}

/// Stack-based entry/exit pairing over the whole list.
///
/// An exit closes the nearest open scope of its partner type; scopes skipped
/// over on the way were never closed and count as unclosed too.
pub fn detect_unclosed_events(
    _content: &str,
    events: &[LogEvent],
    config: &TruncationConfig,
) -> TruncationIndicator {
    let mut stack: Vec<&LogEvent> = Vec::new();
    let mut abandoned: Vec<&LogEvent> = Vec::new();
    // Stack positions of the open scopes, per event type, in ascending order.
    let mut open_at: HashMap<EventType, Vec<usize>> = HashMap::new();

    for event in events {
        match event.kind {
            EventKind::Enter => {
                open_at.entry(event.event_type).or_default().push(stack.len());
                stack.push(event);
            }
            EventKind::Exit => {
                let Some(opener) = event.event_type.scope_partner() else {
                    continue;
                };
                let Some(&pos) = open_at.get(&opener).and_then(|at| at.last()) else {
                    continue;
                };
                // Everything above `pos` is the top of its own type's list, so
                // each pop is O(1) and every entry is popped at most once.
                while stack.len() > pos {
                    let Some(top) = stack.pop() else { break };
                    if let Some(at) = open_at.get_mut(&top.event_type) {
                        at.pop();
                    }
                    if stack.len() > pos {
                        abandoned.push(top);
                    }
                }
            }
            _ => {}
        }
    }

    let unclosed = stack.len() + abandoned.len();
    if unclosed <= config.unclosed_event_threshold {
        return TruncationIndicator::absent(IndicatorKind::UnclosedEvents);
    }

    let first = stack
        .iter()
        .chain(abandoned.iter())
        .map(|e| e.line_number)
        .min();
    TruncationIndicator::found(
        IndicatorKind::UnclosedEvents,
        first,
        format!(
            "{unclosed} events left open (threshold {})",
            config.unclosed_event_threshold
        ),
    )
}

/// Execution started but neither finished nor summarised its limits.
pub fn detect_missing_limits(
    _content: &str,
    events: &[LogEvent],
    _config: &TruncationConfig,
) -> TruncationIndicator {
    let Some(start) = events
        .iter()
        .find(|e| matches!(e.kind, EventKind::ExecutionStarted))
    else {
        return TruncationIndicator::absent(IndicatorKind::MissingLimits);
    };

    let closed = events.iter().any(|e| {
        matches!(e.kind, EventKind::ExecutionFinished | EventKind::LimitSummary)
    });
    if closed {
        return TruncationIndicator::absent(IndicatorKind::MissingLimits);
    }
    TruncationIndicator::found(
        IndicatorKind::MissingLimits,
        Some(start.line_number),
        "execution started but no EXECUTION_FINISHED or CUMULATIVE_LIMIT_USAGE was logged",
    )
}

/// Most recent exception near the end of the log with a short trace.
pub fn detect_incomplete_stacktrace(
    _content: &str,
    events: &[LogEvent],
    config: &TruncationConfig,
) -> TruncationIndicator {
    let Some((pos, event, details)) = events
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, e)| e.exception().map(|d| (i, e, d)))
    else {
        return TruncationIndicator::absent(IndicatorKind::IncompleteStacktrace);
    };

    let near_end = pos >= events.len().saturating_sub(config.stacktrace_tail_events);
    let trace_len = details.stack_trace_len();
    if !near_end || trace_len >= config.min_stacktrace_length {
        return TruncationIndicator::absent(IndicatorKind::IncompleteStacktrace);
    }
    TruncationIndicator::found(
        IndicatorKind::IncompleteStacktrace,
        Some(event.line_number),
        format!(
            "{} near end of log has a {trace_len}-character stack trace",
            if details.exception_type.is_empty() {
                event.event_type.as_str()
            } else {
                details.exception_type.as_str()
            }
        ),
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Content length as a fraction of the configured cap.
pub fn size_ratio(content_len: usize, config: &TruncationConfig) -> f64 {
    if config.max_log_size_bytes == 0 {
        return 0.0;
    }
    content_len as f64 / config.max_log_size_bytes as f64
}

fn line_number_at(content: &str, byte_pos: usize) -> u32 {
    let newlines = content.as_bytes()[..byte_pos]
        .iter()
        .filter(|&&b| b == b'\n')
        .count();
    u32::try_from(newlines + 1).unwrap_or(u32::MAX)
}
