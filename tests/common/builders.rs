//! Test builders: ergonomic constructors for event lists and indicator sets.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use apexlog_core::{EventKind, EventType, ExceptionDetails, LogEvent};
use apexlog_truncation::{IndicatorKind, TruncationIndicator};

// ---------------------------------------------------------------------------
// EventListBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for the flat event list the truncation layer reads.
///
/// Ids and line numbers are assigned in push order starting at 1.
///
/// # Example
///
/// ```rust
/// let events = EventListBuilder::new()
///     .started()
///     .enter(EventType::MethodEntry)
///     .exit(EventType::MethodExit)
///     .finished()
///     .build();
/// ```
#[derive(Default)]
pub struct EventListBuilder {
    events: Vec<LogEvent>,
}

impl EventListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, event_type: EventType, kind: EventKind) -> Self {
        let id = self.events.len() as u64 + 1;
        self.events.push(LogEvent {
            id,
            line_number: id as u32,
            timestamp: id as i64 * 1_000,
            event_type,
            duration_ns: None,
            namespace: None,
            kind,
        });
        self
    }

    pub fn started(self) -> Self {
        self.push(EventType::ExecutionStarted, EventKind::ExecutionStarted)
    }

    pub fn finished(self) -> Self {
        self.push(EventType::ExecutionFinished, EventKind::ExecutionFinished)
    }

    pub fn limits(self) -> Self {
        self.push(EventType::CumulativeLimitUsage, EventKind::LimitSummary)
    }

    pub fn enter(self, event_type: EventType) -> Self {
        self.push(event_type, EventKind::Enter)
    }

    pub fn exit(self, event_type: EventType) -> Self {
        self.push(event_type, EventKind::Exit)
    }

    /// `count` method entries with no exits.
    pub fn open_methods(self, count: usize) -> Self {
        (0..count).fold(self, |b, _| b.enter(EventType::MethodEntry))
    }

    pub fn debug(self) -> Self {
        self.push(EventType::UserDebug, EventKind::Other)
    }

    pub fn exception(self, exception_type: &str, message: &str, trace: Option<&str>) -> Self {
        self.push(
            EventType::FatalError,
            EventKind::Exception(ExceptionDetails {
                exception_type: exception_type.to_string(),
                message: message.to_string(),
                stack_trace: trace.map(String::from),
            }),
        )
    }

    pub fn build(self) -> Vec<LogEvent> {
        self.events
    }
}

// ---------------------------------------------------------------------------
// Indicator sets
// ---------------------------------------------------------------------------

/// All seven indicators in report order, with `found` set for `kinds`.
pub fn indicators_with(kinds: &[IndicatorKind]) -> Vec<TruncationIndicator> {
    IndicatorKind::ALL
        .iter()
        .map(|&kind| {
            if kinds.contains(&kind) {
                TruncationIndicator::found(kind, None, format!("{kind} (test)"))
            } else {
                TruncationIndicator::absent(kind)
            }
        })
        .collect()
}

/// Subset of [`IndicatorKind::ALL`] selected by the low seven bits of `mask`.
pub fn kinds_from_mask(mask: u8) -> Vec<IndicatorKind> {
    IndicatorKind::ALL
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, &kind)| kind)
        .collect()
}
