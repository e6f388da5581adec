//! Domain-specific assertion macros for apexlog harnesses.
//!
//! These add context-rich failure messages that make it clear which
//! tokenizer or truncation invariant was violated.

// ---------------------------------------------------------------------------
// Tokenizer assertions
// ---------------------------------------------------------------------------

/// Assert that a tokenizer result is `Ok(None)`.
///
/// ```rust
/// assert_not_event!(tokenize_line("", 1, &config), "");
/// ```
#[macro_export]
macro_rules! assert_not_event {
    ($result:expr, $line:expr) => {{
        match $result {
            Ok(None) => {}
            Ok(Some(token)) => panic!(
                "assert_not_event! failed: line was tokenized.\n  line:  {:?}\n  token: {:?}",
                $line, token
            ),
            Err(err) => panic!(
                "assert_not_event! failed: line produced an error.\n  line:  {:?}\n  error: {}",
                $line, err
            ),
        }
    }};
}

/// Unwrap a tokenizer result that must be a token.
///
/// ```rust
/// let token = expect_token!(tokenize_line(line, 1, &config), line);
/// ```
#[macro_export]
macro_rules! expect_token {
    ($result:expr, $line:expr) => {{
        match $result {
            Ok(Some(token)) => token,
            Ok(None) => panic!("expect_token! failed: line was not an event.\n  line: {:?}", $line),
            Err(err) => panic!(
                "expect_token! failed: line produced an error.\n  line:  {:?}\n  error: {}",
                $line, err
            ),
        }
    }};
}

// ---------------------------------------------------------------------------
// Truncation assertions
// ---------------------------------------------------------------------------

/// Assert that a detection reports a given indicator as found.
#[macro_export]
macro_rules! assert_indicator {
    ($detection:expr, $kind:expr) => {{
        let detection: &apexlog_truncation::TruncationDetection = &$detection;
        let kind: apexlog_truncation::IndicatorKind = $kind;
        if !detection.has_indicator(kind) {
            panic!(
                "assert_indicator! failed: {:?} not found.\n  found: {:?}",
                kind,
                detection.found_indicators().map(|i| i.kind).collect::<Vec<_>>()
            );
        }
    }};
}

/// Assert that a detection does not report a given indicator.
#[macro_export]
macro_rules! assert_no_indicator {
    ($detection:expr, $kind:expr) => {{
        let detection: &apexlog_truncation::TruncationDetection = &$detection;
        let kind: apexlog_truncation::IndicatorKind = $kind;
        if let Some(indicator) = detection.found_indicators().find(|i| i.kind == kind) {
            panic!(
                "assert_no_indicator! failed: {:?} was found.\n  line:    {:?}\n  details: {:?}",
                kind, indicator.line_number, indicator.details
            );
        }
    }};
}

/// Assert the "complete log" baseline: not truncated, severity `None`,
/// no lost information.
#[macro_export]
macro_rules! assert_complete {
    ($detection:expr) => {{
        let detection: &apexlog_truncation::TruncationDetection = &$detection;
        if detection.is_truncated
            || detection.severity != apexlog_truncation::Severity::None
            || !detection.likely_lost_info.is_empty()
        {
            panic!(
                "assert_complete! failed:\n  truncated: {}\n  severity:  {:?}\n  found:     {:?}\n  lost:      {:?}",
                detection.is_truncated,
                detection.severity,
                detection.found_indicators().map(|i| i.kind).collect::<Vec<_>>(),
                detection.likely_lost_info
            );
        }
    }};
}
