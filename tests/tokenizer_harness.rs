#![allow(unused)]
//! Tokenizer integration harness.
//!
//! # What this covers
//!
//! - **Reference lines**: the canonical method-entry line, header lines and
//!   empty input produce exactly the documented results.
//! - **Fast/regex equivalence**: for every line both paths accept, event type
//!   and timestamp agree. Checked over the fixture corpus and over generated
//!   event-shaped lines.
//! - **Null safety**: empty, whitespace-only and header-shaped lines are never
//!   errors.
//! - **Determinism**: tokenizing the same line twice gives the same result.
//! - **Bounded cost**: 100,000-character lines tokenize well under a second on
//!   both paths.
//! - **Batch driver**: tokens and errors are collected side by side; total
//!   failure only when nothing was recoverable.
//!
//! # What this does NOT cover
//!
//! - Truncation analysis (see truncation_harness)
//! - Async line sources (see stream_harness)
//!
//! # Running
//!
//! ```sh
//! cargo test --test tokenizer_harness
//! ```

mod common;
use common::*;

use apexlog_core::{
    tokenize_content, tokenize_line, tokenize_line_fast, tokenize_line_regex, ErrorCode,
    EventType, TokenizeFailure, TokenizerConfig,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use std::time::{Duration, Instant};

fn config() -> TokenizerConfig {
    TokenizerConfig::default()
}

// ---------------------------------------------------------------------------
// Reference lines
// ---------------------------------------------------------------------------

#[test]
fn method_entry_line_tokenizes_exactly() {
    let line = "12:34:56.789 (123456789)|METHOD_ENTRY|[1]|MyClass.doWork";
    let token = expect_token!(tokenize_line(line, 1, &config()), line);
    assert_eq!(token.line_number, 1);
    assert_eq!(token.timestamp, 123_456_789);
    assert_eq!(token.event_type, EventType::MethodEntry);
    assert_eq!(token.segments, vec!["[1]", "MyClass.doWork"]);

    let json = serde_json::to_value(&token).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "lineNumber": 1,
            "timestamp": 123456789,
            "eventType": "METHOD_ENTRY",
            "segments": ["[1]", "MyClass.doWork"],
        })
    );
}

#[test]
fn header_line_is_not_an_event() {
    let line = "48.0 APEX_CODE,FINEST;APEX_PROFILING,INFO";
    assert_not_event!(tokenize_line(line, 1, &config()), line);
}

#[test]
fn empty_line_is_not_an_event() {
    assert_not_event!(tokenize_line("", 1, &config()), "");
}

#[rstest]
#[case::overflow(MALFORMED_EVENT_LINES[0], ErrorCode::TimestampOutOfRange)]
#[case::empty_type(MALFORMED_EVENT_LINES[1], ErrorCode::MissingEventType)]
fn malformed_lines_carry_code_and_raw_line(#[case] line: &str, #[case] code: ErrorCode) {
    let err = tokenize_line(line, 7, &config()).unwrap_err();
    assert_eq!(err.code, code);
    assert_eq!(err.line_number, 7);
    assert_eq!(err.raw_line, line);
}

// ---------------------------------------------------------------------------
// Fixture corpus
// ---------------------------------------------------------------------------

#[rstest]
fn every_fixture_event_line_tokenizes(#[values(0, 1, 2, 3, 4, 5, 6, 7, 8, 9)] idx: usize) {
    let line = EVENT_LINES[idx];
    let token = expect_token!(tokenize_line(line, 1, &config()), line);
    assert!(token.timestamp >= 0);
}

#[test]
fn fast_and_regex_agree_on_fixture_lines() {
    for (i, line) in EVENT_LINES.iter().enumerate() {
        let n = i as u32 + 1;
        let fast = expect_token!(tokenize_line_fast(line, n, &config()), line);
        let regex = expect_token!(tokenize_line_regex(line, n, &config()), line);
        assert_eq!(fast, regex, "{line}");
    }
}

#[test]
fn every_non_event_line_is_null() {
    for line in NON_EVENT_LINES {
        assert_not_event!(tokenize_line(line, 1, &config()), line);
    }
}

#[test]
fn bracket_suffix_does_not_change_the_type() {
    let plain = expect_token!(tokenize_line(EVENT_LINES[3], 1, &config()), EVENT_LINES[3]);
    let suffixed = expect_token!(tokenize_line(EVENT_LINES[8], 1, &config()), EVENT_LINES[8]);
    assert_eq!(plain.event_type, suffixed.event_type);
}

#[test]
fn unknown_type_is_a_token_with_sentinel() {
    let token = expect_token!(tokenize_line(EVENT_LINES[7], 1, &config()), EVENT_LINES[7]);
    assert_eq!(token.event_type, EventType::Unknown);
    assert_eq!(token.segments, vec!["[7]", "unknown to the registry"]);
}

// ---------------------------------------------------------------------------
// Bounded cost
// ---------------------------------------------------------------------------

#[rstest]
#[case::long_segment(format!("10:00:00.0 (1)|USER_DEBUG|[1]|DEBUG|{}", "a".repeat(100_000)))]
#[case::long_digits(format!("1{}|", "9".repeat(100_000)))]
#[case::long_pipes(format!("1{}", "|".repeat(100_000)))]
fn long_lines_tokenize_quickly(#[case] line: String) {
    let start = Instant::now();
    let _ = tokenize_line(&line, 1, &config());
    let _ = tokenize_line_fast(&line, 1, &config());
    let _ = tokenize_line_regex(&line, 1, &config());
    assert!(start.elapsed() < Duration::from_secs(1), "took {:?}", start.elapsed());
}

#[test]
fn lines_over_the_cap_are_cut_before_classification() {
    let cfg = TokenizerConfig {
        max_line_length: 40,
        ..config()
    };
    let line = format!("10:00:00.0 (1)|USER_DEBUG|[1]|DEBUG|{}", "a".repeat(100));
    let token = expect_token!(tokenize_line(&line, 1, &cfg), line);
    let total: usize = token.segments.iter().map(String::len).sum();
    assert!(total < 40);
}

// ---------------------------------------------------------------------------
// Batch driver
// ---------------------------------------------------------------------------

#[test]
fn complete_log_tokenizes_cleanly() {
    let log = tokenize_content(COMPLETE_LOG, &config()).unwrap();
    assert!(log.is_clean());
    assert_eq!(log.lines_read, COMPLETE_LOG.lines().count());
    assert_eq!(log.tokens.len(), 13);
    assert_eq!(log.tokens[0].event_type, EventType::UserInfo);
    assert_eq!(log.tokens[0].line_number, 2);
    assert_eq!(log.tokens.last().map(|t| t.event_type), Some(EventType::ExecutionFinished));
}

#[test]
fn crlf_content_matches_lf_content() {
    let crlf = COMPLETE_LOG.replace('\n', "\r\n");
    let lf = tokenize_content(COMPLETE_LOG, &config()).unwrap();
    let crlf = tokenize_content(&crlf, &config()).unwrap();
    assert_eq!(lf.tokens, crlf.tokens);
}

#[test]
fn errors_are_collected_alongside_tokens() {
    let content = format!("{}\n{}\n{}\n", EVENT_LINES[1], MALFORMED_EVENT_LINES[0], EVENT_LINES[5]);
    let log = tokenize_content(&content, &config()).unwrap();
    assert_eq!(log.tokens.len(), 2);
    assert_eq!(log.errors.len(), 1);
    assert_eq!(log.errors[0].line_number, 2);
}

#[test]
fn only_errors_is_total_failure() {
    let content = MALFORMED_EVENT_LINES.join("\n");
    match tokenize_content(&content, &config()) {
        Err(TokenizeFailure::NoTokens { errors }) => assert_eq!(errors.len(), 2),
        other => panic!("expected total failure, got {other:?}"),
    }
}

#[test]
fn no_events_and_no_errors_is_an_empty_success() {
    let log = tokenize_content("48.0 APEX_CODE,FINEST\n\n", &config()).unwrap();
    assert!(log.tokens.is_empty());
    assert!(log.is_clean());
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

const EVENT_SHAPED: &str =
    r"[0-9]{1,2}:[0-9]{2}:[0-9]{2}\.[0-9]{1,3} \([0-9]{1,15}\)\|[A-Z_]{1,24}(\|[A-Za-z0-9 .:,\[\]]{0,24}){0,4}";

proptest! {
    #[test]
    fn tokenizing_is_deterministic(line in ".{0,200}") {
        let first = tokenize_line(&line, 1, &config());
        let second = tokenize_line(&line, 1, &config());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn fast_and_regex_agree_where_both_succeed(line in EVENT_SHAPED) {
        let fast = tokenize_line_fast(&line, 1, &config());
        let regex = tokenize_line_regex(&line, 1, &config());
        if let (Ok(Some(fast)), Ok(Some(regex))) = (fast, regex) {
            prop_assert_eq!(fast.event_type, regex.event_type);
            prop_assert_eq!(fast.timestamp, regex.timestamp);
        }
    }

    #[test]
    fn event_shaped_lines_always_tokenize(line in EVENT_SHAPED) {
        let token = tokenize_line(&line, 3, &config());
        prop_assert!(matches!(token, Ok(Some(ref t)) if t.line_number == 3), "{:?}", token);
    }

    #[test]
    fn whitespace_is_never_an_error(line in "[ \t\r\n]{0,40}") {
        prop_assert_eq!(tokenize_line(&line, 1, &config()), Ok(None));
    }

    #[test]
    fn header_lines_are_never_events(
        line in r"[0-9]{1,2}\.[0-9] [A-Z_]{2,14},[A-Z]{4,6}(;[A-Z_]{2,14},[A-Z]{4,6}){0,6}"
    ) {
        prop_assert_eq!(tokenize_line(&line, 1, &config()), Ok(None));
    }
}
