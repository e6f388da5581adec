//! apexlog: Apex debug log tokenizer and truncation analysis.
//!
//! This crate is a thin facade over the two workspace libraries so that
//! integration tests and the binary have one import point.
//!
//! # Architecture
//!
//! ```text
//! raw content ──► apexlog_core (tokenize, assemble flat events, header)
//!                      │
//!                      ▼
//!                apexlog_truncation (indicators ─► assess ─► impact / recovery)
//! ```
//!
//! [`analyze`] runs the whole pipeline over an in-memory string. It never
//! fails; line-level problems are reported in [`Analysis::line_errors`].

use anyhow::Context;
use serde::Serialize;
use std::path::Path;

pub use apexlog_core;
pub use apexlog_truncation;

pub use apexlog_core::{Config, LineError, LogEvent, LogHeader, Token};
pub use apexlog_truncation::{
    ImpactAssessment, RecoveryPlan, Severity, TruncationDetection, TruncationType,
};

/// Everything known about one debug log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<LogHeader>,
    pub lines_read: usize,
    pub token_count: usize,
    pub line_errors: Vec<LineError>,
    #[serde(skip)]
    pub events: Vec<LogEvent>,
    pub truncation: TruncationDetection,
    pub impact: ImpactAssessment,
    pub recovery: RecoveryPlan,
}

/// Run tokenization and truncation analysis over `content`.
pub fn analyze(content: &str, config: &Config) -> Analysis {
    let (lines_read, token_count, line_errors, events) =
        match apexlog_core::tokenize_content(content, &config.tokenizer) {
            Ok(log) => {
                let events = apexlog_core::events_from_tokenized(content, &log);
                (log.lines_read, log.tokens.len(), log.errors, events)
            }
            Err(apexlog_core::TokenizeFailure::NoTokens { errors }) => {
                (content.lines().count(), 0, errors, Vec::new())
            }
        };

    let header = LogHeader::from_content(content);
    let truncation = apexlog_truncation::detect_truncation(content, &events, &config.truncation);
    let impact = apexlog_truncation::assess_impact(&truncation);
    let recovery = apexlog_truncation::plan_recovery_with_header(&truncation, header.as_ref());

    tracing::info!(
        lines = lines_read,
        tokens = token_count,
        events = events.len(),
        truncated = truncation.is_truncated,
        "analysis complete"
    );

    Analysis {
        header,
        lines_read,
        token_count,
        line_errors,
        events,
        truncation,
        impact,
        recovery,
    }
}

/// Read a log from disk (lossy UTF-8) and analyze it.
pub fn analyze_file(path: &Path, config: &Config) -> anyhow::Result<Analysis> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(analyze(&content, config))
}
