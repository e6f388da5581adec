//! Value types produced by truncation analysis.
//!
//! All of them are immutable once built and serialise with the upper-snake
//! enum names used in reports.

use apexlog_core::{DebugLevel, LogCategory};
use serde::Serialize;
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// One of the seven independent truncation signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorKind {
    ExplicitMarker,
    SizeThreshold,
    AbruptEnding,
    UnclosedEvents,
    MissingLimits,
    MidLineCut,
    IncompleteStacktrace,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 7] = [
        IndicatorKind::ExplicitMarker,
        IndicatorKind::SizeThreshold,
        IndicatorKind::AbruptEnding,
        IndicatorKind::UnclosedEvents,
        IndicatorKind::MissingLimits,
        IndicatorKind::MidLineCut,
        IndicatorKind::IncompleteStacktrace,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IndicatorKind::ExplicitMarker => "Explicit truncation marker",
            IndicatorKind::SizeThreshold => "Log size near platform limit",
            IndicatorKind::AbruptEnding => "Abrupt ending",
            IndicatorKind::UnclosedEvents => "Unclosed events",
            IndicatorKind::MissingLimits => "Missing limit summary",
            IndicatorKind::MidLineCut => "Final line cut mid-way",
            IndicatorKind::IncompleteStacktrace => "Incomplete stack trace",
        }
    }
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one indicator check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TruncationIndicator {
    pub kind: IndicatorKind,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl TruncationIndicator {
    pub fn absent(kind: IndicatorKind) -> Self {
        Self {
            kind,
            found: false,
            line_number: None,
            details: None,
        }
    }

    pub fn found(kind: IndicatorKind, line_number: Option<u32>, details: impl Into<String>) -> Self {
        Self {
            kind,
            found: true,
            line_number,
            details: Some(details.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TruncationType {
    /// The log is not truncated.
    None,
    SizeLimit,
    LineLimit,
    Timeout,
    Unknown,
}

impl TruncationType {
    pub fn as_str(self) -> &'static str {
        match self {
            TruncationType::None => "NONE",
            TruncationType::SizeLimit => "SIZE_LIMIT",
            TruncationType::LineLimit => "LINE_LIMIT",
            TruncationType::Timeout => "TIMEOUT",
            TruncationType::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for TruncationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Truncation severity, totally ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    None,
    Minor,
    Moderate,
    Severe,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::None => "NONE",
            Severity::Minor => "MINOR",
            Severity::Moderate => "MODERATE",
            Severity::Severe => "SEVERE",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Information that is likely missing from a truncated log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LostInformationType {
    ExceptionDetails,
    FinalLimits,
    ExecutionEnd,
    PerformanceData,
    NestedEvents,
    DebugOutput,
    AsyncCorrelations,
}

impl LostInformationType {
    pub fn as_str(self) -> &'static str {
        match self {
            LostInformationType::ExceptionDetails => "EXCEPTION_DETAILS",
            LostInformationType::FinalLimits => "FINAL_LIMITS",
            LostInformationType::ExecutionEnd => "EXECUTION_END",
            LostInformationType::PerformanceData => "PERFORMANCE_DATA",
            LostInformationType::NestedEvents => "NESTED_EVENTS",
            LostInformationType::DebugOutput => "DEBUG_OUTPUT",
            LostInformationType::AsyncCorrelations => "ASYNC_CORRELATIONS",
        }
    }
}

impl std::fmt::Display for LostInformationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Confidence {
    /// 0.0 ..= 1.0
    pub score: f64,
    /// One entry per found indicator.
    pub reasons: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub limitations: Vec<String>,
}

/// The truncation judgement for one parse pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TruncationDetection {
    pub is_truncated: bool,
    pub truncation_type: TruncationType,
    pub severity: Severity,
    pub confidence: Confidence,
    pub indicators: Vec<TruncationIndicator>,
    pub likely_lost_info: BTreeSet<LostInformationType>,
    pub ai_recommendations: Vec<String>,
}

impl TruncationDetection {
    pub fn found_indicators(&self) -> impl Iterator<Item = &TruncationIndicator> {
        self.indicators.iter().filter(|i| i.found)
    }

    pub fn has_indicator(&self, kind: IndicatorKind) -> bool {
        self.found_indicators().any(|i| i.kind == kind)
    }

    pub fn has_lost(&self, info: LostInformationType) -> bool {
        self.likely_lost_info.contains(&info)
    }
}

// ---------------------------------------------------------------------------
// Impact
// ---------------------------------------------------------------------------

/// Which downstream analyses can still be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactAssessment {
    pub issue_detection_reliable: bool,
    pub performance_metrics_reliable: bool,
    pub limit_analysis_reliable: bool,
    pub async_correlation_reliable: bool,
    pub limitations: Vec<String>,
    pub still_analyzable: Vec<String>,
}

// ---------------------------------------------------------------------------
// Recovery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryStrategy {
    pub name: String,
    pub applicable: bool,
    pub steps: Vec<String>,
    pub expected_improvement: String,
}

/// Recommended verbosity for one log category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugLevelRecommendation {
    pub category: LogCategory,
    pub recommended_level: DebugLevel,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryPlan {
    pub can_recover: bool,
    pub confidence: f64,
    pub strategies: Vec<RecoveryStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_level_recommendations: Option<Vec<DebugLevelRecommendation>>,
    pub ai_working_guidance: Vec<String>,
}
