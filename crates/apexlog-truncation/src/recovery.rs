//! Recovery planning: how to get a complete capture next time.
//!
//! Two surfaces live here. [`plan_recovery`] reads a detection and proposes
//! strategies. [`recommended_debug_levels`] is a fixed advisory lookup keyed by
//! the kind of problem being chased and does not look at any detection.

use crate::types::{
    DebugLevelRecommendation, RecoveryPlan, RecoveryStrategy, Severity, TruncationDetection,
    TruncationType,
};
use apexlog_core::{DebugLevel, LogCategory, LogHeader};
use serde::Serialize;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Suspected issue categories
// ---------------------------------------------------------------------------

/// The kind of problem a developer is investigating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuspectedIssue {
    Performance,
    GovernorLimits,
    Exceptions,
    Integrations,
    Automation,
}

impl SuspectedIssue {
    pub const ALL: [SuspectedIssue; 5] = [
        SuspectedIssue::Performance,
        SuspectedIssue::GovernorLimits,
        SuspectedIssue::Exceptions,
        SuspectedIssue::Integrations,
        SuspectedIssue::Automation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SuspectedIssue::Performance => "performance",
            SuspectedIssue::GovernorLimits => "governor-limits",
            SuspectedIssue::Exceptions => "exceptions",
            SuspectedIssue::Integrations => "integrations",
            SuspectedIssue::Automation => "automation",
        }
    }
}

impl std::fmt::Display for SuspectedIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown issue category '{0}' (expected one of: performance, governor-limits, exceptions, integrations, automation)")]
pub struct UnknownIssue(pub String);

impl FromStr for SuspectedIssue {
    type Err = UnknownIssue;

    /// Accepts `governor-limits`, `governor_limits` and `GOVERNOR_LIMITS` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase().replace('_', "-");
        SuspectedIssue::ALL
            .into_iter()
            .find(|issue| issue.as_str() == normalised)
            .ok_or_else(|| UnknownIssue(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Static advisory tables
// ---------------------------------------------------------------------------

const fn rec(
    category: LogCategory,
    recommended_level: DebugLevel,
    reason: &'static str,
) -> DebugLevelRecommendation {
    DebugLevelRecommendation {
        category,
        recommended_level,
        reason,
    }
}

static PERFORMANCE: [DebugLevelRecommendation; 6] = [
    rec(LogCategory::ApexProfiling, DebugLevel::Finest, "Method timings and cumulative profiling"),
    rec(LogCategory::Database, DebugLevel::Finest, "Query plans, row counts and DML timings"),
    rec(LogCategory::ApexCode, DebugLevel::Info, "Keep code logging light so timings stay accurate"),
    rec(LogCategory::System, DebugLevel::Info, "Limit checkpoints without per-call noise"),
    rec(LogCategory::Workflow, DebugLevel::Info, "Automation that adds to transaction time"),
    rec(LogCategory::Visualforce, DebugLevel::None, "Not needed for server-side timing"),
];

static GOVERNOR_LIMITS: [DebugLevelRecommendation; 5] = [
    rec(LogCategory::ApexProfiling, DebugLevel::Finest, "Cumulative limit usage per namespace"),
    rec(LogCategory::Database, DebugLevel::Finest, "Every query and DML statement is counted"),
    rec(LogCategory::ApexCode, DebugLevel::Debug, "Loop and method context for limit consumption"),
    rec(LogCategory::System, DebugLevel::Debug, "Limit usage checkpoints"),
    rec(LogCategory::Visualforce, DebugLevel::None, "Not needed for limit analysis"),
];

static EXCEPTIONS: [DebugLevelRecommendation; 5] = [
    rec(LogCategory::ApexCode, DebugLevel::Finest, "Full stack traces and variable assignments"),
    rec(LogCategory::System, DebugLevel::Debug, "System method calls around the throw"),
    rec(LogCategory::Database, DebugLevel::Info, "Queries leading up to the failure"),
    rec(LogCategory::ApexProfiling, DebugLevel::None, "Profiling output is noise here"),
    rec(LogCategory::Visualforce, DebugLevel::None, "Not needed unless the page itself fails"),
];

static INTEGRATIONS: [DebugLevelRecommendation; 5] = [
    rec(LogCategory::Callout, DebugLevel::Finest, "Request and response bodies and headers"),
    rec(LogCategory::ApexCode, DebugLevel::Debug, "Callout setup and response handling"),
    rec(LogCategory::System, DebugLevel::Info, "Named credential and HTTP client calls"),
    rec(LogCategory::Database, DebugLevel::Warn, "Only database problems around the callout"),
    rec(LogCategory::ApexProfiling, DebugLevel::None, "Profiling output is noise here"),
];

static AUTOMATION: [DebugLevelRecommendation; 5] = [
    rec(LogCategory::Workflow, DebugLevel::Finest, "Flow elements, rule evaluation and field updates"),
    rec(LogCategory::Validation, DebugLevel::Info, "Validation rule outcomes"),
    rec(LogCategory::ApexCode, DebugLevel::Debug, "Triggers fired by the automation"),
    rec(LogCategory::Database, DebugLevel::Info, "Records touched by the automation"),
    rec(LogCategory::ApexProfiling, DebugLevel::None, "Profiling output is noise here"),
];

/// Levels that cut volume without losing the events truncation analysis needs.
static VOLUME_REDUCTION: [DebugLevelRecommendation; 6] = [
    rec(LogCategory::ApexProfiling, DebugLevel::None, "Profiling output is the largest optional contributor"),
    rec(LogCategory::Visualforce, DebugLevel::None, "View state and page events are rarely needed"),
    rec(LogCategory::System, DebugLevel::Warn, "System method calls inflate logs quickly"),
    rec(LogCategory::ApexCode, DebugLevel::Debug, "Keeps USER_DEBUG output and method entry/exit"),
    rec(LogCategory::Database, DebugLevel::Info, "Keeps queries and DML without query plans"),
    rec(LogCategory::Workflow, DebugLevel::Info, "Keeps automation outcomes without element detail"),
];

/// Recommended verbosity per category for a suspected issue.
pub fn recommended_debug_levels(issue: SuspectedIssue) -> &'static [DebugLevelRecommendation] {
    match issue {
        SuspectedIssue::Performance => &PERFORMANCE,
        SuspectedIssue::GovernorLimits => &GOVERNOR_LIMITS,
        SuspectedIssue::Exceptions => &EXCEPTIONS,
        SuspectedIssue::Integrations => &INTEGRATIONS,
        SuspectedIssue::Automation => &AUTOMATION,
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

pub fn plan_recovery(detection: &TruncationDetection) -> RecoveryPlan {
    plan_recovery_with_header(detection, None)
}

/// Like [`plan_recovery`], but drops level recommendations the capture
/// already satisfies when its header is known.
pub fn plan_recovery_with_header(
    detection: &TruncationDetection,
    header: Option<&LogHeader>,
) -> RecoveryPlan {
    let applicable = detection.is_truncated;
    let mut strategies = vec![
        reduce_levels(applicable),
        split_operation(applicable),
        targeted_tracing(applicable),
    ];
    if detection.severity >= Severity::Severe {
        strategies.push(escalate());
    }

    let debug_level_recommendations: Option<Vec<DebugLevelRecommendation>> =
        detection.is_truncated.then(|| {
            VOLUME_REDUCTION
                .iter()
                .filter(|row| match header {
                    Some(header) => header
                        .level(row.category)
                        .is_some_and(|current| current > row.recommended_level),
                    None => true,
                })
                .copied()
                .collect()
        });

    RecoveryPlan {
        can_recover: detection.is_truncated,
        confidence: plan_confidence(detection),
        strategies,
        debug_level_recommendations,
        ai_working_guidance: working_guidance(detection),
    }
}

fn plan_confidence(detection: &TruncationDetection) -> f64 {
    if !detection.is_truncated {
        return 0.0;
    }
    match detection.truncation_type {
        TruncationType::SizeLimit | TruncationType::LineLimit => 0.9,
        TruncationType::Timeout => 0.7,
        TruncationType::Unknown | TruncationType::None => 0.6,
    }
}

fn strategy(
    name: &str,
    applicable: bool,
    steps: &[&str],
    expected_improvement: &str,
) -> RecoveryStrategy {
    RecoveryStrategy {
        name: name.to_string(),
        applicable,
        steps: steps.iter().map(|s| s.to_string()).collect(),
        expected_improvement: expected_improvement.to_string(),
    }
}

fn reduce_levels(applicable: bool) -> RecoveryStrategy {
    strategy(
        "Reduce debug levels",
        applicable,
        &[
            "Set APEX_PROFILING and VISUALFORCE to NONE",
            "Lower SYSTEM to WARN and DB to INFO",
            "Keep APEX_CODE at DEBUG or above only for the classes under investigation",
        ],
        "Log volume typically drops by half or more",
    )
}

fn split_operation(applicable: bool) -> RecoveryStrategy {
    strategy(
        "Split the operation",
        applicable,
        &[
            "Re-run with a smaller batch size or fewer records",
            "Exercise the failing path in isolation, for example from a focused test",
        ],
        "Each capture stays under the platform size limit",
    )
}

fn targeted_tracing(applicable: bool) -> RecoveryStrategy {
    strategy(
        "Targeted tracing",
        applicable,
        &[
            "Use a trace flag scoped to the affected user or class",
            "Apply class-level debug level overrides to the code under investigation",
            "Add USER_DEBUG statements at the suspected failure point",
        ],
        "The relevant section of execution is captured in full",
    )
}

fn escalate() -> RecoveryStrategy {
    strategy(
        "Escalate",
        true,
        &[
            "Contact platform support about extended debug log capture",
            "Capture the transaction with event monitoring as a cross-check",
        ],
        "Visibility beyond the standard debug log limits",
    )
}

fn working_guidance(detection: &TruncationDetection) -> Vec<String> {
    if !detection.is_truncated {
        return vec!["The log is complete; no recovery is needed.".to_string()];
    }

    let mut guidance = vec![
        "Base conclusions on the events that were captured and say that the log is truncated."
            .to_string(),
    ];
    if !detection.likely_lost_info.is_empty() {
        let lost: Vec<String> = detection
            .likely_lost_info
            .iter()
            .map(|info| info.to_string())
            .collect();
        guidance.push(format!("Treat these as unknown: {}.", lost.join(", ")));
    }
    if detection.severity >= Severity::Severe {
        guidance.push(
            "Ask for a new capture before drawing conclusions about the end of the transaction."
                .to_string(),
        );
    }
    guidance
}
