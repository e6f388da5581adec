//! apexlog-truncation: decides whether an Apex debug log was cut short and
//! what to do about it.
//!
//! ```text
//! content + [LogEvent] ──► indicators (7 pure detectors)
//!                               │
//!                               ▼
//!                          assess ──► TruncationDetection ──┬─► impact   ──► ImpactAssessment
//!                                                           └─► recovery ──► RecoveryPlan
//! ```
//!
//! None of these functions fail: empty content or an empty event list yields
//! "not truncated" with high confidence.

pub mod assess;
pub mod impact;
pub mod indicators;
pub mod recovery;
pub mod types;

pub use assess::{assess_indicators, detect_truncation};
pub use impact::assess_impact;
pub use indicators::detect_all;
pub use recovery::{
    plan_recovery, plan_recovery_with_header, recommended_debug_levels, SuspectedIssue,
    UnknownIssue,
};
pub use types::{
    Confidence, DebugLevelRecommendation, ImpactAssessment, IndicatorKind, LostInformationType,
    RecoveryPlan, RecoveryStrategy, Severity, TruncationDetection, TruncationIndicator,
    TruncationType,
};
