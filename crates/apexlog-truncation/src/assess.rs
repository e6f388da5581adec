//! Truncation assessor: turns the seven indicator results into a single
//! [`TruncationDetection`].
//!
//! Severity is the maximum over every rule that applies, so adding an
//! indicator can never lower it. Confidence, type and lost-information rules
//! read the same found set.

use crate::indicators::{detect_all, size_ratio};
use crate::types::{
    Confidence, IndicatorKind, LostInformationType, Severity, TruncationDetection,
    TruncationIndicator, TruncationType,
};
use apexlog_core::{LogEvent, TruncationConfig};
use std::collections::BTreeSet;

/// Exception message fragment the platform writes when a transaction runs
/// out of CPU time.
const CPU_LIMIT_MESSAGE: &str = "Apex CPU time limit exceeded";

/// Run every detector and assess the result.
pub fn detect_truncation(
    content: &str,
    events: &[LogEvent],
    config: &TruncationConfig,
) -> TruncationDetection {
    let indicators = detect_all(content, events, config);
    let detection = assess(content.len(), indicators, ended_on_cpu_limit(events), config);
    tracing::debug!(
        truncated = detection.is_truncated,
        truncation_type = ?detection.truncation_type,
        severity = ?detection.severity,
        confidence = detection.confidence.score,
        "truncation assessed"
    );
    detection
}

/// Assess indicators that were computed elsewhere.
///
/// `content_len` is the byte length of the log the indicators came from; the
/// size-ratio rules read it directly.
pub fn assess_indicators(
    content_len: usize,
    indicators: Vec<TruncationIndicator>,
    config: &TruncationConfig,
) -> TruncationDetection {
    assess(content_len, indicators, false, config)
}

fn assess(
    content_len: usize,
    indicators: Vec<TruncationIndicator>,
    cpu_limit: bool,
    config: &TruncationConfig,
) -> TruncationDetection {
    let found: Vec<&TruncationIndicator> = indicators.iter().filter(|i| i.found).collect();
    let ratio = size_ratio(content_len, config);

    let is_truncated = !found.is_empty();
    let truncation_type = if is_truncated {
        truncation_type(&found, ratio, cpu_limit, config)
    } else {
        TruncationType::None
    };
    let severity = severity(&found, ratio, config);
    let confidence = confidence(&found, config);
    let likely_lost_info = lost_information(&found);
    let ai_recommendations =
        recommendations(is_truncated, truncation_type, severity, &likely_lost_info);

    TruncationDetection {
        is_truncated,
        truncation_type,
        severity,
        confidence,
        indicators,
        likely_lost_info,
        ai_recommendations,
    }
}

fn has(found: &[&TruncationIndicator], kind: IndicatorKind) -> bool {
    found.iter().any(|i| i.kind == kind)
}

// ---------------------------------------------------------------------------
// Type
// ---------------------------------------------------------------------------

fn truncation_type(
    found: &[&TruncationIndicator],
    ratio: f64,
    cpu_limit: bool,
    config: &TruncationConfig,
) -> TruncationType {
    if let Some(marker) = found.iter().find(|i| i.kind == IndicatorKind::ExplicitMarker) {
        let skipped = marker
            .details
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains("skipped"));
        return if skipped {
            TruncationType::LineLimit
        } else {
            TruncationType::SizeLimit
        };
    }
    if ratio >= config.size_critical_ratio || has(found, IndicatorKind::SizeThreshold) {
        return TruncationType::SizeLimit;
    }
    if cpu_limit {
        return TruncationType::Timeout;
    }
    TruncationType::Unknown
}

fn ended_on_cpu_limit(events: &[LogEvent]) -> bool {
    events
        .iter()
        .rev()
        .find_map(LogEvent::exception)
        .is_some_and(|e| e.message.contains(CPU_LIMIT_MESSAGE))
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

fn severity(found: &[&TruncationIndicator], ratio: f64, config: &TruncationConfig) -> Severity {
    if found.is_empty() {
        return Severity::None;
    }

    let mut severity = Severity::Minor;
    let mut raise = |to: Severity| severity = severity.max(to);

    if found.len() >= 2 {
        raise(Severity::Moderate);
    }
    if has(found, IndicatorKind::UnclosedEvents) && found.len() >= 3 {
        raise(Severity::Severe);
    }
    if ratio >= config.size_warning_ratio {
        raise(Severity::Moderate);
    }
    if ratio >= config.size_critical_ratio {
        raise(Severity::Severe);
    }
    if has(found, IndicatorKind::MidLineCut) || has(found, IndicatorKind::IncompleteStacktrace) {
        raise(Severity::Critical);
    }
    severity
}

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

fn confidence(found: &[&TruncationIndicator], config: &TruncationConfig) -> Confidence {
    let scores = &config.confidence;
    let reasons: Vec<String> = found.iter().map(|i| reason(i)).collect();
    let mut limitations = Vec::new();

    let score = match found.len() {
        0 => scores.complete,
        _ if has(found, IndicatorKind::ExplicitMarker) => scores.explicit_marker,
        n if n >= 2 && has(found, IndicatorKind::SizeThreshold) => scores.size_with_corroboration,
        n if n >= 3 => scores.three_or_more,
        2 => scores.two_indicators,
        _ => {
            limitations.push(
                "Only one indicator was found; this may be a false positive on a log that \
                 completed normally."
                    .to_string(),
            );
            scores.single_indicator
        }
    };

    Confidence {
        score,
        reasons,
        limitations,
    }
}

fn reason(indicator: &TruncationIndicator) -> String {
    let mut text = indicator.kind.label().to_string();
    if let Some(line) = indicator.line_number {
        text.push_str(&format!(" (line {line})"));
    }
    if let Some(details) = indicator.details.as_deref() {
        text.push_str(": ");
        text.push_str(details);
    }
    text
}

// ---------------------------------------------------------------------------
// Lost information
// ---------------------------------------------------------------------------

fn lost_information(found: &[&TruncationIndicator]) -> BTreeSet<LostInformationType> {
    let mut lost = BTreeSet::new();
    for indicator in found {
        match indicator.kind {
            IndicatorKind::IncompleteStacktrace => {
                lost.insert(LostInformationType::ExceptionDetails);
            }
            IndicatorKind::MissingLimits => {
                lost.insert(LostInformationType::FinalLimits);
            }
            IndicatorKind::AbruptEnding => {
                lost.insert(LostInformationType::ExecutionEnd);
                lost.insert(LostInformationType::PerformanceData);
            }
            IndicatorKind::UnclosedEvents => {
                lost.insert(LostInformationType::NestedEvents);
            }
            IndicatorKind::ExplicitMarker
            | IndicatorKind::SizeThreshold
            | IndicatorKind::MidLineCut => {}
        }
    }
    if found.len() >= 2 {
        lost.insert(LostInformationType::DebugOutput);
        lost.insert(LostInformationType::AsyncCorrelations);
    }
    lost
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

fn recommendations(
    is_truncated: bool,
    truncation_type: TruncationType,
    severity: Severity,
    lost: &BTreeSet<LostInformationType>,
) -> Vec<String> {
    if !is_truncated {
        return vec!["Log appears complete; all analysis results can be relied on.".to_string()];
    }

    let mut out = Vec::new();
    out.push(type_headline(truncation_type).to_string());
    if let Some(line) = severity_note(severity) {
        out.push(line.to_string());
    }
    out.extend(lost.iter().map(|info| lost_note(*info).to_string()));
    out
}

fn type_headline(truncation_type: TruncationType) -> &'static str {
    match truncation_type {
        TruncationType::SizeLimit => {
            "The log hit the platform debug log size limit; events after the cut point are missing."
        }
        TruncationType::LineLimit => {
            "The platform skipped part of the log output; some lines are missing from the capture."
        }
        TruncationType::Timeout => {
            "The transaction stopped on the CPU time limit; the log ends where execution was aborted."
        }
        TruncationType::Unknown | TruncationType::None => {
            "The log appears truncated for an undetermined reason; treat conclusions about its end as provisional."
        }
    }
}

fn severity_note(severity: Severity) -> Option<&'static str> {
    Some(match severity {
        Severity::None => return None,
        Severity::Minor => "Impact is minor: most analysis results remain usable.",
        Severity::Moderate => {
            "Impact is moderate: cross-check findings that depend on the end of the log."
        }
        Severity::Severe => "Impact is severe: significant parts of the execution are missing.",
        Severity::Critical => {
            "Impact is critical: the final lines are damaged and the failure point may be hidden."
        }
    })
}

fn lost_note(info: LostInformationType) -> &'static str {
    match info {
        LostInformationType::ExceptionDetails => {
            "Exception details may be incomplete; the root-cause stack trace was likely cut."
        }
        LostInformationType::FinalLimits => {
            "Final governor limit usage is missing; do not conclude that limits stayed within bounds."
        }
        LostInformationType::ExecutionEnd => {
            "The end of execution was not captured; the transaction outcome is unknown."
        }
        LostInformationType::PerformanceData => {
            "Timing data for the last operations is missing; durations near the end are unreliable."
        }
        LostInformationType::NestedEvents => {
            "Some method or query scopes never closed; call nesting near the end is incomplete."
        }
        LostInformationType::DebugOutput => {
            "Debug statements written after the cut point are missing."
        }
        LostInformationType::AsyncCorrelations => {
            "Asynchronous work may have been queued after the cut; do not assume none was."
        }
    }
}
