//! Impact assessment: which downstream analyses still hold for a log.

use crate::types::{ImpactAssessment, LostInformationType, TruncationDetection};

struct Area {
    lost: LostInformationType,
    name: &'static str,
    limitation: &'static str,
}

const AREAS: [Area; 4] = [
    Area {
        lost: LostInformationType::ExceptionDetails,
        name: "Issue detection",
        limitation: "Exceptions near the end of the log may be missing or lack a full stack trace.",
    },
    Area {
        lost: LostInformationType::PerformanceData,
        name: "Performance metrics",
        limitation: "Durations for operations still running at the cut point are unknown.",
    },
    Area {
        lost: LostInformationType::FinalLimits,
        name: "Governor limit analysis",
        limitation: "The final cumulative limit summary was not captured.",
    },
    Area {
        lost: LostInformationType::AsyncCorrelations,
        name: "Async correlation",
        limitation: "Queued jobs, future calls or platform events after the cut are not visible.",
    },
];

/// Map a detection to reliability flags.
///
/// Each flag is false exactly when its lost-information type is present.
pub fn assess_impact(detection: &TruncationDetection) -> ImpactAssessment {
    if !detection.is_truncated {
        return ImpactAssessment {
            issue_detection_reliable: true,
            performance_metrics_reliable: true,
            limit_analysis_reliable: true,
            async_correlation_reliable: true,
            limitations: Vec::new(),
            still_analyzable: AREAS.iter().map(|a| a.name.to_string()).collect(),
        };
    }

    let reliable = |info| !detection.has_lost(info);
    let mut limitations = Vec::new();
    let mut still_analyzable = Vec::new();
    for area in &AREAS {
        if reliable(area.lost) {
            still_analyzable.push(area.name.to_string());
        } else {
            limitations.push(area.limitation.to_string());
        }
    }
    still_analyzable.push("Events recorded before the truncation point".to_string());

    ImpactAssessment {
        issue_detection_reliable: reliable(LostInformationType::ExceptionDetails),
        performance_metrics_reliable: reliable(LostInformationType::PerformanceData),
        limit_analysis_reliable: reliable(LostInformationType::FinalLimits),
        async_correlation_reliable: reliable(LostInformationType::AsyncCorrelations),
        limitations,
        still_analyzable,
    }
}
