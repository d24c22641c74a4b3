//! Break classification heuristics.
//!
//! Each candidate break gets a confidence in [0, 1] combining:
//!
//! - **Duration**: longer silences score higher, saturating at the typical
//!   commercial-gap duration.
//! - **Spacing**: breaks spaced consistently with commercial cadence score
//!   higher. Spacing is measured against the previous *accepted* break
//!   (the recording start for the first), not raw neighbors, so one false
//!   positive cannot cascade.
//! - **Position**: breaks very near the recording edges can be
//!   down-weighted per policy; silence there is usually intro or credits.
//!
//! Borderline candidates stay unaccepted: the output feeds an editable
//! skip list, and a missed boundary is cheaper than truncated program
//! content.

use commskip_models::Break;
use tracing::debug;

use crate::config::{AnalysisConfig, EdgePolicy};

/// Scored candidates plus the accepted subset.
#[derive(Debug, Clone)]
pub struct ClassifiedBreaks {
    /// All candidates, in time order, with confidence filled in.
    pub scored: Vec<Break>,
    /// Candidates whose confidence exceeded the acceptance threshold.
    pub accepted: Vec<Break>,
}

/// Score candidates and pick the accepted commercial boundaries.
///
/// Candidates must be sorted ascending by start time.
pub fn classify_breaks(
    candidates: Vec<Break>,
    recording_secs: f64,
    config: &AnalysisConfig,
) -> ClassifiedBreaks {
    let mut scored = Vec::with_capacity(candidates.len());
    let mut accepted: Vec<Break> = Vec::new();
    // Anchor for spacing: start of recording until a break is accepted.
    let mut anchor_secs = 0.0f64;

    for mut candidate in candidates {
        let duration = duration_score(candidate.duration_secs(), config);
        let spacing = spacing_score(candidate.start_secs - anchor_secs, config);
        let position = position_factor(&candidate, recording_secs, config);

        let weight_sum = config.duration_weight + config.spacing_weight;
        let combined = (config.duration_weight * duration + config.spacing_weight * spacing)
            / weight_sum;
        candidate.confidence = (combined * position).clamp(0.0, 1.0);

        debug!(
            start = candidate.start_secs,
            duration_score = duration,
            spacing_score = spacing,
            position_factor = position,
            confidence = candidate.confidence,
            "Scored candidate break"
        );

        // Strict comparison: a tie goes to the conservative side and the
        // break stays unaccepted.
        if candidate.confidence > config.accept_threshold {
            anchor_secs = candidate.start_secs;
            accepted.push(candidate);
        }
        scored.push(candidate);
    }

    ClassifiedBreaks { scored, accepted }
}

/// Saturating duration score: a silence as long as the typical commercial
/// gap (or longer) scores 1.
fn duration_score(duration_secs: f64, config: &AnalysisConfig) -> f64 {
    (duration_secs / config.typical_break_secs).min(1.0)
}

/// Cadence score against the previous accepted break.
///
/// Inside the expected spacing range the score is 1. Below the minimum it
/// falls off linearly (breaks too close together); above the maximum it
/// decays hyperbolically (isolated outliers).
fn spacing_score(gap_secs: f64, config: &AnalysisConfig) -> f64 {
    if gap_secs < config.min_spacing_secs {
        (gap_secs / config.min_spacing_secs).max(0.0)
    } else if gap_secs <= config.max_spacing_secs {
        1.0
    } else {
        config.max_spacing_secs / gap_secs
    }
}

fn position_factor(candidate: &Break, recording_secs: f64, config: &AnalysisConfig) -> f64 {
    match config.edge_policy {
        EdgePolicy::Ignore => 1.0,
        EdgePolicy::DownWeight => {
            let near_start = candidate.start_secs < config.edge_margin_secs;
            let near_end = candidate.end_secs > recording_secs - config.edge_margin_secs;
            if near_start || near_end {
                config.edge_factor
            } else {
                1.0
            }
        }
    }
}
