//! Silence interval merging and break-worthiness filtering.
//!
//! Near-adjacent silences are collapsed into one interval, then anything
//! still shorter than the break-worthy minimum is dropped. A burst of
//! short silences clustered together can merge into a significant combined
//! break even though no single silence qualified on its own.

use commskip_models::{Break, SilenceInterval};
use tracing::debug;

use crate::config::AnalysisConfig;

/// Merge intervals separated by a gap smaller than `merge_gap_secs`.
///
/// The merged interval is the union of its parts; its average energy is
/// the time-weighted mean over the silent time only (the bridged gap
/// carries no weight). Idempotent: every gap in the output is at least
/// the merge tolerance, so re-merging is a fixpoint.
pub fn merge_silences(
    intervals: Vec<SilenceInterval>,
    merge_gap_secs: f64,
) -> Vec<SilenceInterval> {
    let mut merged: Vec<SilenceInterval> = Vec::with_capacity(intervals.len());

    for interval in intervals {
        match merged.last_mut() {
            Some(last) if last.gap_to(&interval) < merge_gap_secs => {
                let last_dur = last.duration_secs();
                let next_dur = interval.duration_secs();
                last.average_energy = (last.average_energy * last_dur
                    + interval.average_energy * next_dur)
                    / (last_dur + next_dur);
                last.end_secs = interval.end_secs;
            }
            _ => merged.push(interval),
        }
    }

    merged
}

/// Keep merged silences long enough to be break-worthy, as unscored
/// candidates.
pub fn filter_breaks(merged: &[SilenceInterval], min_break_secs: f64) -> Vec<Break> {
    merged
        .iter()
        .filter(|interval| interval.duration_secs() >= min_break_secs)
        .map(|interval| Break::candidate(interval.start_secs, interval.end_secs))
        .collect()
}

/// Merge and filter in one step.
pub fn candidate_breaks(
    intervals: Vec<SilenceInterval>,
    config: &AnalysisConfig,
) -> Vec<Break> {
    let raw_count = intervals.len();
    let merged = merge_silences(intervals, config.merge_gap_secs);
    let candidates = filter_breaks(&merged, config.min_break_secs);
    debug!(
        raw_silences = raw_count,
        merged = merged.len(),
        candidates = candidates.len(),
        "Merged silence intervals into break candidates"
    );
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(start: f64, end: f64, energy: f64) -> SilenceInterval {
        SilenceInterval {
            start_secs: start,
            end_secs: end,
            average_energy: energy,
        }
    }

    #[test]
    fn test_merges_within_gap() {
        // Two 2 s silences 4 s apart with a 5 s tolerance become one
        let merged = merge_silences(
            vec![interval(10.0, 12.0, 0.01), interval(16.0, 18.0, 0.03)],
            5.0,
        );
        assert_eq!(merged.len(), 1);
        assert!((merged[0].start_secs - 10.0).abs() < 1e-9);
        assert!((merged[0].end_secs - 18.0).abs() < 1e-9);
        // Time-weighted over equal silent durations
        assert!((merged[0].average_energy - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_keeps_separated_intervals() {
        let merged = merge_silences(
            vec![interval(10.0, 12.0, 0.01), interval(20.0, 22.0, 0.01)],
            5.0,
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_idempotent() {
        let intervals = vec![
            interval(0.0, 1.0, 0.01),
            interval(2.0, 3.0, 0.02),
            interval(10.0, 11.0, 0.01),
            interval(11.5, 13.0, 0.03),
            interval(30.0, 31.0, 0.02),
        ];
        let once = merge_silences(intervals, 3.0);
        let twice = merge_silences(once.clone(), 3.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_drops_short_merged_intervals() {
        let merged = vec![interval(10.0, 10.5, 0.01), interval(20.0, 28.0, 0.01)];
        let candidates = filter_breaks(&merged, 1.0);
        assert_eq!(candidates.len(), 1);
        assert!((candidates[0].start_secs - 20.0).abs() < 1e-9);
        assert!((candidates[0].confidence).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cluster_of_short_silences_becomes_break() {
        // Three 0.4 s silences close together merge past a 1 s minimum
        let intervals = vec![
            interval(100.0, 100.4, 0.01),
            interval(100.9, 101.3, 0.01),
            interval(101.8, 102.2, 0.01),
        ];
        let config = AnalysisConfig {
            merge_gap_secs: 1.0,
            min_break_secs: 1.0,
            ..AnalysisConfig::default()
        };
        let candidates = candidate_breaks(intervals, &config);
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].duration_secs() >= 1.0);
    }
}
