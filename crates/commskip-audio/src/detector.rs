//! Silence detection state machine.
//!
//! Thresholds the energy sequence into an ordered, non-overlapping
//! sequence of silence intervals.
//!
//! # State Machine
//!
//! ```text
//!                  energy < threshold
//!   ┌──────────┐ ───────────────────► ┌────────┐
//!   │ NonSilent│                      │ Silent │
//!   └──────────┘ ◄─────────────────── └────────┘
//!                  energy >= threshold
//! ```
//!
//! An interval is emitted on the Silent → NonSilent transition (or at
//! stream end) only when the accumulated silent time reaches the minimum
//! silence duration; shorter silences are discarded as noise, never
//! emitted as degenerate intervals.

use commskip_models::{EnergyPoint, SilenceInterval};
use tracing::trace;

use crate::config::{AnalysisConfig, ThresholdMode};
use crate::error::{AudioError, AudioResult};

/// Resolve the silence threshold for a recording.
///
/// Adaptive mode takes a percentile of the observed energy distribution,
/// which requires the full energy sequence; the analyzer buffers energy
/// points (tiny relative to raw samples) to allow this in one streaming
/// pass.
pub fn resolve_threshold(points: &[EnergyPoint], config: &AnalysisConfig) -> AudioResult<f64> {
    match config.threshold_mode {
        ThresholdMode::Fixed => Ok(config.fixed_threshold_linear()),
        ThresholdMode::AdaptivePercentile => {
            if points.is_empty() {
                return Err(AudioError::NoAudioData);
            }
            let mut energies: Vec<f64> = points.iter().map(|p| p.energy).collect();
            energies.sort_by(|a, b| a.total_cmp(b));
            let rank =
                ((energies.len() - 1) as f64 * config.adaptive_percentile).round() as usize;
            Ok(energies[rank])
        }
    }
}

/// Internal detector state.
#[derive(Clone, Copy)]
enum State {
    NonSilent,
    Silent {
        start_secs: f64,
        end_secs: f64,
        /// Sum of energy * duration, for the time-weighted average.
        weighted_energy: f64,
    },
}

/// Converts an energy sequence into silence intervals.
pub struct SilenceDetector {
    threshold: f64,
    min_silence_secs: f64,
    state: State,
    intervals: Vec<SilenceInterval>,
}

impl SilenceDetector {
    pub fn new(threshold: f64, config: &AnalysisConfig) -> Self {
        Self {
            threshold,
            min_silence_secs: config.min_silence_secs,
            state: State::NonSilent,
            intervals: Vec::new(),
        }
    }

    /// Process one energy point. Points must arrive in time order.
    pub fn push(&mut self, point: &EnergyPoint) {
        let silent = point.energy < self.threshold;

        match self.state {
            State::NonSilent if silent => {
                trace!(start = point.start_secs, "Entering silence");
                self.state = State::Silent {
                    start_secs: point.start_secs,
                    end_secs: point.end_secs(),
                    weighted_energy: point.energy * point.duration_secs,
                };
            }
            State::Silent {
                ref mut end_secs,
                ref mut weighted_energy,
                ..
            } if silent => {
                *end_secs = point.end_secs();
                *weighted_energy += point.energy * point.duration_secs;
            }
            State::Silent { .. } => self.close_interval(),
            State::NonSilent => {}
        }
    }

    /// Flush any open interval and return the detected sequence.
    pub fn finish(mut self) -> Vec<SilenceInterval> {
        self.close_interval();
        self.intervals
    }

    fn close_interval(&mut self) {
        if let State::Silent {
            start_secs,
            end_secs,
            weighted_energy,
        } = self.state
        {
            let duration = end_secs - start_secs;
            if duration >= self.min_silence_secs {
                self.intervals.push(SilenceInterval {
                    start_secs,
                    end_secs,
                    average_energy: weighted_energy / duration,
                });
            } else {
                trace!(
                    start = start_secs,
                    duration = duration,
                    "Discarding sub-minimum silence"
                );
            }
        }
        self.state = State::NonSilent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(index: u64, start: f64, duration: f64, energy: f64) -> EnergyPoint {
        EnergyPoint {
            window_index: index,
            start_secs: start,
            duration_secs: duration,
            energy,
        }
    }

    /// Uniform 0.1 s windows with the given energies.
    fn run(energies: &[f64], threshold: f64, min_silence: f64) -> Vec<SilenceInterval> {
        let config = AnalysisConfig {
            min_silence_secs: min_silence,
            ..AnalysisConfig::default()
        };
        let mut detector = SilenceDetector::new(threshold, &config);
        for (i, &e) in energies.iter().enumerate() {
            detector.push(&point(i as u64, i as f64 * 0.1, 0.1, e));
        }
        detector.finish()
    }

    #[test]
    fn test_no_silence() {
        let intervals = run(&[0.5; 20], 0.1, 0.3);
        assert!(intervals.is_empty());
    }

    #[test]
    fn test_silence_below_minimum_discarded() {
        // 0.2 s of silence with a 0.3 s minimum: nothing emitted
        let mut energies = vec![0.5; 10];
        energies.extend([0.01, 0.01]);
        energies.extend(vec![0.5; 10]);
        let intervals = run(&energies, 0.1, 0.3);
        assert!(intervals.is_empty());
    }

    #[test]
    fn test_silence_meeting_minimum_emitted() {
        let mut energies = vec![0.5; 5];
        energies.extend(vec![0.01; 4]); // 0.4 s
        energies.extend(vec![0.5; 5]);
        let intervals = run(&energies, 0.1, 0.3);
        assert_eq!(intervals.len(), 1);
        assert!((intervals[0].start_secs - 0.5).abs() < 1e-9);
        assert!((intervals[0].end_secs - 0.9).abs() < 1e-9);
        assert!((intervals[0].average_energy - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_stream_end_flushes_open_interval() {
        let mut energies = vec![0.5; 5];
        energies.extend(vec![0.01; 5]);
        let intervals = run(&energies, 0.1, 0.3);
        assert_eq!(intervals.len(), 1);
        assert!((intervals[0].end_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_intervals_sorted_and_non_overlapping() {
        let mut energies = Vec::new();
        for _ in 0..3 {
            energies.extend(vec![0.5; 10]);
            energies.extend(vec![0.01; 5]);
        }
        let intervals = run(&energies, 0.1, 0.3);
        assert_eq!(intervals.len(), 3);
        for pair in intervals.windows(2) {
            assert!(pair[0].end_secs <= pair[1].start_secs);
        }
    }

    #[test]
    fn test_average_energy_time_weighted() {
        let config = AnalysisConfig::default();
        let mut detector = SilenceDetector::new(0.1, &config);
        // 0.3 s at 0.01 followed by a 0.1 s partial-style window at 0.04
        detector.push(&point(0, 0.0, 0.3, 0.01));
        detector.push(&point(1, 0.3, 0.1, 0.04));
        let intervals = detector.finish();
        assert_eq!(intervals.len(), 1);
        let expected = (0.01 * 0.3 + 0.04 * 0.1) / 0.4;
        assert!((intervals[0].average_energy - expected).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_threshold_resolution() {
        let config = AnalysisConfig::default().with_fixed_threshold_db(-20.0);
        let threshold = resolve_threshold(&[], &config).unwrap();
        assert!((threshold - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_adaptive_threshold_percentile() {
        let config = AnalysisConfig::default(); // 10th percentile
        let points: Vec<EnergyPoint> = (0..100)
            .map(|i| point(i, i as f64 * 0.1, 0.1, (i + 1) as f64 / 100.0))
            .collect();
        let threshold = resolve_threshold(&points, &config).unwrap();
        // 10th percentile of 0.01..=1.00
        assert!((threshold - 0.11).abs() < 0.02);
    }

    #[test]
    fn test_adaptive_threshold_empty_is_error() {
        let config = AnalysisConfig::default();
        assert!(matches!(
            resolve_threshold(&[], &config),
            Err(AudioError::NoAudioData)
        ));
    }
}
