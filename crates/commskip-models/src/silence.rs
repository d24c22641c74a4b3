//! Silence intervals and candidate commercial breaks.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A contiguous time range where energy stayed below the silence
/// threshold.
///
/// Sequences of intervals are sorted ascending by `start_secs` and
/// non-overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SilenceInterval {
    /// Start time in seconds.
    pub start_secs: f64,
    /// End time in seconds; always greater than `start_secs`.
    pub end_secs: f64,
    /// Time-weighted average energy observed during the interval.
    pub average_energy: f64,
}

impl SilenceInterval {
    /// Duration of the interval in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }

    /// Gap in seconds between the end of this interval and the start of
    /// a later one.
    pub fn gap_to(&self, later: &SilenceInterval) -> f64 {
        later.start_secs - self.end_secs
    }
}

/// A candidate commercial-boundary marker derived from one or more
/// merged silence intervals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Break {
    /// Start time in seconds.
    pub start_secs: f64,
    /// End time in seconds.
    pub end_secs: f64,
    /// Heuristic confidence in [0, 1] that this is a true commercial
    /// boundary. Candidates start at 0 and are scored by the classifier.
    pub confidence: f64,
}

impl Break {
    /// Create an unscored candidate from a merged silence interval.
    pub fn candidate(start_secs: f64, end_secs: f64) -> Self {
        Self {
            start_secs,
            end_secs,
            confidence: 0.0,
        }
    }

    /// Duration of the break in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }

    /// Shrink the break inward by `pad_secs` on both edges, protecting
    /// program content adjacent to the cut points.
    ///
    /// Returns `None` when padding collapses the break entirely.
    pub fn padded(&self, pad_secs: f64) -> Option<Break> {
        let start = self.start_secs + pad_secs;
        let end = self.end_secs - pad_secs;
        if start < end {
            Some(Break {
                start_secs: start,
                end_secs: end,
                confidence: self.confidence,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_duration_and_gap() {
        let a = SilenceInterval {
            start_secs: 10.0,
            end_secs: 12.0,
            average_energy: 0.01,
        };
        let b = SilenceInterval {
            start_secs: 15.0,
            end_secs: 16.0,
            average_energy: 0.02,
        };
        assert!((a.duration_secs() - 2.0).abs() < 1e-9);
        assert!((a.gap_to(&b) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_break_padding() {
        let b = Break::candidate(600.0, 608.0);
        let padded = b.padded(0.5).unwrap();
        assert!((padded.start_secs - 600.5).abs() < 1e-9);
        assert!((padded.end_secs - 607.5).abs() < 1e-9);
    }

    #[test]
    fn test_break_padding_collapses() {
        let b = Break::candidate(10.0, 10.8);
        assert!(b.padded(0.5).is_none());
    }
}
