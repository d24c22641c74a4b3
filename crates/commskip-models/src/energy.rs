//! Per-window audio energy measurements.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Energy measured over one analysis window.
///
/// Windows are fixed-duration except for the trailing window of a
/// recording, which keeps its true (shorter) duration rather than being
/// zero-padded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnergyPoint {
    /// Zero-based index of the window in the analyzed stream.
    pub window_index: u64,
    /// Start of the window, in seconds from the beginning of the recording.
    pub start_secs: f64,
    /// Actual duration of the window in seconds.
    pub duration_secs: f64,
    /// Normalized amplitude measure (RMS or mean-absolute), >= 0.
    pub energy: f64,
}

impl EnergyPoint {
    /// End of the window, in seconds.
    pub fn end_secs(&self) -> f64 {
        self.start_secs + self.duration_secs
    }
}
