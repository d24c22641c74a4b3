//! Configuration for silence detection and break classification.
//!
//! These parameters control how silences are detected and how candidate
//! breaks are scored. The defaults are tuned for broadcast recordings with
//! commercial breaks roughly every five to fifteen minutes; the spacing and
//! scoring constants vary per broadcaster and should be tuned via presets
//! rather than edited here.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AudioError, AudioResult};

/// How the silence threshold is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    /// Use `threshold_db` as an absolute dBFS level.
    Fixed,
    /// Derive the threshold from a percentile of the recording's energy
    /// distribution, tolerating varying recording volume levels.
    #[default]
    AdaptivePercentile,
}

/// How multi-channel samples are combined before measuring energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChannelMix {
    /// Average across channels.
    #[default]
    Average,
    /// Sum across channels.
    Sum,
}

/// Amplitude measure computed per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnergyMetric {
    /// Root-mean-square amplitude.
    #[default]
    Rms,
    /// Mean absolute amplitude.
    MeanAbs,
}

/// How breaks near the edges of the recording are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Position has no effect on scoring.
    Ignore,
    /// Down-weight breaks within `edge_margin_secs` of either end; silence
    /// there is usually an intro or credits, not a commercial boundary.
    #[default]
    DownWeight,
}

/// Strictness when loading configuration from a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Unknown keys are ignored.
    #[default]
    Lenient,
    /// Unknown keys are rejected with a configuration error.
    Strict,
}

/// Analysis configuration with documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Duration of one energy analysis window in seconds.
    pub window_secs: f64,

    /// Minimum silence duration before an interval is emitted at all.
    /// Shorter silences are discarded as noise.
    pub min_silence_secs: f64,

    /// Silences separated by a gap smaller than this are merged into one
    /// candidate break.
    pub merge_gap_secs: f64,

    /// Minimum duration of a merged silence for it to count as a
    /// break-worthy candidate. Distinct from (and typically larger than)
    /// `min_silence_secs`: a burst of short silences can merge into a
    /// significant combined break.
    pub min_break_secs: f64,

    /// Threshold derivation mode.
    pub threshold_mode: ThresholdMode,

    /// Absolute silence threshold in dBFS, used in `Fixed` mode.
    pub threshold_db: f64,

    /// Percentile of the energy distribution used in `AdaptivePercentile`
    /// mode, in (0, 1).
    pub adaptive_percentile: f64,

    /// Channel mix policy for multi-channel audio.
    pub channel_mix: ChannelMix,

    /// Per-window amplitude measure.
    pub energy_metric: EnergyMetric,

    /// Duration at which the duration score saturates; commercial-break
    /// silences are characteristically longer than dialogue pauses.
    pub typical_break_secs: f64,

    /// Lower bound of expected spacing between consecutive breaks.
    pub min_spacing_secs: f64,

    /// Upper bound of expected spacing between consecutive breaks.
    pub max_spacing_secs: f64,

    /// Weight of the duration score in the combined confidence.
    pub duration_weight: f64,

    /// Weight of the spacing score in the combined confidence.
    pub spacing_weight: f64,

    /// Edge position policy.
    pub edge_policy: EdgePolicy,

    /// Margin from either end of the recording within which `DownWeight`
    /// applies.
    pub edge_margin_secs: f64,

    /// Multiplier applied to confidence inside the edge margin.
    pub edge_factor: f64,

    /// A break is accepted as a commercial boundary only when its combined
    /// confidence strictly exceeds this value; a tie is rejected.
    pub accept_threshold: f64,

    /// Accepted breaks are shrunk inward by this much on both edges before
    /// frame mapping, protecting program content at the cut points.
    pub pad_secs: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_secs: 0.1,
            min_silence_secs: 0.3,
            merge_gap_secs: 4.0,
            min_break_secs: 1.0,
            threshold_mode: ThresholdMode::AdaptivePercentile,
            threshold_db: -70.0,
            adaptive_percentile: 0.10,
            channel_mix: ChannelMix::Average,
            energy_metric: EnergyMetric::Rms,
            typical_break_secs: 8.0,
            min_spacing_secs: 300.0,
            max_spacing_secs: 900.0,
            duration_weight: 0.6,
            spacing_weight: 0.4,
            edge_policy: EdgePolicy::DownWeight,
            edge_margin_secs: 60.0,
            edge_factor: 0.5,
            accept_threshold: 0.5,
            pad_secs: 0.48,
        }
    }
}

/// Keys accepted in a configuration file, used for strict-mode rejection
/// of unknown keys.
const KNOWN_KEYS: &[&str] = &[
    "window_secs",
    "min_silence_secs",
    "merge_gap_secs",
    "min_break_secs",
    "threshold_mode",
    "threshold_db",
    "adaptive_percentile",
    "channel_mix",
    "energy_metric",
    "typical_break_secs",
    "min_spacing_secs",
    "max_spacing_secs",
    "duration_weight",
    "spacing_weight",
    "edge_policy",
    "edge_margin_secs",
    "edge_factor",
    "accept_threshold",
    "pad_secs",
];

impl AnalysisConfig {
    /// A more aggressive configuration: shorter silences qualify and
    /// borderline breaks are accepted.
    pub fn aggressive() -> Self {
        Self {
            min_silence_secs: 0.16,
            min_break_secs: 0.5,
            accept_threshold: 0.35,
            ..Self::default()
        }
    }

    /// A conservative configuration: only long, well-spaced silences are
    /// flagged. A missed boundary is preferable to truncating program
    /// content.
    pub fn conservative() -> Self {
        Self {
            min_silence_secs: 0.5,
            min_break_secs: 2.0,
            accept_threshold: 0.7,
            ..Self::default()
        }
    }

    /// Builder-style setter for the window duration.
    pub fn with_window_secs(mut self, secs: f64) -> Self {
        self.window_secs = secs;
        self
    }

    /// Builder-style setter for the minimum silence duration.
    pub fn with_min_silence_secs(mut self, secs: f64) -> Self {
        self.min_silence_secs = secs;
        self
    }

    /// Builder-style setter for a fixed dBFS threshold.
    pub fn with_fixed_threshold_db(mut self, db: f64) -> Self {
        self.threshold_mode = ThresholdMode::Fixed;
        self.threshold_db = db;
        self
    }

    /// Builder-style setter for the acceptance threshold.
    pub fn with_accept_threshold(mut self, threshold: f64) -> Self {
        self.accept_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Builder-style setter for break padding.
    pub fn with_pad_secs(mut self, secs: f64) -> Self {
        self.pad_secs = secs;
        self
    }

    /// Validate option values, failing before analysis starts on anything
    /// a run could not honor.
    pub fn validate(&self) -> AudioResult<()> {
        fn positive(name: &str, value: f64) -> AudioResult<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(AudioError::invalid_config(format!(
                    "{} must be positive, got {}",
                    name, value
                )))
            }
        }
        fn non_negative(name: &str, value: f64) -> AudioResult<()> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(AudioError::invalid_config(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )))
            }
        }

        positive("window_secs", self.window_secs)?;
        positive("min_silence_secs", self.min_silence_secs)?;
        non_negative("merge_gap_secs", self.merge_gap_secs)?;
        positive("min_break_secs", self.min_break_secs)?;
        positive("typical_break_secs", self.typical_break_secs)?;
        positive("min_spacing_secs", self.min_spacing_secs)?;
        positive("max_spacing_secs", self.max_spacing_secs)?;
        non_negative("duration_weight", self.duration_weight)?;
        non_negative("spacing_weight", self.spacing_weight)?;
        positive("edge_margin_secs", self.edge_margin_secs)?;
        non_negative("pad_secs", self.pad_secs)?;

        if self.max_spacing_secs < self.min_spacing_secs {
            return Err(AudioError::invalid_config(format!(
                "max_spacing_secs ({}) must be >= min_spacing_secs ({})",
                self.max_spacing_secs, self.min_spacing_secs
            )));
        }
        if self.duration_weight + self.spacing_weight <= 0.0 {
            return Err(AudioError::invalid_config(
                "duration_weight and spacing_weight must not both be zero",
            ));
        }
        if !(0.0..=1.0).contains(&self.accept_threshold) {
            return Err(AudioError::invalid_config(format!(
                "accept_threshold must be in [0, 1], got {}",
                self.accept_threshold
            )));
        }
        if !(self.adaptive_percentile > 0.0 && self.adaptive_percentile < 1.0) {
            return Err(AudioError::invalid_config(format!(
                "adaptive_percentile must be in (0, 1), got {}",
                self.adaptive_percentile
            )));
        }
        if !(0.0..=1.0).contains(&self.edge_factor) {
            return Err(AudioError::invalid_config(format!(
                "edge_factor must be in [0, 1], got {}",
                self.edge_factor
            )));
        }
        if self.threshold_mode == ThresholdMode::Fixed && self.threshold_db >= 0.0 {
            return Err(AudioError::invalid_config(format!(
                "threshold_db must be negative dBFS, got {}",
                self.threshold_db
            )));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string. Missing keys use defaults;
    /// unknown keys are ignored or rejected per `strictness`.
    pub fn from_json_str(json: &str, strictness: Strictness) -> AudioResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;

        if strictness == Strictness::Strict {
            if let Some(map) = value.as_object() {
                for key in map.keys() {
                    if !KNOWN_KEYS.contains(&key.as_str()) {
                        return Err(AudioError::invalid_config(format!(
                            "unknown configuration key: {}",
                            key
                        )));
                    }
                }
            }
        }

        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub async fn from_json_file(
        path: impl AsRef<Path>,
        strictness: Strictness,
    ) -> AudioResult<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => AudioError::FileNotFound(path.to_path_buf()),
                _ => AudioError::Io(e),
            })?;
        Self::from_json_str(&contents, strictness)
    }

    /// Linear amplitude for the fixed dBFS threshold.
    pub fn fixed_threshold_linear(&self) -> f64 {
        10f64.powf(self.threshold_db / 20.0)
    }
}
