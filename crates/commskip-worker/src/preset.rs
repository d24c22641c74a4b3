//! Detection presets.
//!
//! Presets are the host's compact tuning surface: six positional values
//! `thresh, minquiet, mindetect, minbreak, maxsep, pad`, supplied inline
//! on the command line or looked up in a preset file whose lines are
//!
//! ```text
//! # title-or-callsign-regex, thresh, minquiet, mindetect, minbreak, maxsep, pad
//! News at .*,      -80, 0.2, 4, 180, 90, 0.5
//! SPORTSCHANNEL,   -70,    , 8,    ,   ,
//! ```
//!
//! The regex is matched case-insensitively against the recording title or
//! the channel callsign; the first matching line wins. Empty or invalid
//! fields fall back to the configured defaults with a logged warning, they
//! never abort the run.
//!
//! Field mapping onto the analysis configuration:
//! - `thresh`    → fixed silence threshold in dBFS
//! - `minquiet`  → minimum silence duration (seconds)
//! - `mindetect` → minimum break-worthy combined silence (seconds)
//! - `minbreak`  → minimum expected spacing between breaks (seconds)
//! - `maxsep`    → merge gap between nearby silences (seconds)
//! - `pad`       → padding applied inside accepted breaks (seconds)

use std::path::Path;

use commskip_audio::AnalysisConfig;
use regex::RegexBuilder;
use tracing::{debug, info, warn};

use crate::error::{WorkerError, WorkerResult};

/// Preset argument names, in positional order.
const ARG_NAMES: [&str; 6] = [
    "thresh", "minquiet", "mindetect", "minbreak", "maxsep", "pad",
];

/// Parsed preset values; `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preset {
    pub threshold_db: Option<f64>,
    pub min_silence_secs: Option<f64>,
    pub min_break_secs: Option<f64>,
    pub min_spacing_secs: Option<f64>,
    pub merge_gap_secs: Option<f64>,
    pub pad_secs: Option<f64>,
}

impl Preset {
    /// Parse preset values from a comma-separated string. Missing and
    /// invalid fields stay unset.
    pub fn parse_line(line: &str) -> Self {
        debug!(line = line, "Parsing preset values");
        let mut values = [None; 6];
        for (i, raw) in line.split(',').take(ARG_NAMES.len()).enumerate() {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            match raw.parse::<f64>() {
                Ok(v) => values[i] = Some(v),
                Err(_) => warn!(
                    name = ARG_NAMES[i],
                    value = raw,
                    "Preset value is invalid, using default"
                ),
            }
        }
        Self {
            threshold_db: values[0],
            min_silence_secs: values[1],
            min_break_secs: values[2],
            min_spacing_secs: values[3],
            merge_gap_secs: values[4],
            pad_secs: values[5],
        }
    }

    /// Look up a preset in a file by matching each line's leading regex
    /// against the recording title or the channel callsign.
    pub async fn from_file(
        path: impl AsRef<Path>,
        title: &str,
        callsign: &str,
    ) -> WorkerResult<Option<Self>> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            WorkerError::preset_error(format!("preset file {} not readable: {}", path.display(), e))
        })?;

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (pattern, rest) = match line.split_once(',') {
                Some(split) => split,
                None => (line, ""),
            };
            let regex = RegexBuilder::new(&format!("^(?:{})", pattern.trim()))
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    WorkerError::preset_error(format!("bad preset pattern {:?}: {}", pattern, e))
                })?;
            if regex.is_match(title) || regex.is_match(callsign) {
                info!(preset = line, "Using preset");
                return Ok(Some(Self::parse_line(rest)));
            }
        }

        info!(title = title, callsign = callsign, "No preset found");
        Ok(None)
    }

    /// Apply the preset over an analysis configuration. A supplied
    /// threshold switches the detector to fixed-threshold mode.
    pub fn apply_to(&self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(db) = self.threshold_db {
            config = config.with_fixed_threshold_db(db);
        }
        if let Some(v) = self.min_silence_secs {
            config.min_silence_secs = v;
        }
        if let Some(v) = self.min_break_secs {
            config.min_break_secs = v;
        }
        if let Some(v) = self.min_spacing_secs {
            config.min_spacing_secs = v;
        }
        if let Some(v) = self.merge_gap_secs {
            config.merge_gap_secs = v;
        }
        if let Some(v) = self.pad_secs {
            config.pad_secs = v;
        }
        config
    }
}
