//! Analysis pipeline entry point.
//!
//! One streaming pass over the sample stream: blocks are windowed into
//! energy points (buffered, tiny relative to raw samples), the silence
//! threshold is resolved, and detection, merging, classification, and
//! frame mapping run over the buffered sequence. The run is all-or-nothing:
//! any failure aborts without emitting a partial segment list.

use commskip_models::{Break, Segment, SkipList};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::classify::classify_breaks;
use crate::config::AnalysisConfig;
use crate::detector::{resolve_threshold, SilenceDetector};
use crate::energy::EnergyAnalyzer;
use crate::error::{AudioError, AudioResult};
use crate::frame_map::build_segments;
use crate::merge::candidate_breaks;
use crate::probe::StreamInfo;
use crate::source::SampleSource;

/// Result of a successful analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Stream metadata the run was based on.
    pub stream: StreamInfo,
    /// Resolved linear silence threshold.
    pub threshold: f64,
    /// Number of energy windows analyzed.
    pub energy_points: usize,
    /// Number of raw silence intervals detected.
    pub silences: usize,
    /// All candidate breaks with their confidence scores, in time order.
    pub scored_breaks: Vec<Break>,
    /// Number of breaks accepted as commercial boundaries.
    pub accepted_breaks: usize,
    /// Final ordered segment list covering the whole recording.
    pub segments: Vec<Segment>,
}

impl AnalysisReport {
    /// The host skip-list derived from the segment list.
    pub fn skip_list(&self) -> SkipList {
        SkipList::from_segments(&self.segments)
    }
}

/// Analyze a recording and produce its segment list.
///
/// Fails with an explicit error on unreadable input or invalid
/// configuration; a recording with no detected silences is a success and
/// yields a single Program segment spanning the whole recording.
pub async fn analyze<S>(source: &mut S, config: &AnalysisConfig) -> AudioResult<AnalysisReport>
where
    S: SampleSource + ?Sized,
{
    analyze_with_abort(source, config, None).await
}

/// [`analyze`] with a cooperative abort signal.
///
/// The signal is checked once per analyzed window; an aborted run returns
/// [`AudioError::Cancelled`] and emits nothing.
pub async fn analyze_with_abort<S>(
    source: &mut S,
    config: &AnalysisConfig,
    abort: Option<watch::Receiver<bool>>,
) -> AudioResult<AnalysisReport>
where
    S: SampleSource + ?Sized,
{
    config.validate()?;

    let stream = source.info().clone();
    if stream.sample_rate == 0 {
        return Err(AudioError::NoAudioData);
    }

    debug!(
        duration_secs = stream.duration_secs,
        sample_rate = stream.sample_rate,
        channels = stream.channels,
        fps = stream.fps,
        "Starting silence analysis"
    );

    // Phase 1: windowed energy over the whole stream.
    let mut analyzer = EnergyAnalyzer::new(&stream, config)?;
    let mut points = Vec::new();
    let mut fresh = Vec::new();

    while let Some(block) = source.read_block().await? {
        analyzer.push_block(&block, &mut fresh);
        for point in fresh.drain(..) {
            if aborted(&abort) {
                info!("Analysis aborted by host");
                return Err(AudioError::Cancelled);
            }
            points.push(point);
        }
    }
    if let Some(tail) = analyzer.finish() {
        points.push(tail);
    }

    if points.is_empty() {
        return Err(AudioError::NoAudioData);
    }

    // Phase 2: detection with the derived threshold.
    let threshold = resolve_threshold(&points, config)?;
    let mut detector = SilenceDetector::new(threshold, config);
    for point in &points {
        detector.push(point);
    }
    let silences = detector.finish();

    let audio_end_secs = points.last().map(|p| p.end_secs()).unwrap_or(0.0);
    let recording_secs = if stream.duration_secs > 0.0 {
        stream.duration_secs
    } else {
        audio_end_secs
    };
    let total_frames = if stream.total_frames > 0 {
        stream.total_frames
    } else {
        (recording_secs * stream.fps).round() as u64
    };
    if total_frames == 0 {
        return Err(AudioError::NoAudioData);
    }

    let candidates = candidate_breaks(silences.clone(), config);
    let classified = classify_breaks(candidates, recording_secs, config);
    let segments = build_segments(
        &classified.accepted,
        stream.fps,
        total_frames,
        config.pad_secs,
    );

    info!(
        energy_points = points.len(),
        silences = silences.len(),
        candidates = classified.scored.len(),
        accepted = classified.accepted.len(),
        threshold = threshold,
        "Silence analysis complete"
    );

    Ok(AnalysisReport {
        stream,
        threshold,
        energy_points: points.len(),
        silences: silences.len(),
        scored_breaks: classified.scored,
        accepted_breaks: classified.accepted.len(),
        segments,
    })
}

fn aborted(abort: &Option<watch::Receiver<bool>>) -> bool {
    abort.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
}
