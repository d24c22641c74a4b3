//! End-to-end pipeline scenarios over synthetic recordings.

use commskip_audio::{
    analyze, analyze_with_abort, AnalysisConfig, AudioError, MemorySampleSource, StreamInfo,
};
use commskip_models::segment::covers_recording;
use commskip_models::SegmentKind;
use tokio::sync::watch;

/// Low sample rate keeps synthetic recordings small without changing the
/// pipeline's behavior.
const RATE: u32 = 100;

fn stream_info(duration_secs: f64, fps: f64) -> StreamInfo {
    StreamInfo {
        duration_secs,
        sample_rate: RATE,
        channels: 1,
        fps,
        total_frames: (duration_secs * fps).round() as u64,
    }
}

/// A constant tone with zeroed-out silences at the given time ranges.
fn tone_with_silences(duration_secs: f64, silences: &[(f64, f64)]) -> Vec<f32> {
    let mut samples = vec![0.5f32; (duration_secs * RATE as f64).round() as usize];
    for &(start, end) in silences {
        let lo = (start * RATE as f64).round() as usize;
        let hi = ((end * RATE as f64).round() as usize).min(samples.len());
        for s in &mut samples[lo..hi] {
            *s = 0.0;
        }
    }
    samples
}

fn config() -> AnalysisConfig {
    AnalysisConfig::default()
        .with_window_secs(0.1)
        .with_fixed_threshold_db(-40.0)
        .with_pad_secs(0.0)
}

#[tokio::test]
async fn scenario_a_no_silence_yields_single_program_segment() {
    let mut source = MemorySampleSource::new(
        stream_info(3600.0, 30.0),
        tone_with_silences(3600.0, &[]),
    );
    let report = analyze(&mut source, &config()).await.unwrap();

    assert_eq!(report.segments.len(), 1);
    assert_eq!(report.segments[0].kind, SegmentKind::Program);
    assert_eq!(report.segments[0].start_frame, 0);
    assert_eq!(report.segments[0].end_frame, 107999);
    assert_eq!(report.accepted_breaks, 0);
    assert!(report.skip_list().is_empty());
}

#[tokio::test]
async fn scenario_b_single_break_maps_to_exact_frames() {
    let mut source = MemorySampleSource::new(
        stream_info(3600.0, 30.0),
        tone_with_silences(3600.0, &[(600.0, 608.0)]),
    );
    let cfg = AnalysisConfig {
        merge_gap_secs: 2.0,
        min_break_secs: 1.0,
        ..config()
    };
    let report = analyze(&mut source, &cfg).await.unwrap();

    assert_eq!(report.scored_breaks.len(), 1);
    let brk = &report.scored_breaks[0];
    assert!((brk.start_secs - 600.0).abs() < 0.05);
    assert!((brk.end_secs - 608.0).abs() < 0.05);

    assert_eq!(report.accepted_breaks, 1);
    assert_eq!(report.segments.len(), 3);
    assert_eq!(report.segments[0].kind, SegmentKind::Program);
    assert_eq!(report.segments[0].end_frame, 17999);
    assert_eq!(report.segments[1].kind, SegmentKind::Commercial);
    assert_eq!(report.segments[1].start_frame, 18000);
    assert_eq!(report.segments[1].end_frame, 18239);
    assert_eq!(report.segments[2].kind, SegmentKind::Program);
    assert_eq!(report.segments[2].start_frame, 18240);
    assert_eq!(report.segments[2].end_frame, 107999);
    assert!(covers_recording(&report.segments, 108000));
}

#[tokio::test]
async fn scenario_c_nearby_silences_merge_into_one_break() {
    // Two 2 s silences 4 s apart with a 5 s merge tolerance
    let mut source = MemorySampleSource::new(
        stream_info(1800.0, 30.0),
        tone_with_silences(1800.0, &[(600.0, 602.0), (606.0, 608.0)]),
    );
    let cfg = AnalysisConfig {
        merge_gap_secs: 5.0,
        ..config()
    };
    let report = analyze(&mut source, &cfg).await.unwrap();

    assert_eq!(report.silences, 2);
    assert_eq!(report.scored_breaks.len(), 1);
    let brk = &report.scored_breaks[0];
    assert!((brk.start_secs - 600.0).abs() < 0.05);
    assert!((brk.end_secs - 608.0).abs() < 0.05);
}

#[tokio::test]
async fn scenario_d_sub_minimum_silence_ignored() {
    let mut source = MemorySampleSource::new(
        stream_info(1800.0, 30.0),
        tone_with_silences(1800.0, &[(600.0, 600.2)]),
    );
    let report = analyze(&mut source, &config()).await.unwrap();

    assert_eq!(report.silences, 0);
    assert!(report.scored_breaks.is_empty());
    assert_eq!(report.segments.len(), 1);
    assert_eq!(report.segments[0].kind, SegmentKind::Program);
}

#[tokio::test]
async fn confidence_always_in_unit_range() {
    let silences = [
        (10.0, 11.0),
        (300.0, 320.0),
        (305.0, 306.0),
        (900.0, 901.5),
        (1750.0, 1790.0),
    ];
    let mut source = MemorySampleSource::new(
        stream_info(1800.0, 30.0),
        tone_with_silences(1800.0, &silences),
    );
    let report = analyze(&mut source, &config()).await.unwrap();
    for brk in &report.scored_breaks {
        assert!((0.0..=1.0).contains(&brk.confidence));
    }
    assert!(covers_recording(&report.segments, 54000));
}

#[tokio::test]
async fn raising_accept_threshold_never_accepts_more() {
    let samples = tone_with_silences(
        3600.0,
        &[(500.0, 503.0), (1100.0, 1108.0), (1700.0, 1705.0), (2300.0, 2310.0)],
    );
    let mut previous = usize::MAX;
    for threshold in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let mut source =
            MemorySampleSource::new(stream_info(3600.0, 30.0), samples.clone());
        let cfg = config().with_accept_threshold(threshold);
        let report = analyze(&mut source, &cfg).await.unwrap();
        assert!(report.accepted_breaks <= previous);
        previous = report.accepted_breaks;
    }
}

#[tokio::test]
async fn adaptive_threshold_tracks_recording_level() {
    // A quiet recording: dialogue at 0.05, silence near zero. A fixed
    // -40 dB threshold (0.01) still works, but so does the adaptive one.
    let mut samples = vec![0.05f32; (1800.0 * RATE as f64) as usize];
    let lo = (600.0 * RATE as f64) as usize;
    let hi = (608.0 * RATE as f64) as usize;
    for s in &mut samples[lo..hi] {
        *s = 0.0005;
    }
    let mut source = MemorySampleSource::new(stream_info(1800.0, 30.0), samples);
    let cfg = AnalysisConfig {
        pad_secs: 0.0,
        ..AnalysisConfig::default()
    };
    // Default mode is adaptive percentile
    let report = analyze(&mut source, &cfg).await.unwrap();
    assert!(report.threshold > 0.0005);
    assert!(report.threshold <= 0.051);
    assert_eq!(report.silences, 1);
}

#[tokio::test]
async fn aborted_run_emits_nothing() {
    let (tx, rx) = watch::channel(true);
    let mut source = MemorySampleSource::new(
        stream_info(1800.0, 30.0),
        tone_with_silences(1800.0, &[(600.0, 608.0)]),
    );
    let result = analyze_with_abort(&mut source, &config(), Some(rx)).await;
    assert!(matches!(result, Err(AudioError::Cancelled)));
    drop(tx);
}

#[tokio::test]
async fn empty_stream_is_an_error_not_an_empty_result() {
    let mut source = MemorySampleSource::new(stream_info(0.0, 30.0), Vec::new());
    let result = analyze(&mut source, &config()).await;
    assert!(matches!(result, Err(AudioError::NoAudioData)));
}

#[tokio::test]
async fn invalid_config_fails_before_analysis() {
    let mut source = MemorySampleSource::new(
        stream_info(1800.0, 30.0),
        tone_with_silences(1800.0, &[]),
    );
    let cfg = AnalysisConfig {
        min_silence_secs: -1.0,
        ..config()
    };
    let result = analyze(&mut source, &cfg).await;
    assert!(matches!(result, Err(AudioError::InvalidConfig(_))));
}
