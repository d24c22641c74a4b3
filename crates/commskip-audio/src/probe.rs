//! FFprobe stream information.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{AudioError, AudioResult};

/// Metadata for a recording: the audio stream being analyzed and the
/// paired video stream the frame mapping targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Total duration in seconds
    pub duration_secs: f64,
    /// Audio sample rate in Hz
    pub sample_rate: u32,
    /// Audio channel count
    pub channels: u16,
    /// Video frame rate (fps)
    pub fps: f64,
    /// Total video frame count
    pub total_frames: u64,
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    sample_rate: Option<String>,
    channels: Option<u16>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
    duration: Option<String>,
}

/// Probe a recording for stream information.
pub async fn probe_streams(path: impl AsRef<Path>) -> AudioResult<StreamInfo> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AudioError::FileNotFound(path.to_path_buf()));
    }

    // Check FFprobe exists
    which::which("ffprobe").map_err(|_| AudioError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(AudioError::probe_failed(
            "FFprobe failed",
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
        ));
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;
    stream_info_from_probe(probe)
}

fn stream_info_from_probe(probe: FfprobeOutput) -> AudioResult<StreamInfo> {
    let audio_stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "audio")
        .ok_or(AudioError::NoAudioData)?;

    let video_stream = probe.streams.iter().find(|s| s.codec_type == "video");

    let duration = probe
        .format
        .duration
        .as_ref()
        .or(audio_stream.duration.as_ref())
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    let sample_rate = audio_stream
        .sample_rate
        .as_ref()
        .and_then(|r| r.parse::<u32>().ok())
        .ok_or_else(|| AudioError::probe_failed("Audio stream has no sample rate", None))?;

    let channels = audio_stream.channels.unwrap_or(1);

    let fps = video_stream
        .and_then(|v| v.avg_frame_rate.as_ref().or(v.r_frame_rate.as_ref()))
        .and_then(|r| parse_frame_rate(r))
        .unwrap_or(30.0);

    // Prefer the container's frame count; fall back to duration * fps for
    // streams that do not record it.
    let total_frames = video_stream
        .and_then(|v| v.nb_frames.as_ref())
        .and_then(|n| n.parse::<u64>().ok())
        .unwrap_or_else(|| (duration * fps).round() as u64);

    Ok(StreamInfo {
        duration_secs: duration,
        sample_rate,
        channels,
        fps,
        total_frames,
    })
}

/// Parse frame rate string (e.g., "30/1" or "29.97").
fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert!((parse_frame_rate("30/1").unwrap() - 30.0).abs() < 0.01);
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert!((parse_frame_rate("29.97").unwrap() - 29.97).abs() < 0.01);
        assert!(parse_frame_rate("30/0").is_none());
    }

    #[test]
    fn test_stream_info_from_probe_json() {
        let json = r#"{
            "format": { "duration": "3600.0" },
            "streams": [
                { "codec_type": "video", "avg_frame_rate": "30/1", "nb_frames": "108000" },
                { "codec_type": "audio", "sample_rate": "48000", "channels": 2 }
            ]
        }"#;
        let probe: FfprobeOutput = serde_json::from_str(json).unwrap();
        let info = stream_info_from_probe(probe).unwrap();
        assert_eq!(info.sample_rate, 48000);
        assert_eq!(info.channels, 2);
        assert_eq!(info.total_frames, 108000);
        assert!((info.fps - 30.0).abs() < 0.01);
    }

    #[test]
    fn test_frame_count_falls_back_to_duration() {
        let json = r#"{
            "format": { "duration": "10.0" },
            "streams": [
                { "codec_type": "video", "r_frame_rate": "25/1" },
                { "codec_type": "audio", "sample_rate": "44100", "channels": 6 }
            ]
        }"#;
        let probe: FfprobeOutput = serde_json::from_str(json).unwrap();
        let info = stream_info_from_probe(probe).unwrap();
        assert_eq!(info.total_frames, 250);
    }

    #[test]
    fn test_missing_audio_stream_rejected() {
        let json = r#"{
            "format": { "duration": "10.0" },
            "streams": [ { "codec_type": "video", "r_frame_rate": "25/1" } ]
        }"#;
        let probe: FfprobeOutput = serde_json::from_str(json).unwrap();
        assert!(matches!(
            stream_info_from_probe(probe),
            Err(AudioError::NoAudioData)
        ));
    }
}
