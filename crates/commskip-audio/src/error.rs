//! Error types for audio analysis.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for audio analysis operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur during audio analysis.
///
/// All of these are fatal for the run: no segment list is produced when
/// analysis fails partway.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFprobe command failed: {message}")]
    ProbeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("Audio decode failed: {message}")]
    DecodeFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("No audio data found in input")]
    NoAudioData,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl AudioError {
    /// Create a decode failure error.
    pub fn decode_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::DecodeFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create a probe failure error.
    pub fn probe_failed(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ProbeFailed {
            message: message.into(),
            stderr,
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
