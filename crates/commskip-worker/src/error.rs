//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Preset error: {0}")]
    PresetError(String),

    #[error("Audio analysis failed: {0}")]
    Audio(#[from] commskip_audio::AudioError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn preset_error(msg: impl Into<String>) -> Self {
        Self::PresetError(msg.into())
    }

    /// Transient failures worth another attempt at the source boundary.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WorkerError::Io(_) | WorkerError::Audio(commskip_audio::AudioError::Io(_))
        )
    }
}
