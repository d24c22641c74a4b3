//! Worker configuration.

use std::time::Duration;

/// Worker-level knobs, distinct from the analysis configuration: these
/// control how the collaborator drives the run, not what the detector
/// does.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Attempts to open and analyze the recording before a transient I/O
    /// failure escalates to a fatal decode error.
    pub decode_retries: u32,
    /// Delay between retry attempts.
    pub retry_delay: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            decode_retries: 2,
            retry_delay: Duration::from_secs(2),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            decode_retries: std::env::var("COMMSKIP_DECODE_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            retry_delay: Duration::from_secs(
                std::env::var("COMMSKIP_RETRY_DELAY_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.decode_retries, 2);
        assert_eq!(config.retry_delay, Duration::from_secs(2));
    }
}
