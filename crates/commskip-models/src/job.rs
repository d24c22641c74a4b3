//! Job identity and outcome reporting.
//!
//! The host job system hands the flagger a job id (or a channel id and
//! start time for manual runs). The flagger reports back a single outcome
//! record when the run finishes.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a flagging job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string (the host's job id).
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Build the program identifier used in player update messages:
    /// `chanid_starttime` with the time in ISO format.
    pub fn prog_id(chanid: &str, starttime: &str) -> String {
        format!("{}_{}", chanid, starttime.replace(' ', "T"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal state of a flagging run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Run is in progress.
    #[default]
    Running,
    /// Run completed; zero detected breaks is still a success.
    Finished,
    /// Run failed before a segment list could be produced.
    Errored,
    /// Run was cancelled by the host.
    Aborted,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Running => "running",
            JobState::Finished => "finished",
            JobState::Errored => "errored",
            JobState::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Running)
    }
}

/// Outcome record reported to the host when a run ends.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JobOutcome {
    /// Job id if the run was queued by the host.
    pub job_id: Option<JobId>,
    /// Terminal state.
    pub state: JobState,
    /// Number of commercial breaks detected (0 on error).
    pub detected_breaks: u32,
    /// Human-readable status comment.
    pub comment: String,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
}

impl JobOutcome {
    pub fn finished(job_id: Option<JobId>, detected_breaks: u32) -> Self {
        Self {
            job_id,
            state: JobState::Finished,
            detected_breaks,
            comment: format!("Detected {} adverts.", detected_breaks),
            finished_at: Utc::now(),
        }
    }

    pub fn errored(job_id: Option<JobId>, comment: impl Into<String>) -> Self {
        Self {
            job_id,
            state: JobState::Errored,
            detected_breaks: 0,
            comment: comment.into(),
            finished_at: Utc::now(),
        }
    }

    pub fn aborted(job_id: Option<JobId>) -> Self {
        Self {
            job_id,
            state: JobState::Aborted,
            detected_breaks: 0,
            comment: "Run aborted by host".to_string(),
            finished_at: Utc::now(),
        }
    }
}
