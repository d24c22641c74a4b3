//! Command-line surface.
//!
//! A run is identified either by the host's job id or, for manual
//! operation, by a channel id and recording start time.

use std::path::PathBuf;

use clap::Parser;
use commskip_models::JobId;

use crate::error::{WorkerError, WorkerResult};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "commskip-worker",
    version,
    about = "Build a commercial skip list from silence in a recording's audio track"
)]
pub struct Cli {
    /// Host job id
    pub job_id: Option<String>,

    /// Channel id for manual operation
    #[arg(long)]
    pub chanid: Option<String>,

    /// Recording start time for manual operation
    #[arg(long)]
    pub starttime: Option<String>,

    /// Recording file to analyze
    #[arg(long)]
    pub input: PathBuf,

    /// JSON analysis configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Reject unknown configuration keys instead of ignoring them
    #[arg(long)]
    pub strict_config: bool,

    /// Inline preset: "thresh, minquiet, mindetect, minbreak, maxsep, pad"
    #[arg(long, allow_hyphen_values = true)]
    pub preset: Option<String>,

    /// Preset file whose lines are matched against the recording title or
    /// channel callsign
    #[arg(long)]
    pub preset_file: Option<PathBuf>,

    /// Recording title, for preset file matching
    #[arg(long)]
    pub title: Option<String>,

    /// Channel callsign, for preset file matching
    #[arg(long)]
    pub callsign: Option<String>,

    /// Write the result document here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// How the run was identified by the host.
#[derive(Debug, Clone)]
pub enum JobIdentity {
    /// Queued by the host job system.
    Queued(JobId),
    /// Manual run against a specific recording.
    Manual { chanid: String, starttime: String },
}

impl JobIdentity {
    /// Job id to report in the outcome, when there is one.
    pub fn job_id(&self) -> Option<JobId> {
        match self {
            JobIdentity::Queued(id) => Some(id.clone()),
            JobIdentity::Manual { .. } => None,
        }
    }

    /// Program identifier used in player update messages.
    pub fn prog_id(&self) -> String {
        match self {
            JobIdentity::Queued(id) => id.to_string(),
            JobIdentity::Manual { chanid, starttime } => JobId::prog_id(chanid, starttime),
        }
    }
}

impl Cli {
    /// Resolve the job identity; either a job id or both manual fields
    /// must be supplied.
    pub fn job_identity(&self) -> WorkerResult<JobIdentity> {
        if let Some(id) = &self.job_id {
            return Ok(JobIdentity::Queued(JobId::from_string(id.clone())));
        }
        match (&self.chanid, &self.starttime) {
            (Some(chanid), Some(starttime)) => Ok(JobIdentity::Manual {
                chanid: chanid.clone(),
                starttime: starttime.clone(),
            }),
            _ => Err(WorkerError::config_error(
                "either a job id or both --chanid and --starttime must be specified",
            )),
        }
    }
}
