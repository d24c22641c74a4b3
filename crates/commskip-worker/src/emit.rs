//! Result document emission.

use std::path::Path;

use commskip_models::{JobOutcome, Segment, SkipList};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::WorkerResult;

/// Everything a host needs from a finished run: the outcome to record
/// against the job, the frame segmentation, the cut list, and the
/// ready-to-send player update message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagResult {
    pub outcome: JobOutcome,
    pub segments: Vec<Segment>,
    pub skip_list: SkipList,
    /// Absent when no breaks were detected; the host only pushes updates
    /// when marks exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_message: Option<String>,
}

impl FlagResult {
    pub fn new(
        outcome: JobOutcome,
        segments: Vec<Segment>,
        skip_list: SkipList,
        prog_id: &str,
    ) -> Self {
        let update_message = skip_list.to_update_message(prog_id);
        Self {
            outcome,
            segments,
            skip_list,
            update_message,
        }
    }

    /// Write the result as pretty JSON to the given file, or to stdout
    /// when no path is supplied.
    pub async fn emit(&self, output: Option<&Path>) -> WorkerResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        match output {
            Some(path) => {
                tokio::fs::write(path, &json).await?;
                info!(path = %path.display(), "Wrote result document");
            }
            None => println!("{}", json),
        }
        Ok(())
    }
}
