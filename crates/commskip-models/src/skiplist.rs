//! Host skip-list representation.
//!
//! The host recording system stores commercial boundaries as a frame-range
//! markup table and pushes live updates to players as a comma-joined list
//! of `frame:marktype` pairs. The mark type codes match the host's markup
//! table (`MARK_COMM_START` / `MARK_COMM_END`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::segment::Segment;

/// Markup code for the first frame of a commercial.
pub const MARK_COMM_START: u8 = 4;

/// Markup code for the last frame of a commercial.
pub const MARK_COMM_END: u8 = 5;

/// An inclusive commercial frame range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FrameRange {
    pub start_frame: u64,
    pub end_frame: u64,
}

/// Ordered list of commercial frame ranges, the persisted skip list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SkipList {
    pub cuts: Vec<FrameRange>,
}

impl SkipList {
    /// Build a skip list from a final segment list, keeping only the
    /// commercial ranges.
    pub fn from_segments(segments: &[Segment]) -> Self {
        let cuts = segments
            .iter()
            .filter(|s| s.is_commercial())
            .map(|s| FrameRange {
                start_frame: s.start_frame,
                end_frame: s.end_frame,
            })
            .collect();
        Self { cuts }
    }

    /// Number of commercial breaks in the list.
    pub fn break_count(&self) -> usize {
        self.cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    /// Render the player update message body: `frame:4,frame:5` pairs
    /// prefixed with the program identifier. An empty list yields no
    /// message; the host only pushes updates when marks exist.
    pub fn to_update_message(&self, prog_id: &str) -> Option<String> {
        if self.cuts.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .cuts
            .iter()
            .flat_map(|range| {
                [
                    format!("{}:{}", range.start_frame, MARK_COMM_START),
                    format!("{}:{}", range.end_frame, MARK_COMM_END),
                ]
            })
            .collect();
        Some(format!("COMMFLAG_UPDATE {} {}", prog_id, pairs.join(",")))
    }
}
