//! Frame-accurate output segments.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Classification of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Program content to play normally.
    Program,
    /// Commercial content the player should skip.
    Commercial,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Program => "program",
            SegmentKind::Commercial => "commercial",
        }
    }
}

/// An inclusive frame range classified as program or commercial.
///
/// A valid segment list is sorted, non-overlapping, and covers the whole
/// recording `[0, total_frames)` without gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// First frame of the segment.
    pub start_frame: u64,
    /// Last frame of the segment (inclusive); always >= `start_frame`.
    pub end_frame: u64,
    /// Program or commercial.
    pub kind: SegmentKind,
}

impl Segment {
    pub fn new(start_frame: u64, end_frame: u64, kind: SegmentKind) -> Self {
        debug_assert!(start_frame <= end_frame);
        Self {
            start_frame,
            end_frame,
            kind,
        }
    }

    /// Number of frames covered by this segment.
    pub fn frame_count(&self) -> u64 {
        self.end_frame - self.start_frame + 1
    }

    pub fn is_commercial(&self) -> bool {
        self.kind == SegmentKind::Commercial
    }
}

/// Check that a segment list is sorted, non-overlapping, and gap-free
/// over `[0, total_frames)`.
pub fn covers_recording(segments: &[Segment], total_frames: u64) -> bool {
    if total_frames == 0 {
        return segments.is_empty();
    }
    let mut expected_start = 0u64;
    for segment in segments {
        if segment.start_frame != expected_start || segment.end_frame < segment.start_frame {
            return false;
        }
        expected_start = segment.end_frame + 1;
    }
    expected_start == total_frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count() {
        let s = Segment::new(18000, 18239, SegmentKind::Commercial);
        assert_eq!(s.frame_count(), 240);
        assert!(s.is_commercial());
    }

    #[test]
    fn test_covers_recording() {
        let segments = vec![
            Segment::new(0, 17999, SegmentKind::Program),
            Segment::new(18000, 18239, SegmentKind::Commercial),
            Segment::new(18240, 107999, SegmentKind::Program),
        ];
        assert!(covers_recording(&segments, 108000));
        assert!(!covers_recording(&segments, 108001));
    }

    #[test]
    fn test_covers_recording_rejects_gap() {
        let segments = vec![
            Segment::new(0, 100, SegmentKind::Program),
            Segment::new(102, 200, SegmentKind::Commercial),
        ];
        assert!(!covers_recording(&segments, 201));
    }

    #[test]
    fn test_kind_serde_snake_case() {
        let json = serde_json::to_string(&SegmentKind::Commercial).unwrap();
        assert_eq!(json, "\"commercial\"");
    }
}
