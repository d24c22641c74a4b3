//! Time-to-frame mapping and segment partitioning.
//!
//! Accepted breaks are converted to frame numbers and the whole recording
//! is partitioned into alternating Program/Commercial segments covering
//! frame 0 through the last frame with no gaps or overlaps.
//!
//! Rounding is round-half-up (`f64::round` on non-negative values) and
//! applied consistently to both edges; off-by-one frame boundaries are
//! visible in playback.

use commskip_models::{Break, Segment, SegmentKind};

/// Map a time in seconds to a frame number, round-half-up.
pub fn time_to_frame(secs: f64, fps: f64) -> u64 {
    (secs * fps).round().max(0.0) as u64
}

/// Partition the recording into segments given the accepted breaks.
///
/// Breaks must be sorted and non-overlapping. Each accepted break is first
/// shrunk inward by `pad_secs` per edge (protecting program content at the
/// cut points); a break that padding collapses is dropped. A commercial
/// segment covers the frames from the padded start up to, but not
/// including, the padded end's frame. Empty segments are elided. With no
/// accepted breaks the whole recording is one Program segment.
pub fn build_segments(
    accepted: &[Break],
    fps: f64,
    total_frames: u64,
    pad_secs: f64,
) -> Vec<Segment> {
    if total_frames == 0 {
        return Vec::new();
    }

    let last_frame = total_frames - 1;
    let mut segments = Vec::new();
    let mut cursor = 0u64;

    for brk in accepted {
        let padded = match brk.padded(pad_secs) {
            Some(p) => p,
            None => continue,
        };

        let start = time_to_frame(padded.start_secs, fps).min(last_frame);
        // Exclusive upper bound: the program resumes on the frame the
        // break's end time maps to.
        let end = time_to_frame(padded.end_secs, fps).min(total_frames);

        if end <= start || start < cursor {
            // Break collapsed by clamping, or overlaps the previous one.
            continue;
        }

        if start > cursor {
            segments.push(Segment::new(cursor, start - 1, SegmentKind::Program));
        }
        segments.push(Segment::new(start, end - 1, SegmentKind::Commercial));
        cursor = end;
    }

    if cursor <= last_frame {
        segments.push(Segment::new(cursor, last_frame, SegmentKind::Program));
    }

    segments
}
