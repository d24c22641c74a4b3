//! Shared data models for the commskip pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Per-window energy measurements and detected silence intervals
//! - Candidate commercial breaks with confidence scores
//! - Frame-accurate output segments
//! - The host skip-list representation
//! - Job identity and outcome reporting

pub mod energy;
pub mod job;
pub mod segment;
pub mod silence;
pub mod skiplist;

// Re-export common types
pub use energy::EnergyPoint;
pub use job::{JobId, JobOutcome, JobState};
pub use segment::{Segment, SegmentKind};
pub use silence::{Break, SilenceInterval};
pub use skiplist::{FrameRange, SkipList, MARK_COMM_END, MARK_COMM_START};
