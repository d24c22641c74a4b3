#![deny(unreachable_patterns)]
//! Silence detection and commercial break classification.
//!
//! This crate turns a decoded PCM stream into a frame-accurate commercial
//! segment list:
//!
//! ```text
//! ┌─────────────┐   ┌────────────┐   ┌────────────┐   ┌───────────┐
//! │ SampleSource│──►│ Energy     │──►│ Silence    │──►│ Merger /  │
//! │ (FFmpeg)    │   │ Analyzer   │   │ Detector   │   │ Filter    │
//! └─────────────┘   └────────────┘   └────────────┘   └───────────┘
//!                                                           │
//!                   ┌────────────┐   ┌────────────┐         ▼
//!                   │ Segment    │◄──│ Frame      │◄──┌───────────┐
//!                   │ list       │   │ Mapper     │   │ Break     │
//!                   └────────────┘   └────────────┘   │ Classifier│
//!                                                     └───────────┘
//! ```
//!
//! Data flows strictly forward; each stage owns its accumulators. The
//! entry point is [`analyze`], which runs the whole pipeline in one
//! streaming pass.

pub mod analyze;
pub mod classify;
pub mod config;
pub mod detector;
pub mod energy;
pub mod error;
pub mod frame_map;
pub mod merge;
pub mod probe;
pub mod source;

pub use analyze::{analyze, analyze_with_abort, AnalysisReport};
pub use classify::{classify_breaks, ClassifiedBreaks};
pub use config::{
    AnalysisConfig, ChannelMix, EdgePolicy, EnergyMetric, Strictness, ThresholdMode,
};
pub use detector::{resolve_threshold, SilenceDetector};
pub use energy::EnergyAnalyzer;
pub use error::{AudioError, AudioResult};
pub use frame_map::{build_segments, time_to_frame};
pub use merge::{candidate_breaks, filter_breaks, merge_silences};
pub use probe::{probe_streams, StreamInfo};
pub use source::{FfmpegSampleSource, MemorySampleSource, SampleSource};
