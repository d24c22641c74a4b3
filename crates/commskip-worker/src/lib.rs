//! Commercial flagging worker.
//!
//! This crate provides:
//! - Command-line surface for queued and manual runs
//! - Preset parsing and preset-file lookup
//! - Analysis orchestration with bounded retries
//! - Result document emission and player update messages

pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod preset;
pub mod runner;

pub use cli::{Cli, JobIdentity};
pub use config::WorkerConfig;
pub use emit::FlagResult;
pub use error::{WorkerError, WorkerResult};
pub use preset::Preset;
