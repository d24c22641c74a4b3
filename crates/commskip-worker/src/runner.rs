//! Run orchestration.
//!
//! Resolves the effective analysis configuration (JSON config file, then
//! preset overrides), opens the recording with bounded retries on
//! transient I/O failures, and drives the analysis to a [`FlagResult`].

use std::future::Future;

use commskip_audio::{
    analyze_with_abort, AnalysisConfig, AnalysisReport, FfmpegSampleSource, Strictness,
};
use commskip_models::JobOutcome;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::cli::Cli;
use crate::config::WorkerConfig;
use crate::emit::FlagResult;
use crate::error::WorkerResult;
use crate::preset::Preset;

/// Run a flagging job end to end.
pub async fn run(
    cli: &Cli,
    worker: &WorkerConfig,
    abort: watch::Receiver<bool>,
) -> WorkerResult<FlagResult> {
    let identity = cli.job_identity()?;
    let config = resolve_config(cli).await?;

    info!(
        input = %cli.input.display(),
        prog_id = identity.prog_id(),
        "Starting commercial flagging run"
    );

    let report = with_retry(worker, "silence analysis", || {
        let abort = abort.clone();
        let config = config.clone();
        async move {
            let mut source = FfmpegSampleSource::open(&cli.input).await?;
            let report = analyze_with_abort(&mut source, &config, Some(abort)).await?;
            Ok(report)
        }
    })
    .await?;

    Ok(flag_result(&identity.prog_id(), identity.job_id(), report))
}

fn flag_result(
    prog_id: &str,
    job_id: Option<commskip_models::JobId>,
    report: AnalysisReport,
) -> FlagResult {
    let skip_list = report.skip_list();
    let outcome = JobOutcome::finished(job_id, skip_list.break_count() as u32);
    FlagResult::new(outcome, report.segments, skip_list, prog_id)
}

/// Build the effective analysis configuration.
///
/// Precedence, lowest to highest: defaults, JSON config file, preset file
/// match, inline preset.
pub async fn resolve_config(cli: &Cli) -> WorkerResult<AnalysisConfig> {
    let strictness = if cli.strict_config {
        Strictness::Strict
    } else {
        Strictness::Lenient
    };

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_file(path, strictness).await?,
        None => AnalysisConfig::default(),
    };

    if let Some(preset) = resolve_preset(cli).await {
        config = preset.apply_to(config);
    }

    config.validate()?;
    Ok(config)
}

/// Pick the preset for this run. An inline preset wins over a preset
/// file; an unreadable preset file is logged and ignored, matching the
/// host convention that a bad preset never blocks flagging.
async fn resolve_preset(cli: &Cli) -> Option<Preset> {
    if let Some(line) = &cli.preset {
        return Some(Preset::parse_line(line));
    }
    let path = cli.preset_file.as_ref()?;
    let title = cli.title.as_deref().unwrap_or("");
    let callsign = cli.callsign.as_deref().unwrap_or("");
    match Preset::from_file(path, title, callsign).await {
        Ok(preset) => preset,
        Err(e) => {
            error!(error = %e, "Preset lookup failed, continuing with defaults");
            None
        }
    }
}

/// Execute an operation with bounded retries on transient failures.
async fn with_retry<T, F, Fut>(
    worker: &WorkerConfig,
    operation: &str,
    mut op: F,
) -> WorkerResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = WorkerResult<T>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < worker.decode_retries => {
                attempt += 1;
                warn!(
                    operation = operation,
                    attempt = attempt,
                    max_retries = worker.decode_retries,
                    error = %e,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(worker.retry_delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
