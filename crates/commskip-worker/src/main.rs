//! Commercial flagging worker binary.
//!
//! Exit status contract: 0 when flagging completed (zero breaks is still
//! a success), 1 on error or abort.

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commskip_audio::AudioError;
use commskip_models::JobOutcome;
use commskip_worker::{runner, Cli, WorkerConfig, WorkerError};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let default_level = match cli.verbose {
        0 => "commskip=info",
        1 => "commskip=debug",
        _ => "commskip=trace",
    };
    let env_filter = EnvFilter::from_default_env()
        .add_directive(default_level.parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting commskip-worker");

    let worker = WorkerConfig::from_env();
    info!("Worker config: {:?}", worker);

    // Signal handler flips the abort flag; the analysis checks it
    // cooperatively once per window.
    let (abort_tx, abort_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        abort_tx.send(true).ok();
    });

    let job_id = cli.job_identity().ok().and_then(|id| id.job_id());

    match runner::run(&cli, &worker, abort_rx).await {
        Ok(result) => {
            info!(
                detected_breaks = result.outcome.detected_breaks,
                comment = result.outcome.comment,
                "Flagging complete"
            );
            if let Err(e) = result.emit(cli.output.as_deref()).await {
                error!("Failed to write result document: {}", e);
                std::process::exit(1);
            }
        }
        Err(WorkerError::Audio(AudioError::Cancelled)) => {
            let outcome = JobOutcome::aborted(job_id);
            error!(comment = outcome.comment, "Flagging aborted");
            print_outcome(&outcome);
            std::process::exit(1);
        }
        Err(e) => {
            let outcome = JobOutcome::errored(job_id, e.to_string());
            error!("Flagging failed: {}", e);
            print_outcome(&outcome);
            std::process::exit(1);
        }
    }
}

fn print_outcome(outcome: &JobOutcome) {
    if let Ok(json) = serde_json::to_string_pretty(outcome) {
        println!("{}", json);
    }
}
