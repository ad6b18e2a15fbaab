//! Churn Risk Engine - Main Entry Point
//!
//! Reads a customer batch, scores it, writes the scored rows and batch summary,
//! and optionally publishes the summary to NATS for the KPI dashboard.

use anyhow::{Context, Result};
use churn_risk_engine::{
    cli::Args,
    config::{AppConfig, LoggingConfig},
    pipeline::run_batch,
    publisher::SummaryPublisher,
    report,
};
use clap::Parser;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(&args)?;
    args.apply(&mut config);
    config.validate()?;

    init_tracing(&config.logging)?;

    info!("Starting Churn Risk Engine");
    info!(
        "Thresholds: high-value CLTV > {:.2}, high-risk churn score > {:.2}, at-risk basis: {}",
        config.scoring.high_value_cltv, config.scoring.high_risk_churn_score, config.summary.at_risk
    );

    if config.pipeline.workers > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.pipeline.workers)
            .build_global()
            .context("Failed to configure scoring thread pool")?;
        info!(workers = config.pipeline.workers, "Scoring thread pool configured");
    }

    info!(input = %config.input.path, "Scoring customer batch");

    let run_config = config.clone();
    let outcome = match tokio::task::spawn_blocking(move || run_batch(&run_config)).await? {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Batch run failed");
            return Err(e);
        }
    };

    report::print_summary(&outcome.summary.summary, outcome.rejected, &outcome.timings);
    info!(
        scored = %config.output.scored_path,
        summary = %config.output.summary_path,
        "Outputs written"
    );

    if config.nats.enabled {
        match SummaryPublisher::connect(&config.nats.url, &config.nats.summary_subject).await {
            Ok(publisher) => {
                if let Err(e) = publisher.publish(&outcome.summary).await {
                    error!(
                        batch_id = %outcome.summary.batch_id,
                        error = %e,
                        "Failed to publish batch summary"
                    );
                } else {
                    info!(
                        batch_id = %outcome.summary.batch_id,
                        subject = %publisher.subject(),
                        "Batch summary published"
                    );
                }
            }
            Err(e) => {
                warn!(url = %config.nats.url, error = %e, "Could not connect to NATS, summary not published");
            }
        }
    }

    info!("Churn Risk Engine finished");
    Ok(())
}

/// Explicit `--config` must exist; otherwise fall back to the default file, then to built-in defaults
fn load_config(args: &Args) -> Result<AppConfig> {
    match args.config {
        Some(ref path) => AppConfig::load_from_path(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => AppConfig::load(),
        None => Ok(AppConfig::default()),
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("churn_risk_engine={}", logging.level)))?;

    match logging.format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    Ok(())
}
