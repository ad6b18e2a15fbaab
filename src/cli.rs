//! Command-line interface definitions and argument parsing

use crate::config::{AppConfig, InvalidRowPolicy};
use crate::types::summary::AtRiskBasis;
use clap::Parser;

/// Score a batch of telecom customers for churn risk and financial exposure
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Customer CSV to score (overrides input.path)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Scored CSV destination (overrides output.scored_path)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Summary JSON destination (overrides output.summary_path)
    #[arg(short, long)]
    pub summary: Option<String>,

    /// Definition of "at risk": churned or high-risk
    #[arg(long)]
    pub at_risk: Option<AtRiskBasis>,

    /// Skip invalid rows instead of failing the batch
    #[arg(long)]
    pub skip_invalid: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Apply command-line overrides on top of file configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(ref input) = self.input {
            config.input.path = input.clone();
        }
        if let Some(ref output) = self.output {
            config.output.scored_path = output.clone();
        }
        if let Some(ref summary) = self.summary {
            config.output.summary_path = summary.clone();
        }
        if let Some(basis) = self.at_risk {
            config.summary.at_risk = basis;
        }
        if self.skip_invalid {
            config.pipeline.invalid_rows = InvalidRowPolicy::Skip;
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
    }
}
