//! Configuration management for the churn risk engine

use crate::scoring::rules::ScoringRules;
use crate::types::summary::AtRiskBasis;
use anyhow::{bail, Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// What to do with rows that fail validation
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvalidRowPolicy {
    /// Reject the whole batch on the first invalid row
    #[default]
    Fail,
    /// Log and drop invalid rows, score the rest
    Skip,
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub scoring: ScoringRules,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub nats: NatsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Customer extract location
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// CSV file with one row per customer
    pub path: String,
    /// Field delimiter (single byte)
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_delimiter() -> String {
    ",".to_string()
}

impl InputConfig {
    /// Delimiter as the byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [b] => Ok(*b),
            _ => bail!(
                "input.delimiter must be a single byte, got {:?}",
                self.delimiter
            ),
        }
    }
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Scored customer CSV
    pub scored_path: String,
    /// Batch summary JSON
    pub summary_path: String,
}

/// Summary configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryConfig {
    /// Definition of "at risk" for the KPI totals: "churned" or "high-risk"
    #[serde(default)]
    pub at_risk: AtRiskBasis,
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Worker threads for parallel scoring (0 = one per core)
    #[serde(default)]
    pub workers: usize,
    /// Minimum batch size scored in parallel
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    /// Invalid row handling: "fail" or "skip"
    #[serde(default)]
    pub invalid_rows: InvalidRowPolicy,
}

fn default_parallel_threshold() -> usize {
    crate::scoring::engine::DEFAULT_PARALLEL_THRESHOLD
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            parallel_threshold: default_parallel_threshold(),
            invalid_rows: InvalidRowPolicy::Fail,
        }
    }
}

/// NATS summary publishing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// Publish the batch summary after each run
    #[serde(default)]
    pub enabled: bool,
    /// NATS server URL
    #[serde(default = "default_nats_url")]
    pub url: String,
    /// Subject the dashboard listens on
    #[serde(default = "default_summary_subject")]
    pub summary_subject: String,
}

fn default_nats_url() -> String {
    "nats://localhost:4222".to_string()
}

fn default_summary_subject() -> String {
    "churn.batch.summary".to_string()
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: default_nats_url(),
            summary_subject: default_summary_subject(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        let app: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        app.validate()?;
        Ok(app)
    }

    /// Check values that deserialize fine but cannot drive a run
    pub fn validate(&self) -> Result<()> {
        self.input.delimiter_byte()?;
        self.scoring
            .validate()
            .context("Invalid scoring configuration")?;
        if self.output.scored_path.trim().is_empty() {
            bail!("output.scored_path must not be empty");
        }
        if self.output.summary_path.trim().is_empty() {
            bail!("output.summary_path must not be empty");
        }
        if self.nats.enabled && self.nats.summary_subject.trim().is_empty() {
            bail!("nats.summary_subject must not be empty when publishing is enabled");
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: InputConfig {
                path: "data/customers.csv".to_string(),
                delimiter: default_delimiter(),
            },
            output: OutputConfig {
                scored_path: "output/scored_customers.csv".to_string(),
                summary_path: "output/batch_summary.json".to_string(),
            },
            scoring: ScoringRules::default(),
            summary: SummaryConfig::default(),
            pipeline: PipelineConfig::default(),
            nats: NatsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
