//! Sinks for scored records and batch summaries

use crate::types::scored::ScoredRecord;
use crate::types::summary::SummaryRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Destination for a scored batch
pub trait RecordSink {
    fn write_batch(&mut self, records: &[ScoredRecord]) -> Result<()>;
}

/// Flat output row: original fields followed by the derived ones
#[derive(Debug, Serialize)]
struct ScoredRow<'a> {
    customer_id: &'a str,
    tenure: u32,
    monthly_charges: f64,
    churn_label: String,
    payment_method: Option<&'a str>,
    gender: Option<&'a str>,
    city: Option<&'a str>,
    churn_reason: Option<&'a str>,
    churn_flag: u8,
    lifetime_value: f64,
    tenure_group: &'static str,
    churn_score: f64,
    risk_segment: &'static str,
}

impl<'a> From<&'a ScoredRecord> for ScoredRow<'a> {
    fn from(record: &'a ScoredRecord) -> Self {
        let customer = &record.customer;
        Self {
            customer_id: &customer.customer_id,
            tenure: customer.tenure,
            monthly_charges: customer.monthly_charges,
            churn_label: customer.churn_label.to_string(),
            payment_method: customer.payment_method.as_deref(),
            gender: customer.gender.as_deref(),
            city: customer.city.as_deref(),
            churn_reason: customer.churn_reason.as_deref(),
            churn_flag: record.churn_flag,
            lifetime_value: record.lifetime_value,
            tenure_group: record.tenure_group.label(),
            churn_score: record.churn_score,
            risk_segment: record.risk_segment.label(),
        }
    }
}

/// Writes scored records as CSV with a header row
pub struct CsvScoredWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvScoredWriter<W> {
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush scored output: {}", e.error()))
    }
}

impl<W: Write> RecordSink for CsvScoredWriter<W> {
    fn write_batch(&mut self, records: &[ScoredRecord]) -> Result<()> {
        for record in records {
            self.writer
                .serialize(ScoredRow::from(record))
                .with_context(|| {
                    format!("Failed to write scored record {}", record.customer.customer_id)
                })?;
        }
        self.writer.flush()?;

        debug!(records = records.len(), "Wrote scored batch");
        Ok(())
    }
}

/// Write the batch summary as pretty JSON
pub fn write_summary_json<W: Write>(mut writer: W, summary: &SummaryRecord) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, summary)
        .with_context(|| format!("Failed to write summary {}", summary.batch_id))?;
    writer.flush()?;

    debug!(batch_id = %summary.batch_id, "Wrote batch summary");
    Ok(())
}

/// Output written to a temp file beside its target.
///
/// The target is only replaced on [`StagedFile::commit`]; dropping an
/// uncommitted file removes the temp file and leaves the target untouched.
pub struct StagedFile {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    /// Stage a new file for `target`, creating its parent directory
    pub fn new<P: AsRef<Path>>(target: P) -> Result<Self> {
        let target = target.as_ref().to_path_buf();
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {:?}", dir))?;
        let temp = NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to stage output for {:?}", target))?;

        Ok(Self { temp, target })
    }

    pub fn writer(&mut self) -> &mut NamedTempFile {
        &mut self.temp
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Move the staged file over its target
    pub fn commit(self) -> Result<()> {
        let StagedFile { temp, target } = self;
        temp.persist(&target)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to move output into place: {:?}", target))?;

        info!(path = %target.display(), "Output written");
        Ok(())
    }
}
