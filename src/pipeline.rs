//! One batch run: read, validate, score, write

use crate::config::AppConfig;
use crate::ingest::validate_batch;
use crate::reader::{CsvCustomerReader, RecordSource};
use crate::report::RunTimings;
use crate::scoring::engine::RiskScoringEngine;
use crate::types::summary::SummaryRecord;
use crate::writer::{write_summary_json, CsvScoredWriter, RecordSink, StagedFile};
use anyhow::{Context, Result};
use std::time::Instant;
use tracing::info;

/// Result of a completed run
#[derive(Debug)]
pub struct BatchOutcome {
    pub summary: SummaryRecord,
    /// Rows dropped under the skip policy
    pub rejected: usize,
    pub timings: RunTimings,
}

/// Run the configured batch end to end.
///
/// Both outputs are staged beside their targets and moved into place only
/// after both are fully written. A run that fails before that point, while
/// reading, scoring or writing, leaves the previous outputs in place.
pub fn run_batch(config: &AppConfig) -> Result<BatchOutcome> {
    let mut timings = RunTimings::default();
    let engine = RiskScoringEngine::from_config(config);

    let start = Instant::now();
    let mut reader =
        CsvCustomerReader::from_path(&config.input.path, config.input.delimiter_byte()?)?;
    let rows = reader.read_rows()?;
    timings.read = start.elapsed();

    let start = Instant::now();
    let validated = validate_batch(&rows, config.pipeline.invalid_rows)
        .with_context(|| format!("Invalid customer batch in {}", config.input.path))?;
    timings.validate = start.elapsed();

    let start = Instant::now();
    let batch = engine.run(&validated.records)?;
    timings.score = start.elapsed();

    let start = Instant::now();
    let mut scored_out = StagedFile::new(&config.output.scored_path)?;
    let mut writer = CsvScoredWriter::from_writer(scored_out.writer());
    writer.write_batch(&batch.records)?;
    writer.into_inner()?;

    let summary = SummaryRecord::new(config.input.path.clone(), batch.summary);
    let mut summary_out = StagedFile::new(&config.output.summary_path)?;
    write_summary_json(summary_out.writer(), &summary)?;

    // Summary first: a summary target that cannot be replaced fails the run
    // before the scored rows change.
    summary_out.commit()?;
    scored_out.commit()?;
    timings.write = start.elapsed();

    info!(
        batch_id = %summary.batch_id,
        scored = batch.records.len(),
        rejected = validated.rejected_count(),
        at_risk_basis = %summary.summary.at_risk_basis,
        cltv_at_risk = summary.summary.total_cltv_at_risk,
        "Batch scored"
    );

    Ok(BatchOutcome {
        summary,
        rejected: validated.rejected_count(),
        timings,
    })
}
