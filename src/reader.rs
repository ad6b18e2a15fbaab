//! CSV reader for customer extracts

use crate::types::customer::RawCustomerRow;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Anything that can hand the engine a batch of raw customer rows
pub trait RecordSource {
    fn read_rows(&mut self) -> Result<Vec<RawCustomerRow>>;
}

/// Reads customer rows from a CSV source with a header row
pub struct CsvCustomerReader<R: Read> {
    reader: csv::Reader<R>,
    source: String,
}

impl CsvCustomerReader<File> {
    /// Open a CSV file
    pub fn from_path<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("Failed to open customer file: {:?}", path))?;

        Ok(Self {
            reader,
            source: path.display().to_string(),
        })
    }
}

impl<R: Read> CsvCustomerReader<R> {
    /// Wrap any reader, e.g. an in-memory buffer
    pub fn from_reader(inner: R, delimiter: u8) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(inner);

        Self {
            reader,
            source: "<reader>".to_string(),
        }
    }

    /// Description of where rows come from
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl<R: Read> RecordSource for CsvCustomerReader<R> {
    fn read_rows(&mut self) -> Result<Vec<RawCustomerRow>> {
        let mut rows = Vec::new();

        for (idx, result) in self.reader.deserialize().enumerate() {
            let row: RawCustomerRow = result
                .with_context(|| format!("Malformed CSV record {} in {}", idx + 1, self.source))?;
            rows.push(row);
        }

        info!(source = %self.source, rows = rows.len(), "Read customer rows");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_snake_case_headers() {
        let data = "customer_id,tenure,monthly_charges,churn_label,city\n\
                    c1,6,80,Yes,San Diego\n\
                    c2,18,90.5,No,\n";
        let mut reader = CsvCustomerReader::from_reader(data.as_bytes(), b',');
        let rows = reader.read_rows().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].customer_id.as_deref(), Some("c1"));
        assert_eq!(rows[0].city.as_deref(), Some("San Diego"));
        assert_eq!(rows[1].monthly_charges.as_deref(), Some("90.5"));
        assert_eq!(rows[1].city, None);
        assert_eq!(rows[1].payment_method, None);
    }

    #[test]
    fn test_reads_telco_headers() {
        let data = "CustomerID;Gender;Tenure Months;Payment Method;Monthly Charges;Churn Label;Churn Reason\n\
                    3668-QPYBK;Male;2;Mailed check;53.85;Yes;Competitor made better offer\n";
        let mut reader = CsvCustomerReader::from_reader(data.as_bytes(), b';');
        let rows = reader.read_rows().unwrap();

        assert_eq!(rows.len(), 1);
        let record = rows[0].validate(1).unwrap();
        assert_eq!(record.customer_id, "3668-QPYBK");
        assert_eq!(record.tenure, 2);
        assert_eq!(record.monthly_charges, 53.85);
        assert_eq!(record.payment_method.as_deref(), Some("Mailed check"));
        assert_eq!(
            record.churn_reason.as_deref(),
            Some("Competitor made better offer")
        );
    }

    #[test]
    fn test_non_numeric_values_reach_validation() {
        let data = "customer_id,tenure,monthly_charges,churn_label\nc1,abc,80,Yes\n";
        let mut reader = CsvCustomerReader::from_reader(data.as_bytes(), b',');
        let rows = reader.read_rows().unwrap();

        let err = rows[0].validate(1).unwrap_err();
        assert_eq!(err.field(), "tenure");
    }

    #[test]
    fn test_ragged_row_is_an_error() {
        let data = "customer_id,tenure,monthly_charges,churn_label\nc1,6\n";
        let mut reader = CsvCustomerReader::from_reader(data.as_bytes(), b',');
        assert!(reader.read_rows().is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(CsvCustomerReader::from_path("/nonexistent/customers.csv", b',').is_err());
    }
}
