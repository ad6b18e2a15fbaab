//! Validation of raw rows into customer records

use crate::config::InvalidRowPolicy;
use crate::error::ValidationError;
use crate::types::customer::{CustomerRecord, RawCustomerRow};
use tracing::warn;

/// Customers that passed validation, plus the rows that were skipped
#[derive(Debug, Clone, Default)]
pub struct ValidatedBatch {
    pub records: Vec<CustomerRecord>,
    /// Empty under [`InvalidRowPolicy::Fail`]
    pub rejected: Vec<ValidationError>,
}

impl ValidatedBatch {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Validate raw rows in order.
///
/// Under `Fail` the first bad row aborts with its error. Under `Skip` bad
/// rows are logged and collected, and the rest of the batch is kept.
pub fn validate_batch(
    rows: &[RawCustomerRow],
    policy: InvalidRowPolicy,
) -> Result<ValidatedBatch, ValidationError> {
    let mut batch = ValidatedBatch {
        records: Vec::with_capacity(rows.len()),
        rejected: Vec::new(),
    };

    for (idx, raw) in rows.iter().enumerate() {
        match raw.validate(idx + 1) {
            Ok(record) => batch.records.push(record),
            Err(e) => match policy {
                InvalidRowPolicy::Fail => return Err(e),
                InvalidRowPolicy::Skip => {
                    warn!(
                        row = e.row(),
                        field = e.field(),
                        error = %e,
                        "Skipping invalid customer row"
                    );
                    batch.rejected.push(e);
                }
            },
        }
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, tenure: &str, charges: &str, label: &str) -> RawCustomerRow {
        RawCustomerRow {
            customer_id: Some(id.to_string()),
            tenure: Some(tenure.to_string()),
            monthly_charges: Some(charges.to_string()),
            churn_label: Some(label.to_string()),
            ..Default::default()
        }
    }

    fn rows() -> Vec<RawCustomerRow> {
        vec![
            row("a", "6", "80", "Yes"),
            row("b", "x", "90", "No"),
            row("c", "30", "40", "Yes"),
            row("d", "50", "", "No"),
        ]
    }

    #[test]
    fn test_fail_policy_returns_first_error() {
        let err = validate_batch(&rows(), InvalidRowPolicy::Fail).unwrap_err();
        assert_eq!(err.row(), 2);
        assert_eq!(err.field(), "tenure");
    }

    #[test]
    fn test_skip_policy_keeps_valid_rows() {
        let batch = validate_batch(&rows(), InvalidRowPolicy::Skip).unwrap();

        let ids: Vec<&str> = batch.records.iter().map(|r| r.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(batch.rejected_count(), 2);
        assert_eq!(batch.rejected[0].row(), 2);
        assert_eq!(batch.rejected[1].row(), 4);
        assert_eq!(batch.rejected[1].field(), "monthly_charges");
    }

    #[test]
    fn test_all_valid() {
        let rows = vec![row("a", "1", "1.5", "No")];
        let batch = validate_batch(&rows, InvalidRowPolicy::Fail).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert!(batch.rejected.is_empty());
    }
}
