//! Validation errors raised while turning raw rows into customer records

use thiserror::Error;

/// A row that cannot be scored.
///
/// `row` is the 1-based data row number within the batch (the header is not
/// counted). Every variant names the offending field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("row {row}: required field `{field}` is missing")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: field `{field}` is not a valid {expected}: {value:?}")]
    NotNumeric {
        row: usize,
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("row {row}: field `{field}` must be non-negative, got {value}")]
    Negative {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("row {row}: field `{field}` must be finite, got {value}")]
    NotFinite {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("row {row}: field `{field}` must not exceed {max}, got {value}")]
    OutOfRange {
        row: usize,
        field: &'static str,
        value: String,
        max: f64,
    },

    #[error("row {row}: field `churn_label` must be Yes or No, got {value:?}")]
    InvalidChurnLabel { row: usize, value: String },
}

impl ValidationError {
    /// Row number the error refers to
    pub fn row(&self) -> usize {
        match self {
            ValidationError::MissingField { row, .. }
            | ValidationError::NotNumeric { row, .. }
            | ValidationError::Negative { row, .. }
            | ValidationError::NotFinite { row, .. }
            | ValidationError::OutOfRange { row, .. }
            | ValidationError::InvalidChurnLabel { row, .. } => *row,
        }
    }

    /// Name of the field that failed validation
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField { field, .. }
            | ValidationError::NotNumeric { field, .. }
            | ValidationError::Negative { field, .. }
            | ValidationError::NotFinite { field, .. }
            | ValidationError::OutOfRange { field, .. } => field,
            ValidationError::InvalidChurnLabel { .. } => "churn_label",
        }
    }
}
