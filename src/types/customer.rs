//! Customer records as they arrive from the ingestion layer

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest accepted monthly charge.
///
/// Keeps lifetime values and batch totals finite for any tenure a `u32` holds.
pub const MAX_MONTHLY_CHARGES: f64 = 1_000_000_000.0;

/// Churn label of a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChurnLabel {
    Yes,
    No,
}

impl ChurnLabel {
    /// Parse a label from its textual form.
    ///
    /// Accepts Yes/No, true/false and 1/0, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" | "1" => Some(ChurnLabel::Yes),
            "no" | "false" | "0" => Some(ChurnLabel::No),
            _ => None,
        }
    }

    pub fn is_churned(self) -> bool {
        matches!(self, ChurnLabel::Yes)
    }
}

impl From<bool> for ChurnLabel {
    fn from(churned: bool) -> Self {
        if churned {
            ChurnLabel::Yes
        } else {
            ChurnLabel::No
        }
    }
}

impl fmt::Display for ChurnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChurnLabel::Yes => f.write_str("Yes"),
            ChurnLabel::No => f.write_str("No"),
        }
    }
}

/// Untyped row read from a customer extract.
///
/// Every field is optional text so that malformed values reach validation
/// instead of failing deserialization. Aliases cover the Telco churn
/// dataset headers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCustomerRow {
    #[serde(alias = "CustomerID", alias = "customerID")]
    pub customer_id: Option<String>,

    #[serde(alias = "Tenure Months", alias = "tenure_months", alias = "Tenure")]
    pub tenure: Option<String>,

    #[serde(alias = "Monthly Charges", alias = "MonthlyCharges")]
    pub monthly_charges: Option<String>,

    #[serde(alias = "Churn Label", alias = "Churn", alias = "churn")]
    pub churn_label: Option<String>,

    #[serde(alias = "Payment Method", alias = "PaymentMethod")]
    pub payment_method: Option<String>,

    #[serde(alias = "Gender")]
    pub gender: Option<String>,

    #[serde(alias = "City")]
    pub city: Option<String>,

    #[serde(alias = "Churn Reason")]
    pub churn_reason: Option<String>,
}

impl RawCustomerRow {
    /// Validate this row into a [`CustomerRecord`].
    ///
    /// `row` is the 1-based position of the row in its batch and is echoed
    /// back in any error.
    pub fn validate(&self, row: usize) -> Result<CustomerRecord, ValidationError> {
        let customer_id = required(row, "customer_id", &self.customer_id)?;
        let tenure = parse_tenure(row, required(row, "tenure", &self.tenure)?)?;
        let monthly_charges =
            parse_charges(row, required(row, "monthly_charges", &self.monthly_charges)?)?;
        let label = required(row, "churn_label", &self.churn_label)?;
        let churn_label =
            ChurnLabel::parse(label).ok_or_else(|| ValidationError::InvalidChurnLabel {
                row,
                value: label.to_string(),
            })?;

        Ok(CustomerRecord {
            customer_id: customer_id.to_string(),
            tenure,
            monthly_charges,
            churn_label,
            payment_method: optional(&self.payment_method),
            gender: optional(&self.gender),
            city: optional(&self.city),
            churn_reason: optional(&self.churn_reason),
        })
    }
}

fn required<'a>(
    row: usize,
    field: &'static str,
    value: &'a Option<String>,
) -> Result<&'a str, ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField { row, field }),
    }
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_tenure(row: usize, value: &str) -> Result<u32, ValidationError> {
    match value.parse::<i64>() {
        Ok(t) if t < 0 => Err(ValidationError::Negative {
            row,
            field: "tenure",
            value: value.to_string(),
        }),
        Ok(t) => u32::try_from(t).map_err(|_| ValidationError::NotNumeric {
            row,
            field: "tenure",
            expected: "non-negative integer",
            value: value.to_string(),
        }),
        Err(_) => Err(ValidationError::NotNumeric {
            row,
            field: "tenure",
            expected: "non-negative integer",
            value: value.to_string(),
        }),
    }
}

fn parse_charges(row: usize, value: &str) -> Result<f64, ValidationError> {
    let charges = value
        .parse::<f64>()
        .map_err(|_| ValidationError::NotNumeric {
            row,
            field: "monthly_charges",
            expected: "decimal",
            value: value.to_string(),
        })?;
    check_charges(row, charges)
}

fn check_charges(row: usize, charges: f64) -> Result<f64, ValidationError> {
    if !charges.is_finite() {
        return Err(ValidationError::NotFinite {
            row,
            field: "monthly_charges",
            value: charges.to_string(),
        });
    }
    if charges < 0.0 {
        return Err(ValidationError::Negative {
            row,
            field: "monthly_charges",
            value: charges.to_string(),
        });
    }
    if charges > MAX_MONTHLY_CHARGES {
        return Err(ValidationError::OutOfRange {
            row,
            field: "monthly_charges",
            value: charges.to_string(),
            max: MAX_MONTHLY_CHARGES,
        });
    }
    Ok(charges)
}

/// A validated customer, one per row of the batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Opaque unique identifier
    pub customer_id: String,

    /// Months of service
    pub tenure: u32,

    /// Monthly charges in dollars
    pub monthly_charges: f64,

    pub churn_label: ChurnLabel,

    // Pass-through attributes, not used in scoring
    pub payment_method: Option<String>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub churn_reason: Option<String>,
}

impl CustomerRecord {
    /// Create a record with the scoring fields only
    pub fn new(
        customer_id: impl Into<String>,
        tenure: u32,
        monthly_charges: f64,
        churn_label: ChurnLabel,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            tenure,
            monthly_charges,
            churn_label,
            payment_method: None,
            gender: None,
            city: None,
            churn_reason: None,
        }
    }

    /// Check a record built in code, reporting `row` on failure
    pub fn validate(&self, row: usize) -> Result<(), ValidationError> {
        if self.customer_id.trim().is_empty() {
            return Err(ValidationError::MissingField {
                row,
                field: "customer_id",
            });
        }
        check_charges(row, self.monthly_charges).map(|_| ())
    }

    pub fn churn_flag(&self) -> u8 {
        u8::from(self.churn_label.is_churned())
    }
}
