//! Batch-level KPI structures

use crate::types::scored::{RiskSegment, ScoredRecord, TenureGroup};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Which customers count toward the "at risk" totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AtRiskBasis {
    /// Customers whose churn flag is set
    #[default]
    Churned,
    /// Customers in a High-Risk segment, regardless of value tier
    HighRisk,
}

impl AtRiskBasis {
    pub fn includes(self, record: &ScoredRecord) -> bool {
        match self {
            AtRiskBasis::Churned => record.is_churned(),
            AtRiskBasis::HighRisk => record.risk_segment.is_high_risk(),
        }
    }
}

impl fmt::Display for AtRiskBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtRiskBasis::Churned => f.write_str("churned"),
            AtRiskBasis::HighRisk => f.write_str("high-risk"),
        }
    }
}

impl FromStr for AtRiskBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "churned" => Ok(AtRiskBasis::Churned),
            "high-risk" | "high_risk" | "highrisk" => Ok(AtRiskBasis::HighRisk),
            other => Err(format!(
                "unknown at-risk basis '{}', expected 'churned' or 'high-risk'",
                other
            )),
        }
    }
}

/// Customers and dollars in one risk segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentBreakdown {
    pub segment: RiskSegment,
    pub customers: usize,
    pub lifetime_value: f64,
    pub monthly_revenue: f64,
}

/// Customers in one tenure group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenureGroupCount {
    pub tenure_group: TenureGroup,
    pub customers: usize,
}

/// KPIs for a single scored batch.
///
/// Produced by a pure reduction over the batch; two runs over the same
/// records yield equal summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_customers: usize,
    pub churned_customers: usize,
    /// Fraction of churned customers (0.0 - 1.0)
    pub churn_rate: f64,
    pub total_lifetime_value: f64,
    pub total_monthly_revenue: f64,

    pub at_risk_basis: AtRiskBasis,
    pub at_risk_customers: usize,
    pub total_cltv_at_risk: f64,
    pub total_monthly_revenue_at_risk: f64,

    /// All four segments in declaration order, including empty ones
    pub segments: Vec<SegmentBreakdown>,
    pub tenure_groups: Vec<TenureGroupCount>,
}

impl BatchSummary {
    /// Look up the breakdown for a segment
    pub fn segment(&self, segment: RiskSegment) -> Option<&SegmentBreakdown> {
        self.segments.iter().find(|s| s.segment == segment)
    }

    pub fn segment_count(&self, segment: RiskSegment) -> usize {
        self.segment(segment).map(|s| s.customers).unwrap_or(0)
    }

    pub fn tenure_group_count(&self, group: TenureGroup) -> usize {
        self.tenure_groups
            .iter()
            .find(|g| g.tenure_group == group)
            .map(|g| g.customers)
            .unwrap_or(0)
    }
}

/// Summary stamped with the identity of the run that produced it.
///
/// A later run's record supersedes an earlier one; records are never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Unique batch run identifier
    pub batch_id: String,

    /// Where the batch was read from
    pub source: String,

    pub generated_at: DateTime<Utc>,

    #[serde(flatten)]
    pub summary: BatchSummary,
}

impl SummaryRecord {
    pub fn new(source: impl Into<String>, summary: BatchSummary) -> Self {
        Self {
            batch_id: Uuid::new_v4().to_string(),
            source: source.into(),
            generated_at: Utc::now(),
            summary,
        }
    }
}
