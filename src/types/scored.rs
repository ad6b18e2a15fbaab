//! Scored customer records and their derived categories

use crate::types::customer::CustomerRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tenure bucket. Boundaries are inclusive on the lower group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TenureGroup {
    #[serde(rename = "0-12")]
    UpToTwelve,
    #[serde(rename = "13-24")]
    ThirteenToTwentyFour,
    #[serde(rename = "25+")]
    TwentyFivePlus,
}

impl TenureGroup {
    pub const ALL: [TenureGroup; 3] = [
        TenureGroup::UpToTwelve,
        TenureGroup::ThirteenToTwentyFour,
        TenureGroup::TwentyFivePlus,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TenureGroup::UpToTwelve => "0-12",
            TenureGroup::ThirteenToTwentyFour => "13-24",
            TenureGroup::TwentyFivePlus => "25+",
        }
    }
}

impl fmt::Display for TenureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Value tier crossed with risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskSegment {
    #[serde(rename = "High-Value, High-Risk")]
    HighValueHighRisk,
    #[serde(rename = "High-Value, Low-Risk")]
    HighValueLowRisk,
    #[serde(rename = "Low-Value, High-Risk")]
    LowValueHighRisk,
    #[serde(rename = "Low-Value, Low-Risk")]
    LowValueLowRisk,
}

impl RiskSegment {
    pub const ALL: [RiskSegment; 4] = [
        RiskSegment::HighValueHighRisk,
        RiskSegment::HighValueLowRisk,
        RiskSegment::LowValueHighRisk,
        RiskSegment::LowValueLowRisk,
    ];

    /// Combine the two tier decisions into a segment
    pub fn from_tiers(high_value: bool, high_risk: bool) -> Self {
        match (high_value, high_risk) {
            (true, true) => RiskSegment::HighValueHighRisk,
            (true, false) => RiskSegment::HighValueLowRisk,
            (false, true) => RiskSegment::LowValueHighRisk,
            (false, false) => RiskSegment::LowValueLowRisk,
        }
    }

    pub fn is_high_value(self) -> bool {
        matches!(
            self,
            RiskSegment::HighValueHighRisk | RiskSegment::HighValueLowRisk
        )
    }

    pub fn is_high_risk(self) -> bool {
        matches!(
            self,
            RiskSegment::HighValueHighRisk | RiskSegment::LowValueHighRisk
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskSegment::HighValueHighRisk => "High-Value, High-Risk",
            RiskSegment::HighValueLowRisk => "High-Value, Low-Risk",
            RiskSegment::LowValueHighRisk => "Low-Value, High-Risk",
            RiskSegment::LowValueLowRisk => "Low-Value, Low-Risk",
        }
    }
}

impl fmt::Display for RiskSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A customer together with the fields derived from it.
///
/// Built once per batch run by the scoring engine and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub customer: CustomerRecord,

    /// 1 if the customer churned, else 0
    pub churn_flag: u8,

    /// Monthly charges times tenure
    pub lifetime_value: f64,

    pub tenure_group: TenureGroup,

    /// Unclamped; long-tenure churners go negative
    pub churn_score: f64,

    pub risk_segment: RiskSegment,
}

impl ScoredRecord {
    pub fn is_churned(&self) -> bool {
        self.churn_flag == 1
    }
}
