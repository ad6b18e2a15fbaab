//! Derived-column business rules for a single customer

use crate::types::scored::{RiskSegment, TenureGroup};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Last tenure month that falls in the "0-12" group
pub const SHORT_TENURE_MAX: u32 = 12;
/// Last tenure month that falls in the "13-24" group
pub const MEDIUM_TENURE_MAX: u32 = 24;

/// Thresholds and coefficients for churn scoring and segmentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Lifetime value above which a customer is High-Value
    #[serde(default = "default_high_value_cltv")]
    pub high_value_cltv: f64,
    /// Churn score above which a customer is High-Risk
    #[serde(default = "default_high_risk_churn_score")]
    pub high_risk_churn_score: f64,
    /// Churn score of a churner at tenure zero
    #[serde(default = "default_churn_score_base")]
    pub churn_score_base: f64,
    /// Points removed from the churn score per month of tenure
    #[serde(default = "default_churn_score_decay")]
    pub churn_score_decay: f64,
}

fn default_high_value_cltv() -> f64 {
    2000.0
}

fn default_high_risk_churn_score() -> f64 {
    60.0
}

fn default_churn_score_base() -> f64 {
    100.0
}

fn default_churn_score_decay() -> f64 {
    1.5
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            high_value_cltv: default_high_value_cltv(),
            high_risk_churn_score: default_high_risk_churn_score(),
            churn_score_base: default_churn_score_base(),
            churn_score_decay: default_churn_score_decay(),
        }
    }
}

impl ScoringRules {
    /// Reject thresholds that would make the segmentation meaningless
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("high_value_cltv", self.high_value_cltv),
            ("high_risk_churn_score", self.high_risk_churn_score),
            ("churn_score_base", self.churn_score_base),
            ("churn_score_decay", self.churn_score_decay),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                bail!("scoring.{} must be finite, got {}", name, value);
            }
        }
        if self.high_value_cltv < 0.0 {
            bail!(
                "scoring.high_value_cltv must be non-negative, got {}",
                self.high_value_cltv
            );
        }
        if self.churn_score_decay < 0.0 {
            bail!(
                "scoring.churn_score_decay must be non-negative, got {}",
                self.churn_score_decay
            );
        }
        Ok(())
    }

    /// Churn score for a customer. Zero for non-churners, never clamped.
    pub fn churn_score(&self, churn_flag: u8, tenure: u32) -> f64 {
        if churn_flag == 0 {
            0.0
        } else {
            self.churn_score_base - self.churn_score_decay * f64::from(tenure)
        }
    }

    pub fn is_high_value(&self, cltv: f64) -> bool {
        cltv > self.high_value_cltv
    }

    pub fn is_high_risk(&self, churn_score: f64) -> bool {
        churn_score > self.high_risk_churn_score
    }

    /// Segment from the two independent tier splits.
    ///
    /// Exact ties land on the not-greater side of each split.
    pub fn risk_segment(&self, cltv: f64, churn_score: f64) -> RiskSegment {
        RiskSegment::from_tiers(self.is_high_value(cltv), self.is_high_risk(churn_score))
    }
}

/// Bucket tenure months into "0-12", "13-24" or "25+"
pub fn classify_tenure(tenure: u32) -> TenureGroup {
    match tenure {
        0..=SHORT_TENURE_MAX => TenureGroup::UpToTwelve,
        t if t <= MEDIUM_TENURE_MAX => TenureGroup::ThirteenToTwentyFour,
        _ => TenureGroup::TwentyFivePlus,
    }
}

/// `100 - 1.5 * tenure` for churners (any non-zero flag), 0 otherwise
pub fn compute_churn_score(churn_flag: u8, tenure: u32) -> f64 {
    ScoringRules::default().churn_score(churn_flag, tenure)
}

/// Customer lifetime value, without discounting
pub fn compute_cltv(monthly_charges: f64, tenure: u32) -> f64 {
    monthly_charges * f64::from(tenure)
}

/// Segment using the default 2000 / 60 thresholds
pub fn classify_risk_segment(cltv: f64, churn_score: f64) -> RiskSegment {
    ScoringRules::default().risk_segment(cltv, churn_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tenure_boundaries() {
        assert_eq!(classify_tenure(0), TenureGroup::UpToTwelve);
        assert_eq!(classify_tenure(12), TenureGroup::UpToTwelve);
        assert_eq!(classify_tenure(13), TenureGroup::ThirteenToTwentyFour);
        assert_eq!(classify_tenure(24), TenureGroup::ThirteenToTwentyFour);
        assert_eq!(classify_tenure(25), TenureGroup::TwentyFivePlus);
        assert_eq!(classify_tenure(72), TenureGroup::TwentyFivePlus);
    }

    #[test]
    fn test_churn_score() {
        assert_eq!(compute_churn_score(1, 0), 100.0);
        assert_eq!(compute_churn_score(1, 6), 91.0);
        assert_eq!(compute_churn_score(1, 30), 55.0);
        // Long-tenure churners go negative
        assert_eq!(compute_churn_score(1, 80), -20.0);
        assert_eq!(compute_churn_score(0, 0), 0.0);
        assert_eq!(compute_churn_score(0, 80), 0.0);
    }

    #[test]
    fn test_cltv() {
        assert_eq!(compute_cltv(50.0, 10), 500.0);
        assert_eq!(compute_cltv(80.0, 0), 0.0);
        assert_eq!(compute_cltv(0.0, 40), 0.0);
    }

    #[test]
    fn test_risk_segments() {
        assert_eq!(classify_risk_segment(2500.0, 70.0), RiskSegment::HighValueHighRisk);
        assert_eq!(classify_risk_segment(2500.0, 10.0), RiskSegment::HighValueLowRisk);
        assert_eq!(classify_risk_segment(100.0, 70.0), RiskSegment::LowValueHighRisk);
        assert_eq!(classify_risk_segment(100.0, 0.0), RiskSegment::LowValueLowRisk);
    }

    #[test]
    fn test_risk_segment_ties() {
        assert_eq!(classify_risk_segment(2000.0, 70.0), RiskSegment::LowValueHighRisk);
        assert_eq!(classify_risk_segment(2500.0, 60.0), RiskSegment::HighValueLowRisk);
        assert_eq!(classify_risk_segment(2000.0, 60.0), RiskSegment::LowValueLowRisk);
        assert_eq!(classify_risk_segment(2000.01, 60.01), RiskSegment::HighValueHighRisk);
    }

    #[test]
    fn test_custom_rules() {
        let rules = ScoringRules {
            high_value_cltv: 1000.0,
            high_risk_churn_score: 50.0,
            churn_score_base: 90.0,
            churn_score_decay: 2.0,
        };
        assert_eq!(rules.churn_score(1, 10), 70.0);
        assert_eq!(rules.risk_segment(1500.0, 55.0), RiskSegment::HighValueHighRisk);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_rules_validation() {
        let mut rules = ScoringRules::default();
        assert!(rules.validate().is_ok());

        rules.high_value_cltv = f64::NAN;
        assert!(rules.validate().is_err());

        rules = ScoringRules::default();
        rules.churn_score_decay = -1.0;
        assert!(rules.validate().is_err());

        rules = ScoringRules::default();
        rules.churn_score_decay = 0.0;
        assert!(rules.validate().is_ok());
    }

    proptest! {
        #[test]
        fn prop_tenure_group_matches_bounds(t in 0u32..10_000) {
            let expected = if t <= 12 {
                TenureGroup::UpToTwelve
            } else if t <= 24 {
                TenureGroup::ThirteenToTwentyFour
            } else {
                TenureGroup::TwentyFivePlus
            };
            prop_assert_eq!(classify_tenure(t), expected);
        }

        #[test]
        fn prop_non_churners_score_zero(t in any::<u32>()) {
            prop_assert_eq!(compute_churn_score(0, t), 0.0);
        }

        #[test]
        fn prop_churner_score_decreases_with_tenure(t in 0u32..10_000) {
            prop_assert!(compute_churn_score(1, t + 1) < compute_churn_score(1, t));
        }

        #[test]
        fn prop_segment_tiers_are_independent(cltv in 0.0f64..10_000.0, score in -200.0f64..100.0) {
            let segment = classify_risk_segment(cltv, score);
            prop_assert_eq!(segment.is_high_value(), cltv > 2000.0);
            prop_assert_eq!(segment.is_high_risk(), score > 60.0);
        }
    }
}
