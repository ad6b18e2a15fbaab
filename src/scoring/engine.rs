//! Batch risk scoring engine

use crate::config::AppConfig;
use crate::error::ValidationError;
use crate::scoring::rules::{classify_tenure, compute_cltv, ScoringRules};
use crate::scoring::summary::summarize_batch;
use crate::types::customer::CustomerRecord;
use crate::types::scored::ScoredRecord;
use crate::types::summary::{AtRiskBasis, BatchSummary};
use rayon::prelude::*;
use tracing::debug;

/// Batches smaller than this are scored on the calling thread
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// Output of one engine run
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredBatch {
    /// One entry per input record, in input order
    pub records: Vec<ScoredRecord>,
    pub summary: BatchSummary,
}

/// Stateless scorer for customer batches.
///
/// Holds only configuration, so the same engine can score any number of
/// batches, from any number of threads, with identical results.
#[derive(Debug, Clone)]
pub struct RiskScoringEngine {
    rules: ScoringRules,
    at_risk: AtRiskBasis,
    parallel_threshold: usize,
}

impl RiskScoringEngine {
    pub fn new(rules: ScoringRules, at_risk: AtRiskBasis) -> Self {
        Self {
            rules,
            at_risk,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Create an engine from application configuration
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.scoring.clone(), config.summary.at_risk)
            .with_parallel_threshold(config.pipeline.parallel_threshold)
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn at_risk_basis(&self) -> AtRiskBasis {
        self.at_risk
    }

    /// Derive the five scored fields for one customer
    pub fn score(&self, customer: &CustomerRecord) -> ScoredRecord {
        let churn_flag = customer.churn_flag();
        let lifetime_value = compute_cltv(customer.monthly_charges, customer.tenure);
        let churn_score = self.rules.churn_score(churn_flag, customer.tenure);

        ScoredRecord {
            customer: customer.clone(),
            churn_flag,
            lifetime_value,
            tenure_group: classify_tenure(customer.tenure),
            churn_score,
            risk_segment: self.rules.risk_segment(lifetime_value, churn_score),
        }
    }

    /// Score a batch, preserving order.
    ///
    /// Every record is validated before any is scored; the first invalid
    /// record (by position) fails the whole batch.
    pub fn score_batch(
        &self,
        customers: &[CustomerRecord],
    ) -> Result<Vec<ScoredRecord>, ValidationError> {
        for (idx, customer) in customers.iter().enumerate() {
            customer.validate(idx + 1)?;
        }

        let parallel = customers.len() >= self.parallel_threshold;
        debug!(
            records = customers.len(),
            parallel = parallel,
            "Scoring batch"
        );

        let scored: Vec<ScoredRecord> = if parallel {
            customers.par_iter().map(|c| self.score(c)).collect()
        } else {
            customers.iter().map(|c| self.score(c)).collect()
        };
        Ok(scored)
    }

    /// Summarize an already scored batch with this engine's at-risk basis
    pub fn summarize(&self, records: &[ScoredRecord]) -> BatchSummary {
        summarize_batch(records, self.at_risk)
    }

    /// Score a batch and reduce it into its summary
    pub fn run(&self, customers: &[CustomerRecord]) -> Result<ScoredBatch, ValidationError> {
        let records = self.score_batch(customers)?;
        let summary = self.summarize(&records);
        Ok(ScoredBatch { records, summary })
    }
}

impl Default for RiskScoringEngine {
    fn default() -> Self {
        Self::new(ScoringRules::default(), AtRiskBasis::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::customer::ChurnLabel;
    use crate::types::scored::{RiskSegment, TenureGroup};

    fn four_customers() -> Vec<CustomerRecord> {
        vec![
            CustomerRecord::new("c1", 6, 80.0, ChurnLabel::Yes),
            CustomerRecord::new("c2", 18, 90.0, ChurnLabel::No),
            CustomerRecord::new("c3", 30, 40.0, ChurnLabel::Yes),
            CustomerRecord::new("c4", 50, 120.0, ChurnLabel::No),
        ]
    }

    #[test]
    fn test_four_customer_batch() {
        let engine = RiskScoringEngine::default();
        let batch = engine.run(&four_customers()).unwrap();

        let flags: Vec<u8> = batch.records.iter().map(|r| r.churn_flag).collect();
        let cltvs: Vec<f64> = batch.records.iter().map(|r| r.lifetime_value).collect();
        let groups: Vec<&str> = batch.records.iter().map(|r| r.tenure_group.label()).collect();
        let scores: Vec<f64> = batch.records.iter().map(|r| r.churn_score).collect();
        let segments: Vec<RiskSegment> = batch.records.iter().map(|r| r.risk_segment).collect();

        assert_eq!(flags, vec![1, 0, 1, 0]);
        assert_eq!(cltvs, vec![480.0, 1620.0, 1200.0, 6000.0]);
        assert_eq!(groups, vec!["0-12", "13-24", "25+", "25+"]);
        assert_eq!(scores, vec![91.0, 0.0, 55.0, 0.0]);
        assert_eq!(
            segments,
            vec![
                RiskSegment::LowValueHighRisk,
                RiskSegment::LowValueLowRisk,
                RiskSegment::LowValueLowRisk,
                RiskSegment::HighValueLowRisk,
            ]
        );

        let summary = &batch.summary;
        assert_eq!(summary.total_customers, 4);
        assert_eq!(summary.churned_customers, 2);
        assert_eq!(summary.total_cltv_at_risk, 1680.0);
        assert_eq!(summary.total_monthly_revenue_at_risk, 120.0);
        assert_eq!(summary.segment_count(RiskSegment::LowValueLowRisk), 2);
        assert_eq!(summary.segment_count(RiskSegment::HighValueHighRisk), 0);
        assert_eq!(summary.tenure_group_count(TenureGroup::TwentyFivePlus), 2);
    }

    #[test]
    fn test_pass_through_fields_kept() {
        let mut customer = CustomerRecord::new("c1", 3, 20.0, ChurnLabel::Yes);
        customer.payment_method = Some("Electronic check".to_string());
        customer.churn_reason = Some("Competitor offered more data".to_string());

        let scored = RiskScoringEngine::default().score(&customer);
        assert_eq!(scored.customer, customer);
    }

    #[test]
    fn test_run_is_idempotent() {
        let engine = RiskScoringEngine::default();
        let customers = four_customers();

        let first = engine.run(&customers).unwrap();
        let second = engine.run(&customers).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let customers: Vec<CustomerRecord> = (0..500u32)
            .map(|i| {
                CustomerRecord::new(
                    format!("c{}", i),
                    i % 73,
                    f64::from(i % 120) + 18.25,
                    ChurnLabel::from(i % 3 == 0),
                )
            })
            .collect();

        let sequential = RiskScoringEngine::default()
            .with_parallel_threshold(usize::MAX)
            .score_batch(&customers)
            .unwrap();
        let parallel = RiskScoringEngine::default()
            .with_parallel_threshold(0)
            .score_batch(&customers)
            .unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(parallel.len(), customers.len());
        for (scored, customer) in parallel.iter().zip(&customers) {
            assert_eq!(scored.customer.customer_id, customer.customer_id);
        }
    }

    #[test]
    fn test_invalid_record_fails_batch() {
        let mut customers = four_customers();
        customers[2].monthly_charges = -5.0;

        let err = RiskScoringEngine::default().run(&customers).unwrap_err();
        assert_eq!(err.row(), 3);
        assert_eq!(err.field(), "monthly_charges");
    }

    #[test]
    fn test_oversized_charges_rejected() {
        let mut customers = four_customers();
        customers.push(CustomerRecord::new("c5", 2, 1e308, ChurnLabel::No));

        let err = RiskScoringEngine::default().run(&customers).unwrap_err();
        assert_eq!(err.row(), 5);
        assert_eq!(err.field(), "monthly_charges");
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn test_high_risk_basis_engine() {
        let engine = RiskScoringEngine::new(ScoringRules::default(), AtRiskBasis::HighRisk);
        let batch = engine.run(&four_customers()).unwrap();

        // Only c1 lands in a High-Risk segment
        assert_eq!(batch.summary.at_risk_customers, 1);
        assert_eq!(batch.summary.total_cltv_at_risk, 480.0);
    }

    #[test]
    fn test_empty_batch() {
        let batch = RiskScoringEngine::default().run(&[]).unwrap();
        assert!(batch.records.is_empty());
        assert_eq!(batch.summary.total_customers, 0);
    }
}
