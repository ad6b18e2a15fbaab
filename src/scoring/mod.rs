//! Risk scoring: per-customer rules, the batch engine and batch summaries

pub mod engine;
pub mod rules;
pub mod summary;

pub use engine::{RiskScoringEngine, ScoredBatch};
pub use rules::{
    classify_risk_segment, classify_tenure, compute_churn_score, compute_cltv, ScoringRules,
};
pub use summary::summarize_batch;
