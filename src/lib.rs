//! Churn Risk Engine Library
//!
//! Scores telecom customer batches: churn flag, lifetime value, tenure group,
//! churn score and risk segment per customer, plus batch KPIs for the dashboard.

pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod publisher;
pub mod reader;
pub mod report;
pub mod scoring;
pub mod types;
pub mod writer;

pub use config::AppConfig;
pub use error::ValidationError;
pub use scoring::{
    classify_risk_segment, classify_tenure, compute_churn_score, compute_cltv, summarize_batch,
    RiskScoringEngine,
};
pub use types::{
    AtRiskBasis, BatchSummary, ChurnLabel, CustomerRecord, RiskSegment, ScoredRecord,
    TenureGroup,
};
