//! Type definitions for the churn risk engine

pub mod customer;
pub mod scored;
pub mod summary;

pub use customer::{ChurnLabel, CustomerRecord, RawCustomerRow};
pub use scored::{RiskSegment, ScoredRecord, TenureGroup};
pub use summary::{AtRiskBasis, BatchSummary, SegmentBreakdown, SummaryRecord};
