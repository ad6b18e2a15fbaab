//! Reduction of a scored batch into dashboard KPIs

use crate::types::scored::{RiskSegment, ScoredRecord, TenureGroup};
use crate::types::summary::{AtRiskBasis, BatchSummary, SegmentBreakdown, TenureGroupCount};

/// Summarize a scored batch.
///
/// Pure fold over `records`: counts and dollar totals per segment, customers
/// per tenure group, and "at risk" totals under `basis`.
pub fn summarize_batch(records: &[ScoredRecord], basis: AtRiskBasis) -> BatchSummary {
    let mut segments: Vec<SegmentBreakdown> = RiskSegment::ALL
        .iter()
        .map(|&segment| SegmentBreakdown {
            segment,
            customers: 0,
            lifetime_value: 0.0,
            monthly_revenue: 0.0,
        })
        .collect();
    let mut tenure_groups: Vec<TenureGroupCount> = TenureGroup::ALL
        .iter()
        .map(|&tenure_group| TenureGroupCount {
            tenure_group,
            customers: 0,
        })
        .collect();

    let mut churned_customers = 0;
    let mut total_lifetime_value = 0.0;
    let mut total_monthly_revenue = 0.0;
    let mut at_risk_customers = 0;
    let mut total_cltv_at_risk = 0.0;
    let mut total_monthly_revenue_at_risk = 0.0;

    for record in records {
        let charges = record.customer.monthly_charges;

        if record.is_churned() {
            churned_customers += 1;
        }
        total_lifetime_value += record.lifetime_value;
        total_monthly_revenue += charges;

        if basis.includes(record) {
            at_risk_customers += 1;
            total_cltv_at_risk += record.lifetime_value;
            total_monthly_revenue_at_risk += charges;
        }

        if let Some(breakdown) = segments.iter_mut().find(|s| s.segment == record.risk_segment) {
            breakdown.customers += 1;
            breakdown.lifetime_value += record.lifetime_value;
            breakdown.monthly_revenue += charges;
        }
        if let Some(group) = tenure_groups
            .iter_mut()
            .find(|g| g.tenure_group == record.tenure_group)
        {
            group.customers += 1;
        }
    }

    let churn_rate = if records.is_empty() {
        0.0
    } else {
        churned_customers as f64 / records.len() as f64
    };

    BatchSummary {
        total_customers: records.len(),
        churned_customers,
        churn_rate,
        total_lifetime_value,
        total_monthly_revenue,
        at_risk_basis: basis,
        at_risk_customers,
        total_cltv_at_risk,
        total_monthly_revenue_at_risk,
        segments,
        tenure_groups,
    }
}
