//! Run report: stage timings and a KPI table for the logs

use crate::types::summary::BatchSummary;
use std::time::Duration;
use tracing::info;

/// Wall-clock time spent in each stage of a run
#[derive(Debug, Default, Clone, Copy)]
pub struct RunTimings {
    pub read: Duration,
    pub validate: Duration,
    pub score: Duration,
    pub write: Duration,
}

impl RunTimings {
    pub fn total(&self) -> Duration {
        self.read + self.validate + self.score + self.write
    }

    /// Scored customers per second over the scoring stage
    pub fn throughput(&self, customers: usize) -> f64 {
        let secs = self.score.as_secs_f64();
        if secs > 0.0 {
            customers as f64 / secs
        } else {
            0.0
        }
    }
}

fn pct(part: usize, whole: usize) -> f64 {
    if whole > 0 {
        (part as f64 / whole as f64) * 100.0
    } else {
        0.0
    }
}

/// Width of the text between the box borders
const INNER: usize = 72;

fn border(left: char, right: char) -> String {
    format!("{}{}{}", left, "═".repeat(INNER + 2), right)
}

/// Pad `content` to the box width and close the row
fn boxed(content: &str) -> String {
    format!("║ {:<width$} ║", content, width = INNER)
}

/// Log the batch KPIs and timings
pub fn print_summary(summary: &BatchSummary, rejected: usize, timings: &RunTimings) {
    let total = summary.total_customers;

    info!("{}", border('╔', '╗'));
    info!(
        "{}",
        boxed(&format!(
            "{:^width$}",
            "CHURN RISK ENGINE - BATCH SUMMARY",
            width = INNER
        ))
    );
    info!("{}", border('╠', '╣'));
    info!(
        "{}",
        boxed(&format!(
            "Customers Scored: {:>8}  │  Rejected Rows: {:>8}",
            total, rejected
        ))
    );
    info!(
        "{}",
        boxed(&format!(
            "Churned:          {:>8}  │  Churn Rate:    {:>7.1}%",
            summary.churned_customers,
            summary.churn_rate * 100.0
        ))
    );
    info!(
        "{}",
        boxed(&format!(
            "Total CLTV: ${:>14.2}  │  Monthly Revenue: ${:>14.2}",
            summary.total_lifetime_value, summary.total_monthly_revenue
        ))
    );
    info!("{}", border('╠', '╣'));
    info!(
        "{}",
        boxed(&format!(
            "At Risk ({}): {:>8} customers",
            summary.at_risk_basis, summary.at_risk_customers
        ))
    );
    info!(
        "{}",
        boxed(&format!(
            "  CLTV at risk:            ${:>14.2}",
            summary.total_cltv_at_risk
        ))
    );
    info!(
        "{}",
        boxed(&format!(
            "  Monthly revenue at risk: ${:>14.2}",
            summary.total_monthly_revenue_at_risk
        ))
    );
    info!("{}", border('╠', '╣'));
    info!("{}", boxed("Risk Segments:"));
    for segment in &summary.segments {
        let share = pct(segment.customers, total);
        let bar: String = "█".repeat(((share / 10.0) as usize).min(10));
        info!(
            "{}",
            boxed(&format!(
                "  {:<22} {:>8} ({:>5.1}%) ${:>14.2} {}",
                segment.segment.label(),
                segment.customers,
                share,
                segment.lifetime_value,
                bar
            ))
        );
    }
    info!("{}", border('╠', '╣'));
    info!("{}", boxed("Tenure Groups:"));
    for group in &summary.tenure_groups {
        info!(
            "{}",
            boxed(&format!(
                "  {:<6} {:>8} ({:>5.1}%)",
                group.tenure_group.label(),
                group.customers,
                pct(group.customers, total)
            ))
        );
    }
    info!("{}", border('╠', '╣'));
    info!(
        "{}",
        boxed(&format!(
            "Timings (ms): read={:>6} validate={:>6} score={:>6} write={:>6}",
            timings.read.as_millis(),
            timings.validate.as_millis(),
            timings.score.as_millis(),
            timings.write.as_millis()
        ))
    );
    info!(
        "{}",
        boxed(&format!(
            "Throughput: {:>12.1} customers/s   Total: {:>8} ms",
            timings.throughput(total),
            timings.total().as_millis()
        ))
    );
    info!("{}", border('╚', '╝'));
}
