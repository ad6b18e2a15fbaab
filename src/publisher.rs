//! NATS publisher for batch summaries consumed by the KPI dashboard

use crate::types::summary::SummaryRecord;
use anyhow::Result;
use async_nats::Client;
use tracing::debug;

/// Publishes batch summaries to a NATS subject
#[derive(Clone)]
pub struct SummaryPublisher {
    client: Client,
    subject: String,
}

impl SummaryPublisher {
    pub fn new(client: Client, subject: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
        }
    }

    /// Connect to a NATS server and bind to `subject`
    pub async fn connect(url: &str, subject: &str) -> Result<Self> {
        let client = async_nats::connect(url).await?;
        Ok(Self::new(client, subject))
    }

    /// Publish a summary and wait until the server has it
    pub async fn publish(&self, summary: &SummaryRecord) -> Result<()> {
        let payload = payload(summary)?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await?;
        self.client.flush().await?;

        debug!(
            batch_id = %summary.batch_id,
            subject = %self.subject,
            at_risk_customers = summary.summary.at_risk_customers,
            "Published batch summary"
        );

        Ok(())
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

/// Message body for a summary: the flat JSON object the dashboard reads
pub fn payload(summary: &SummaryRecord) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(summary)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::engine::RiskScoringEngine;
    use crate::types::customer::{ChurnLabel, CustomerRecord};
    use crate::types::summary::AtRiskBasis;

    #[test]
    fn test_payload_is_flat_summary() {
        let batch = RiskScoringEngine::default()
            .run(&[
                CustomerRecord::new("c1", 6, 80.0, ChurnLabel::Yes),
                CustomerRecord::new("c2", 50, 120.0, ChurnLabel::No),
            ])
            .unwrap();
        let record = SummaryRecord::new("customers.csv", batch.summary);

        let bytes = payload(&record).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        // KPI fields sit beside the envelope, not under a nested key
        assert_eq!(json["batch_id"], record.batch_id.as_str());
        assert_eq!(json["source"], "customers.csv");
        assert_eq!(json["total_customers"], 2);
        assert_eq!(json["churned_customers"], 1);
        assert_eq!(json["total_cltv_at_risk"], 480.0);
        assert_eq!(
            json["at_risk_basis"],
            serde_json::to_value(AtRiskBasis::Churned).unwrap()
        );
        assert!(json.get("summary").is_none());

        let decoded: SummaryRecord = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded.summary, record.summary);
    }
}
