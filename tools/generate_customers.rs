//! Synthetic Customer Generator
//!
//! Writes a Telco-style customer CSV for local runs of the churn risk engine.

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Generate a synthetic customer extract
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output CSV path
    #[arg(short, long, default_value = "data/synthetic_customers.csv")]
    output: PathBuf,

    /// Number of customers to generate
    #[arg(short = 'n', long, default_value = "1000")]
    count: u64,

    /// Fraction of customers that churned
    #[arg(long, default_value = "0.27")]
    churn_rate: f64,

    /// Fraction of rows with a deliberately malformed field
    #[arg(long, default_value = "0.0")]
    invalid_rate: f64,

    /// RNG seed for reproducible extracts
    #[arg(long)]
    seed: Option<u64>,
}

/// Row layout of the Telco churn extract
#[derive(Debug, Serialize)]
struct CustomerRow {
    #[serde(rename = "CustomerID")]
    customer_id: String,
    #[serde(rename = "Gender")]
    gender: &'static str,
    #[serde(rename = "City")]
    city: &'static str,
    #[serde(rename = "Tenure Months")]
    tenure: String,
    #[serde(rename = "Payment Method")]
    payment_method: &'static str,
    #[serde(rename = "Monthly Charges")]
    monthly_charges: String,
    #[serde(rename = "Churn Label")]
    churn_label: &'static str,
    #[serde(rename = "Churn Reason")]
    churn_reason: &'static str,
}

struct CustomerGenerator {
    rng: StdRng,
    customer_counter: u64,
}

impl CustomerGenerator {
    fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            customer_counter: 0,
        }
    }

    fn next_id(&mut self) -> String {
        self.customer_counter += 1;
        let suffix: String = (0..5)
            .map(|_| char::from(self.rng.gen_range(b'A'..=b'Z')))
            .collect();
        format!("{:04}-{}", self.customer_counter % 10_000, suffix)
    }

    /// Retained customer: longer tenure, no churn reason
    fn generate_retained(&mut self) -> CustomerRow {
        let tenure = self.rng.gen_range(1..=72u32);
        CustomerRow {
            customer_id: self.next_id(),
            gender: self.random_choice(&["Male", "Female"]),
            city: self.random_choice(&["Los Angeles", "San Diego", "San Jose", "Fresno", "Sacramento"]),
            tenure: tenure.to_string(),
            payment_method: self.random_choice(&[
                "Bank transfer (automatic)",
                "Credit card (automatic)",
                "Mailed check",
                "Electronic check",
            ]),
            monthly_charges: format!("{:.2}", self.rng.gen_range(18.25..118.75)),
            churn_label: "No",
            churn_reason: "",
        }
    }

    /// Churned customer: skewed toward short tenure and higher charges
    fn generate_churned(&mut self) -> CustomerRow {
        let tenure = if self.rng.gen_bool(0.7) {
            self.rng.gen_range(1..=12u32)
        } else {
            self.rng.gen_range(13..=72u32)
        };
        CustomerRow {
            customer_id: self.next_id(),
            gender: self.random_choice(&["Male", "Female"]),
            city: self.random_choice(&["Los Angeles", "San Diego", "San Jose", "Fresno", "Sacramento"]),
            tenure: tenure.to_string(),
            payment_method: self.random_choice(&["Electronic check", "Mailed check"]),
            monthly_charges: format!("{:.2}", self.rng.gen_range(45.0..118.75)),
            churn_label: "Yes",
            churn_reason: self.random_choice(&[
                "Competitor made better offer",
                "Competitor had better devices",
                "Attitude of support person",
                "Moved",
                "Price too high",
                "Network reliability",
            ]),
        }
    }

    /// Break one scoring field so the row fails validation
    fn corrupt(&mut self, mut row: CustomerRow) -> CustomerRow {
        match self.rng.gen_range(0..4) {
            0 => row.tenure = "-3".to_string(),
            1 => row.tenure = "unknown".to_string(),
            2 => row.monthly_charges = String::new(),
            _ => row.churn_label = "Maybe",
        }
        row
    }

    fn random_choice(&mut self, choices: &[&'static str]) -> &'static str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("generate_customers=info".parse()?),
        )
        .init();

    let args = Args::parse();
    if !(0.0..=1.0).contains(&args.churn_rate) || !(0.0..=1.0).contains(&args.invalid_rate) {
        anyhow::bail!("--churn-rate and --invalid-rate must be between 0 and 1");
    }

    info!(
        output = %args.output.display(),
        count = args.count,
        churn_rate = args.churn_rate,
        invalid_rate = args.invalid_rate,
        "Generating synthetic customers"
    );

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create {:?}", args.output))?;

    let mut generator = CustomerGenerator::new(args.seed);
    let mut churned_count = 0;
    let mut invalid_count = 0;

    for i in 0..args.count {
        let mut row = if generator.rng.gen_bool(args.churn_rate) {
            churned_count += 1;
            generator.generate_churned()
        } else {
            generator.generate_retained()
        };
        if generator.rng.gen_bool(args.invalid_rate) {
            invalid_count += 1;
            row = generator.corrupt(row);
        }

        writer.serialize(&row)?;

        if (i + 1) % 10_000 == 0 {
            info!("Generated {}/{} customers", i + 1, args.count);
        }
    }
    writer.flush()?;

    info!(
        "Completed! Wrote {} customers ({} churned, {} invalid)",
        args.count, churned_count, invalid_count
    );

    Ok(())
}
