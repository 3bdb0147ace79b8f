use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use hearth_core::mortgage::amortization::{
    generate_amortization_schedule, summarize_schedule, yearly_totals, AmortizationRow,
    AmortizationYear, ScheduleSummary,
};
use hearth_core::with_metadata;

#[derive(Args)]
pub struct AmortizationArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Decimal,

    /// Annual interest rate in percent (e.g. 6.5)
    #[arg(long)]
    pub rate: Decimal,

    /// Loan term in years
    #[arg(long)]
    pub years: u32,

    /// Roll the schedule up by year instead of listing every month
    #[arg(long)]
    pub yearly: bool,
}

#[derive(Serialize)]
struct AmortizationReport {
    #[serde(flatten)]
    summary: ScheduleSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    schedule: Option<Vec<AmortizationRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    yearly: Option<Vec<AmortizationYear>>,
}

pub fn run_amortization(args: AmortizationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let schedule = generate_amortization_schedule(args.principal, args.rate, args.years)?;
    let summary = summarize_schedule(&schedule);

    let report = if args.yearly {
        AmortizationReport {
            summary,
            schedule: None,
            yearly: Some(yearly_totals(&schedule)),
        }
    } else {
        AmortizationReport {
            summary,
            schedule: Some(schedule),
            yearly: None,
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Fixed-rate annuity amortization",
        &serde_json::json!({
            "principal": args.principal.to_string(),
            "annual_rate_pct": args.rate.to_string(),
            "years": args.years,
        }),
        Vec::new(),
        elapsed,
        report,
    );
    Ok(serde_json::to_value(output)?)
}
