use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use hearth_core::savings::{
    compare_scenarios, generate_yearly_breakdown, validate_scenario_details, ScenarioDetails,
    YearlyValue,
};
use hearth_core::time_value::future_value;
use hearth_core::types::round_cents;
use hearth_core::with_metadata;

use crate::commands::region::JurisdictionArgs;
use crate::input;

#[derive(Args)]
pub struct FutureValueArgs {
    /// Lump sum invested today
    #[arg(long, default_value = "0")]
    pub principal: Decimal,

    /// Amount added at the end of every month
    #[arg(long, default_value = "0")]
    pub monthly: Decimal,

    /// Annual return in percent, compounded monthly
    #[arg(long)]
    pub rate: Decimal,

    /// Number of years
    #[arg(long)]
    pub years: u32,
}

#[derive(Args)]
pub struct SavingsArgs {
    /// Path to a JSON or YAML file with `scenario_a` and `scenario_b`
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub jurisdiction: JurisdictionArgs,
}

#[derive(Deserialize)]
struct SavingsInput {
    scenario_a: ScenarioDetails,
    scenario_b: ScenarioDetails,
}

#[derive(Serialize)]
struct FutureValueReport {
    future_value: Decimal,
    total_contributed: Decimal,
    total_growth: Decimal,
    yearly: Vec<YearlyValue>,
}

pub fn run_future_value(args: FutureValueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let plan = ScenarioDetails {
        label: "plan".into(),
        initial_amount: args.principal,
        monthly_amount: args.monthly,
        return_rate: args.rate,
        time_horizon: args.years,
    };
    if let Some(issue) = validate_scenario_details(&plan).into_iter().find(|i| i.is_error()) {
        return Err(issue.message.into());
    }

    let fv = round_cents(future_value(args.principal, args.monthly, args.rate, args.years)?);
    let yearly = generate_yearly_breakdown(&plan)?;
    let contributed = yearly
        .last()
        .map(|y| y.total_contributed)
        .unwrap_or_default();
    let report = FutureValueReport {
        future_value: fv,
        total_contributed: contributed,
        total_growth: fv - contributed,
        yearly,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Future value with monthly compounding and end-of-month contributions",
        &serde_json::json!({
            "principal": args.principal.to_string(),
            "monthly": args.monthly.to_string(),
            "annual_rate_pct": args.rate.to_string(),
            "years": args.years,
        }),
        Vec::new(),
        elapsed,
        report,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_savings(args: SavingsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let config = args.jurisdiction.load()?;

    let input: SavingsInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for savings comparison".into());
    };

    let problems: Vec<String> = [("scenario_a", &input.scenario_a), ("scenario_b", &input.scenario_b)]
        .iter()
        .flat_map(|(name, s)| {
            validate_scenario_details(s)
                .into_iter()
                .filter(|i| i.is_error())
                .map(move |i| format!("{name}.{}: {}", i.field, i.message))
        })
        .collect();
    if !problems.is_empty() {
        return Err(problems.join("; ").into());
    }

    let comparison = compare_scenarios(&input.scenario_a, &input.scenario_b, &config.currency)?;

    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "Side-by-side savings plans, monthly compounding",
        &serde_json::json!({
            "currency": config.currency.code,
            "scenario_a": input.scenario_a.label,
            "scenario_b": input.scenario_b.label,
        }),
        Vec::new(),
        elapsed,
        comparison,
    );
    Ok(serde_json::to_value(output)?)
}
