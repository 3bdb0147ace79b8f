use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use hearth_core::comparison::engine::run_comparison;
use hearth_core::jurisdiction::JurisdictionConfig;
use hearth_core::validation::{has_errors, validate, Severity};
use hearth_core::BuyVsRentInputs;

use crate::commands::region::{JurisdictionArgs, ModelingArgs};
use crate::input;

/// Scenario inputs: a file, stdin, or the region defaults, with any flags
/// layered on top.
#[derive(Args, Debug, Clone)]
pub struct ScenarioArgs {
    /// Path to a JSON or YAML file with the full scenario
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Down payment as a percentage of price (e.g. 10)
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual mortgage rate in percent (e.g. 11.75)
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub loan_term: Option<u32>,

    /// Annual home appreciation in percent
    #[arg(long)]
    pub appreciation: Option<Decimal>,

    /// Monthly rent for an equivalent home
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Annual rent increase in percent
    #[arg(long)]
    pub rent_increase: Option<Decimal>,

    /// Annual investment return in percent
    #[arg(long)]
    pub investment_return: Option<Decimal>,

    /// Time horizon in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Re-estimate closing costs from the jurisdiction's fee rules
    #[arg(long)]
    pub estimate_closing_costs: bool,
}

#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    #[command(flatten)]
    pub jurisdiction: JurisdictionArgs,

    #[command(flatten)]
    pub modeling: ModelingArgs,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    #[command(flatten)]
    pub jurisdiction: JurisdictionArgs,
}

impl ScenarioArgs {
    pub fn load(
        &self,
        config: &JurisdictionConfig,
    ) -> Result<BuyVsRentInputs, Box<dyn std::error::Error>> {
        let (mut inputs, from_defaults): (BuyVsRentInputs, bool) =
            if let Some(ref path) = self.input {
                (input::file::read_document(path)?, false)
            } else if let Some(data) = input::stdin::read_stdin()? {
                (serde_json::from_value(data)?, false)
            } else {
                (config.default_inputs(), true)
            };

        if let Some(v) = self.home_price {
            inputs.buy.home_price = v;
        }
        if let Some(v) = self.down_payment {
            inputs.buy.down_payment_percent = v;
        }
        if let Some(v) = self.interest_rate {
            inputs.buy.interest_rate = v;
        }
        if let Some(v) = self.loan_term {
            inputs.buy.loan_term_years = v;
        }
        if let Some(v) = self.appreciation {
            inputs.buy.appreciation_rate = v;
        }
        if let Some(v) = self.rent {
            inputs.rent.monthly_rent = v;
        }
        if let Some(v) = self.rent_increase {
            inputs.rent.rent_increase_rate = v;
        }
        if let Some(v) = self.investment_return {
            inputs.investment_return_rate = v;
        }
        if let Some(v) = self.years {
            inputs.time_horizon_years = v;
        }

        // Default closing costs were estimated for the default price.
        let price_changed = self.home_price.is_some() || self.down_payment.is_some();
        if self.estimate_closing_costs || (from_defaults && price_changed) {
            inputs.buy = inputs.buy.with_estimated_closing_costs(&config.closing_costs);
        }
        Ok(inputs)
    }
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = args.modeling.apply(args.jurisdiction.load()?);
    let inputs = args.scenario.load(&config)?;
    let result = run_comparison(&inputs, &config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = args.jurisdiction.load()?;
    let inputs = args.scenario.load(&config)?;
    let issues = validate(&inputs, &config);

    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    Ok(json!({
        "result": {
            "valid": !has_errors(&issues),
            "errors": errors,
            "warnings": issues.len() - errors,
            "region": config.code,
            "issues": issues,
        }
    }))
}
