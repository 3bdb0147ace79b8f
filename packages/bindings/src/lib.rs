use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use hearth_core::jurisdiction::{JurisdictionConfig, Region};
use hearth_core::mortgage::amortization::{
    calculate_monthly_payment, generate_amortization_schedule, summarize_schedule,
};
use hearth_core::types::round_cents;
use hearth_core::BuyVsRentInputs;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Resolve the jurisdiction for a call: a custom config JSON when one is
/// given, otherwise the built-in preset for the region code.
fn load_region(region: &str, config_json: Option<&str>) -> NapiResult<JurisdictionConfig> {
    match config_json {
        Some(json) => JurisdictionConfig::from_json(json).map_err(to_napi_error),
        None => region
            .parse::<Region>()
            .map(|r| r.config())
            .map_err(to_napi_error),
    }
}

// ---------------------------------------------------------------------------
// Jurisdictions
// ---------------------------------------------------------------------------

#[napi]
pub fn jurisdiction_config(region: String, config_json: Option<String>) -> NapiResult<String> {
    let config = load_region(&region, config_json.as_deref())?;
    serde_json::to_string(&config).map_err(to_napi_error)
}

#[napi]
pub fn default_inputs(region: String, config_json: Option<String>) -> NapiResult<String> {
    let config = load_region(&region, config_json.as_deref())?;
    serde_json::to_string(&config.default_inputs()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Buy vs rent
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_buy_vs_rent(
    input_json: String,
    region: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    let config = load_region(&region, config_json.as_deref())?;
    let input: BuyVsRentInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        hearth_core::comparison::engine::run_comparison(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Returns every issue found, errors and warnings alike; an empty array means
/// the inputs can be projected.
#[napi]
pub fn validate_inputs(
    input_json: String,
    region: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    let config = load_region(&region, config_json.as_deref())?;
    let input: BuyVsRentInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let issues = hearth_core::validation::validate(&input, &config);
    serde_json::to_string(&issues).map_err(to_napi_error)
}

#[napi]
pub fn sensitivity_analysis(
    input_json: String,
    region: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    let config = load_region(&region, config_json.as_deref())?;
    let input: hearth_core::comparison::sensitivity::SensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = hearth_core::comparison::sensitivity::run_sensitivity(&input, &config)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Purchase costs and mortgages
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PurchaseFeesInput {
    price: Decimal,
    loan_amount: Decimal,
}

#[napi]
pub fn purchase_fees(
    input_json: String,
    region: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    let config = load_region(&region, config_json.as_deref())?;
    let input: PurchaseFeesInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let fees = config.closing_costs.estimate(input.price, input.loan_amount);
    serde_json::to_string(&fees).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct LoanInput {
    principal: Decimal,
    annual_rate: Decimal,
    years: u32,
}

#[napi]
pub fn monthly_payment(input_json: String) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let payment = calculate_monthly_payment(input.principal, input.annual_rate, input.years)
        .map_err(to_napi_error)?;
    serde_json::to_string(&payment).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let schedule = generate_amortization_schedule(input.principal, input.annual_rate, input.years)
        .map_err(to_napi_error)?;
    let summary = summarize_schedule(&schedule);
    serde_json::to_string(&serde_json::json!({
        "summary": summary,
        "schedule": schedule,
    }))
    .map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Savings
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct FutureValueInput {
    principal: Decimal,
    monthly_contribution: Decimal,
    annual_rate: Decimal,
    years: u32,
}

#[napi]
pub fn future_value(input_json: String) -> NapiResult<String> {
    let input: FutureValueInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let value = hearth_core::time_value::future_value(
        input.principal,
        input.monthly_contribution,
        input.annual_rate,
        input.years,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&round_cents(value)).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct SavingsInput {
    scenario_a: hearth_core::savings::ScenarioDetails,
    scenario_b: hearth_core::savings::ScenarioDetails,
}

#[napi]
pub fn compare_savings(
    input_json: String,
    region: String,
    config_json: Option<String>,
) -> NapiResult<String> {
    let config = load_region(&region, config_json.as_deref())?;
    let input: SavingsInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let comparison = hearth_core::savings::compare_scenarios(
        &input.scenario_a,
        &input.scenario_b,
        &config.currency,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&comparison).map_err(to_napi_error)
}
