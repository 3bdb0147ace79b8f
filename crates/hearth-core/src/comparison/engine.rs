use std::fmt;
use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::comparison::break_even::find_break_even_year;
use crate::costs::buying::{compute_buying_costs_with_schedule, BuyingCosts};
use crate::costs::renting::{compute_renting_costs, RentingCosts};
use crate::error::HearthError;
use crate::formatting::format_currency;
use crate::inputs::BuyVsRentInputs;
use crate::jurisdiction::JurisdictionConfig;
use crate::mortgage::amortization::{
    calculate_monthly_payment, generate_amortization_schedule, remaining_balance_after,
};
use crate::time_value::{annual_rate, compound, future_value};
use crate::types::{
    checked_product, checked_total, round_cents, with_metadata, ComputationOutput, CostBasis,
    Money, Percent,
};
use crate::validation::validate;
use crate::HearthResult;

const MAX_HORIZON_YEARS: u32 = 50;
const MAX_LOAN_TERM_YEARS: u32 = 50;
/// 10^15: far above any real purchase price or rent.
const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Owner's position at the end of one projection year. Year 0 is the moment
/// of purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyYearlyBreakdown {
    pub year: u32,
    pub home_value: Money,
    pub mortgage_balance: Money,
    pub equity: Money,
    pub down_payment: Money,
    pub closing_costs: Money,
    pub mortgage_payment: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub property_tax: Money,
    pub insurance: Money,
    pub hoa: Money,
    pub maintenance: Money,
    pub total_cost: Money,
    /// All cash paid out since purchase, principal included
    pub cumulative_cost: Money,
    /// Cumulative cost with principal excluded, the basis compared with rent
    pub cumulative_cost_excluding_principal: Money,
    /// Monthly amount invested this year because owning was cheaper
    pub monthly_savings_invested: Money,
    pub investment_balance: Money,
    pub net_worth: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentYearlyBreakdown {
    pub year: u32,
    pub monthly_rent: Money,
    pub annual_rent: Money,
    pub renters_insurance: Money,
    pub total_cost: Money,
    pub cumulative_cost: Money,
    /// Monthly amount invested this year because renting was cheaper
    pub monthly_savings_invested: Money,
    pub investment_balance: Money,
    pub net_worth: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetterChoice {
    Buy,
    Rent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyVsRentResults {
    pub buy_breakdown: Vec<BuyYearlyBreakdown>,
    pub rent_breakdown: Vec<RentYearlyBreakdown>,
    /// Last year in which the net-worth series cross
    pub break_even_year: Option<u32>,
    pub final_buy_net_worth: Money,
    pub final_rent_net_worth: Money,
    /// Rent minus buy; positive when renting comes out ahead
    pub difference: Money,
    pub better_choice: BetterChoice,
    pub summary: String,
}

impl fmt::Display for BetterChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetterChoice::Buy => f.write_str("buy"),
            BetterChoice::Rent => f.write_str("rent"),
        }
    }
}

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

fn invalid(field: &str, reason: &str) -> HearthError {
    HearthError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

fn check_percent(field: &str, label: &str, value: Percent, min: Decimal) -> HearthResult<()> {
    if value < min || value > Decimal::ONE_HUNDRED {
        return Err(invalid(
            field,
            &format!("{label} must be between {min}% and 100%"),
        ));
    }
    Ok(())
}

fn check_cost_basis(field: &str, label: &str, basis: CostBasis) -> HearthResult<()> {
    match basis {
        CostBasis::RateOfValue(pct) => check_percent(field, label, pct, Decimal::ZERO),
        CostBasis::Flat(amount) if amount < Decimal::ZERO => {
            Err(invalid(field, &format!("{label} cannot be negative")))
        }
        CostBasis::Flat(_) => Ok(()),
    }
}

/// Conditions under which the projection would be meaningless, divide by
/// zero, or leave the Decimal range. Range checks beyond these belong to
/// [`validate`].
fn check_inputs(inputs: &BuyVsRentInputs) -> HearthResult<()> {
    let buy = &inputs.buy;
    let max_amount = Decimal::from(MAX_AMOUNT);
    if buy.home_price <= Decimal::ZERO {
        return Err(invalid("home_price", "Home price must be greater than zero"));
    }
    if buy.home_price > max_amount {
        return Err(invalid("home_price", "Home price is beyond the supported range"));
    }
    if buy.down_payment_percent < Decimal::ZERO || buy.down_payment_percent > Decimal::ONE_HUNDRED
    {
        return Err(invalid(
            "down_payment_percent",
            "Down payment must be between 0% and 100%",
        ));
    }
    if buy.loan_term_years == 0 || buy.loan_term_years > MAX_LOAN_TERM_YEARS {
        return Err(invalid(
            "loan_term_years",
            "Loan term must be between 1 and 50 years",
        ));
    }
    check_percent("interest_rate", "Interest rate", buy.interest_rate, Decimal::ZERO)?;
    check_percent(
        "property_tax_rate",
        "Property tax rate",
        buy.property_tax_rate,
        Decimal::ZERO,
    )?;
    check_cost_basis("home_insurance", "Home insurance", buy.home_insurance)?;
    check_cost_basis("maintenance", "Maintenance", buy.maintenance)?;
    check_cost_basis("closing_costs", "Closing costs", buy.closing_costs)?;
    let floor = -Decimal::ONE_HUNDRED;
    check_percent("appreciation_rate", "Appreciation rate", buy.appreciation_rate, floor)?;
    check_percent(
        "rent_increase_rate",
        "Rent increase rate",
        inputs.rent.rent_increase_rate,
        floor,
    )?;
    check_percent(
        "investment_return_rate",
        "Investment return rate",
        inputs.investment_return_rate,
        floor,
    )?;
    if inputs.time_horizon_years == 0 || inputs.time_horizon_years > MAX_HORIZON_YEARS {
        return Err(invalid(
            "time_horizon_years",
            "Time horizon must be between 1 and 50 years",
        ));
    }
    if inputs.rent.monthly_rent < Decimal::ZERO {
        return Err(invalid("monthly_rent", "Monthly rent cannot be negative"));
    }
    if inputs.rent.monthly_rent > max_amount {
        return Err(invalid("monthly_rent", "Monthly rent is beyond the supported range"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Row builders
// ---------------------------------------------------------------------------

struct BuyRowState {
    home_value: Money,
    mortgage_balance: Money,
    cumulative_cost: Money,
    cumulative_cost_excluding_principal: Money,
    monthly_savings_invested: Money,
    investment_balance: Money,
}

fn buy_row(
    year: u32,
    costs: &BuyingCosts,
    state: &BuyRowState,
) -> HearthResult<BuyYearlyBreakdown> {
    let equity = state.home_value - state.mortgage_balance;
    Ok(BuyYearlyBreakdown {
        year,
        home_value: state.home_value,
        mortgage_balance: state.mortgage_balance,
        equity,
        down_payment: costs.down_payment,
        closing_costs: costs.closing_costs,
        mortgage_payment: costs.mortgage_payment,
        principal_paid: costs.principal_paid,
        interest_paid: costs.interest_paid,
        property_tax: costs.property_tax,
        insurance: costs.insurance,
        hoa: costs.hoa,
        maintenance: costs.maintenance,
        total_cost: costs.total_cost,
        cumulative_cost: state.cumulative_cost,
        cumulative_cost_excluding_principal: state.cumulative_cost_excluding_principal,
        monthly_savings_invested: state.monthly_savings_invested,
        investment_balance: state.investment_balance,
        net_worth: checked_total([equity, state.investment_balance], "buyer net worth")?,
    })
}

fn rent_row(
    year: u32,
    costs: &RentingCosts,
    cumulative_cost: Money,
    monthly_savings_invested: Money,
    investment_balance: Money,
) -> RentYearlyBreakdown {
    RentYearlyBreakdown {
        year,
        monthly_rent: costs.monthly_rent,
        annual_rent: costs.annual_rent,
        renters_insurance: costs.renters_insurance,
        total_cost: costs.total_cost,
        cumulative_cost,
        monthly_savings_invested,
        investment_balance,
        net_worth: investment_balance,
    }
}

fn summarize(
    horizon: u32,
    difference: Money,
    better_choice: BetterChoice,
    config: &JurisdictionConfig,
) -> String {
    if difference.is_zero() {
        return format!(
            "After {horizon} years, buying and renting would leave you equally well off."
        );
    }
    let amount = format_currency(difference.abs(), &config.currency);
    match better_choice {
        BetterChoice::Rent => format!(
            "After {horizon} years, renting and investing the difference would leave you {amount} better off than buying."
        ),
        BetterChoice::Buy => format!(
            "After {horizon} years, buying would leave you {amount} better off than renting."
        ),
    }
}

// ---------------------------------------------------------------------------
// Core algorithm
// ---------------------------------------------------------------------------

/// Project buying against renting-and-investing over the time horizon.
///
/// Row 0 of each breakdown is the purchase moment: the buyer holds the down
/// payment as equity, the renter holds the capital the buyer spent (see
/// [`ModelingOptions`](crate::jurisdiction::ModelingOptions)). Each later year
/// appreciates the home, pays a year of ownership costs and a year of rent,
/// and invests whichever side's monthly saving for a year at the investment
/// return. Principal is excluded from the buyer's cost because it becomes
/// equity.
///
/// Rent runs one year behind the ownership clock: projection year `k` pays
/// the rent after `k - 1` increases, so the first year of tenancy pays the
/// quoted rent, while year `k` of ownership prices costs off the home value
/// after `k` years of appreciation.
///
/// Pure: identical inputs give identical results. Inputs failing the hard
/// guards (non-positive or out-of-range price, loan term outside 1..=50,
/// horizon outside 1..=50, rates outside their percentage ranges) are
/// rejected with [`HearthError::InvalidInput`]. Growth that leaves the
/// Decimal range is reported as [`HearthError::Overflow`], never a panic.
pub fn compare_buy_vs_rent(
    inputs: &BuyVsRentInputs,
    config: &JurisdictionConfig,
) -> HearthResult<BuyVsRentResults> {
    check_inputs(inputs)?;

    let buy = &inputs.buy;
    let modeling = config.modeling;
    let horizon = inputs.time_horizon_years;
    let loan = buy.loan_amount();

    let schedule = generate_amortization_schedule(loan, buy.interest_rate, buy.loan_term_years)?;
    let monthly_payment = calculate_monthly_payment(loan, buy.interest_rate, buy.loan_term_years)?;
    let appreciation = annual_rate(buy.appreciation_rate);

    let mut buy_breakdown = Vec::with_capacity(horizon as usize + 1);
    let mut rent_breakdown = Vec::with_capacity(horizon as usize + 1);

    // Year 0: purchase moment
    let purchase = compute_buying_costs_with_schedule(
        buy,
        0,
        buy.home_price,
        &schedule,
        monthly_payment,
    )?;
    let mut renter_balance = purchase.down_payment;
    if modeling.include_closing_costs_in_renter_initial_investment {
        renter_balance = checked_total(
            [renter_balance, purchase.closing_costs],
            "renter opening balance",
        )?;
    }
    let mut buyer_balance = Decimal::ZERO;
    let mut buy_cumulative = purchase.total_cost;
    let mut buy_cumulative_ex_principal = purchase.total_cost_excluding_principal;
    let mut rent_cumulative = Decimal::ZERO;

    buy_breakdown.push(buy_row(
        0,
        &purchase,
        &BuyRowState {
            home_value: round_cents(buy.home_price),
            mortgage_balance: round_cents(loan),
            cumulative_cost: buy_cumulative,
            cumulative_cost_excluding_principal: buy_cumulative_ex_principal,
            monthly_savings_invested: Decimal::ZERO,
            investment_balance: buyer_balance,
        },
    )?);
    rent_breakdown.push(rent_row(
        0,
        &RentingCosts::default(),
        rent_cumulative,
        Decimal::ZERO,
        renter_balance,
    ));

    for year in 1..=horizon {
        let growth = compound(appreciation, year)?;
        let home_value = round_cents(checked_product(buy.home_price, growth, "home value")?);

        let mut costs =
            compute_buying_costs_with_schedule(buy, year, home_value, &schedule, monthly_payment)?;
        let retired = buy.is_loan_retired(year);
        if retired {
            costs.retire_loan();
        }
        let mortgage_balance = if retired {
            Decimal::ZERO
        } else {
            remaining_balance_after(&schedule, loan, year * 12)
        };

        // The first tenancy year pays the quoted rent.
        let rent = compute_renting_costs(&inputs.rent, year - 1)?;

        let buy_monthly = costs.monthly_cost_excluding_principal();
        let rent_monthly = rent.monthly_cost();
        let renter_savings = (buy_monthly - rent_monthly).max(Decimal::ZERO);
        let buyer_savings = if modeling.model_buyer_side_investment {
            (rent_monthly - buy_monthly).max(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };

        renter_balance = round_cents(future_value(
            renter_balance,
            renter_savings,
            inputs.investment_return_rate,
            1,
        )?);
        buyer_balance = round_cents(future_value(
            buyer_balance,
            buyer_savings,
            inputs.investment_return_rate,
            1,
        )?);

        buy_cumulative = checked_total([buy_cumulative, costs.total_cost], "cumulative cost")?;
        buy_cumulative_ex_principal = checked_total(
            [buy_cumulative_ex_principal, costs.total_cost_excluding_principal],
            "cumulative cost",
        )?;
        rent_cumulative = checked_total([rent_cumulative, rent.total_cost], "cumulative rent")?;

        let buy_entry = buy_row(
            year,
            &costs,
            &BuyRowState {
                home_value,
                mortgage_balance,
                cumulative_cost: buy_cumulative,
                cumulative_cost_excluding_principal: buy_cumulative_ex_principal,
                monthly_savings_invested: buyer_savings,
                investment_balance: buyer_balance,
            },
        )?;
        let rent_entry = rent_row(year, &rent, rent_cumulative, renter_savings, renter_balance);

        tracing::trace!(
            year,
            buy_net_worth = %buy_entry.net_worth,
            rent_net_worth = %rent_entry.net_worth,
            "projected year"
        );
        buy_breakdown.push(buy_entry);
        rent_breakdown.push(rent_entry);
    }

    let buy_series: Vec<Money> = buy_breakdown.iter().map(|r| r.net_worth).collect();
    let rent_series: Vec<Money> = rent_breakdown.iter().map(|r| r.net_worth).collect();
    let break_even_year = find_break_even_year(&buy_series, &rent_series);

    let final_buy_net_worth = buy_series.last().copied().unwrap_or_default();
    let final_rent_net_worth = rent_series.last().copied().unwrap_or_default();
    let difference = final_rent_net_worth
        .checked_sub(final_buy_net_worth)
        .ok_or_else(|| HearthError::Overflow {
            context: "net worth difference".into(),
        })?;
    let better_choice = if difference > Decimal::ZERO {
        BetterChoice::Rent
    } else {
        BetterChoice::Buy
    };
    let summary = summarize(horizon, difference, better_choice, config);

    tracing::debug!(
        years = horizon,
        break_even_year = ?break_even_year,
        %better_choice,
        %difference,
        "buy-vs-rent projection complete"
    );

    Ok(BuyVsRentResults {
        buy_breakdown,
        rent_breakdown,
        break_even_year,
        final_buy_net_worth,
        final_rent_net_worth,
        difference,
        better_choice,
        summary,
    })
}

/// Validate, project, and wrap the results in the standard output envelope.
///
/// Validation errors abort with [`HearthError::InvalidInput`] naming the
/// first offending field; warnings and the modelling choices in force are
/// reported in the envelope.
pub fn run_comparison(
    inputs: &BuyVsRentInputs,
    config: &JurisdictionConfig,
) -> HearthResult<ComputationOutput<BuyVsRentResults>> {
    let start = Instant::now();

    let issues = validate(inputs, config);
    if let Some(first) = issues.iter().find(|i| i.is_error()) {
        let errors = issues.iter().filter(|i| i.is_error()).count();
        tracing::warn!(errors, region = %config.code, "refusing to project invalid inputs");
        return Err(HearthError::InvalidInput {
            field: first.field.clone(),
            reason: first.message.clone(),
        });
    }

    let mut warnings: Vec<String> = issues
        .iter()
        .map(|i| format!("{}: {}", i.field, i.message))
        .collect();

    let modeling = config.modeling;
    if modeling.include_closing_costs_in_renter_initial_investment {
        warnings.push(
            "Renter's opening investment includes closing costs as well as the down payment"
                .into(),
        );
    } else {
        warnings.push("Renter's opening investment is the down payment only".into());
    }
    if !modeling.model_buyer_side_investment {
        warnings.push("Buyer-side investment of monthly savings is not modelled".into());
    }
    if inputs.buy.selling_costs_percent > Decimal::ZERO {
        warnings.push(
            "Selling costs are not deducted; buyer net worth assumes the home is held".into(),
        );
    }

    let results = compare_buy_vs_rent(inputs, config)?;

    let loan = inputs.buy.loan_amount();
    let monthly_payment =
        calculate_monthly_payment(loan, inputs.buy.interest_rate, inputs.buy.loan_term_years)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Buy vs Rent Net Worth Projection (amortized mortgage, monthly-compounded investment)",
        &serde_json::json!({
            "region": config.code,
            "currency": config.currency.code,
            "time_horizon_years": inputs.time_horizon_years,
            "investment_return_rate": inputs.investment_return_rate.to_string(),
            "loan_amount": loan.to_string(),
            "monthly_payment": monthly_payment.to_string(),
            "closing_costs": inputs.buy.closing_cost_amount().to_string(),
            "include_closing_costs_in_renter_initial_investment":
                modeling.include_closing_costs_in_renter_initial_investment,
            "model_buyer_side_investment": modeling.model_buyer_side_investment,
        }),
        warnings,
        elapsed,
        results,
    ))
}
