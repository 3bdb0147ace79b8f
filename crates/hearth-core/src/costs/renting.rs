use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::inputs::RentScenarioInputs;
use crate::time_value::{annual_rate, compound};
use crate::types::{checked_product, checked_total, round_cents, Money};
use crate::HearthResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RentingCosts {
    pub monthly_rent: Money,
    pub annual_rent: Money,
    pub renters_insurance: Money,
    pub total_cost: Money,
}

impl RentingCosts {
    pub fn monthly_cost(&self) -> Money {
        round_cents(self.total_cost / Decimal::from(12))
    }
}

/// Rent after `year_index` annual increases. Increases compound once a year,
/// not monthly.
pub fn compute_renting_costs(
    inputs: &RentScenarioInputs,
    year_index: u32,
) -> HearthResult<RentingCosts> {
    let growth = compound(annual_rate(inputs.rent_increase_rate), year_index)?;
    let monthly_rent = round_cents(checked_product(inputs.monthly_rent, growth, "rent")?);
    let annual_rent = checked_product(monthly_rent, Decimal::from(12), "annual rent")?;
    let renters_insurance = round_cents(inputs.renters_insurance);

    Ok(RentingCosts {
        monthly_rent,
        annual_rent,
        renters_insurance,
        total_cost: checked_total([annual_rent, renters_insurance], "annual rent")?,
    })
}
