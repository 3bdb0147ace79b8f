use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fees::purchase::{ClosingCostStrategy, PurchaseFees};
use crate::types::{round_cents, CostBasis, Money, Percent, RecurringAmount};

/// Everything about the purchase side of the comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyScenarioInputs {
    pub home_price: Money,
    pub down_payment_percent: Percent,
    /// Annual mortgage rate (11.75 = 11.75%)
    pub interest_rate: Percent,
    pub loan_term_years: u32,
    /// Annual property tax / municipal rates as a percentage of current value
    pub property_tax_rate: Percent,
    pub home_insurance: CostBasis,
    /// HOA fees or body-corporate levies
    #[serde(default)]
    pub hoa_fees: RecurringAmount,
    pub maintenance: CostBasis,
    /// Annual appreciation; negative values model a falling market
    pub appreciation_rate: Percent,
    pub closing_costs: CostBasis,
    /// Carried for completeness; the net-worth projection does not model a sale
    #[serde(default)]
    pub selling_costs_percent: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentScenarioInputs {
    pub monthly_rent: Money,
    pub rent_increase_rate: Percent,
    /// Annual renters insurance premium
    #[serde(default)]
    pub renters_insurance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyVsRentInputs {
    pub buy: BuyScenarioInputs,
    pub rent: RentScenarioInputs,
    /// Return earned on whichever side has money left over to invest
    pub investment_return_rate: Percent,
    pub time_horizon_years: u32,
}

impl BuyScenarioInputs {
    pub fn down_payment(&self) -> Money {
        round_cents(self.home_price.saturating_mul(self.down_payment_percent) / Decimal::ONE_HUNDRED)
    }

    pub fn loan_amount(&self) -> Money {
        (self.home_price - self.down_payment()).max(Decimal::ZERO)
    }

    /// One-time closing costs in currency units, resolved against the price.
    pub fn closing_cost_amount(&self) -> Money {
        round_cents(self.closing_costs.resolve(self.home_price))
    }

    /// True once `year` is past the end of the loan term.
    pub fn is_loan_retired(&self, year: u32) -> bool {
        year > self.loan_term_years
    }

    /// Fees the jurisdiction's strategy charges on this purchase.
    pub fn purchase_fees(&self, strategy: &ClosingCostStrategy) -> PurchaseFees {
        strategy.estimate(self.home_price, self.loan_amount())
    }

    /// Copy with closing costs replaced by the strategy's flat estimate.
    pub fn with_estimated_closing_costs(&self, strategy: &ClosingCostStrategy) -> Self {
        let fees = self.purchase_fees(strategy);
        Self {
            closing_costs: CostBasis::Flat(fees.total),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jurisdiction::presets::south_africa_fee_schedule;
    use rust_decimal_macros::dec;

    fn buy() -> BuyScenarioInputs {
        BuyScenarioInputs {
            home_price: dec!(2_500_000),
            down_payment_percent: dec!(10),
            interest_rate: dec!(11.75),
            loan_term_years: 20,
            property_tax_rate: dec!(0.8),
            home_insurance: CostBasis::RateOfValue(dec!(0.5)),
            hoa_fees: RecurringAmount::annual(Decimal::ZERO),
            maintenance: CostBasis::RateOfValue(dec!(1)),
            appreciation_rate: dec!(5.5),
            closing_costs: CostBasis::Flat(Decimal::ZERO),
            selling_costs_percent: dec!(7.5),
        }
    }

    #[test]
    fn test_down_payment_and_loan() {
        let b = buy();
        assert_eq!(b.down_payment(), dec!(250_000));
        assert_eq!(b.loan_amount(), dec!(2_250_000));
    }

    #[test]
    fn test_closing_costs_as_rate() {
        let mut b = buy();
        b.closing_costs = CostBasis::RateOfValue(dec!(3));
        assert_eq!(b.closing_cost_amount(), dec!(75_000));
    }

    #[test]
    fn test_estimated_closing_costs_from_schedule() {
        let strategy = ClosingCostStrategy::Progressive(south_africa_fee_schedule());
        let b = buy().with_estimated_closing_costs(&strategy);
        // duty 79,275 + bond 19,200 + deeds 13,000
        assert_eq!(b.closing_costs, CostBasis::Flat(dec!(111_475)));
    }

    #[test]
    fn test_loan_retirement_boundary() {
        let b = buy();
        assert!(!b.is_loan_retired(20));
        assert!(b.is_loan_retired(21));
    }
}
