use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::inputs::BuyScenarioInputs;
use crate::mortgage::amortization::{
    calculate_monthly_payment, generate_amortization_schedule, principal_and_interest_for_year,
    AmortizationRow,
};
use crate::types::{checked_product, checked_total, round_cents, CostBasis, Money};
use crate::HearthResult;

/// What owning costs in one year of the projection. Year 0 is the purchase
/// itself and carries only the down payment and closing costs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuyingCosts {
    pub down_payment: Money,
    pub closing_costs: Money,
    /// Twelve level payments
    pub mortgage_payment: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub property_tax: Money,
    pub insurance: Money,
    pub hoa: Money,
    pub maintenance: Money,
    pub total_cost: Money,
    /// Principal becomes equity, so it is not an expense against renting
    pub total_cost_excluding_principal: Money,
}

impl BuyingCosts {
    fn recompute_totals(&mut self) -> HearthResult<()> {
        self.total_cost = checked_total(
            [
                self.down_payment,
                self.closing_costs,
                self.mortgage_payment,
                self.property_tax,
                self.insurance,
                self.hoa,
                self.maintenance,
            ],
            "yearly buying costs",
        )?;
        self.total_cost_excluding_principal = self.total_cost - self.principal_paid;
        Ok(())
    }

    /// Zero the mortgage lines for a year after the loan term has ended.
    pub fn retire_loan(&mut self) {
        self.total_cost -= self.mortgage_payment;
        self.total_cost_excluding_principal = self.total_cost;
        self.mortgage_payment = Decimal::ZERO;
        self.principal_paid = Decimal::ZERO;
        self.interest_paid = Decimal::ZERO;
    }

    /// Running costs excluding principal, spread over twelve months.
    pub fn monthly_cost_excluding_principal(&self) -> Money {
        round_cents(self.total_cost_excluding_principal / Decimal::from(12))
    }
}

/// Buying costs for `year_index` against the home's value that year.
///
/// Builds the amortization schedule from the inputs; callers projecting many
/// years should build it once and use [`compute_buying_costs_with_schedule`].
pub fn compute_buying_costs(
    inputs: &BuyScenarioInputs,
    year_index: u32,
    current_home_value: Money,
) -> HearthResult<BuyingCosts> {
    let loan = inputs.loan_amount();
    let schedule = generate_amortization_schedule(loan, inputs.interest_rate, inputs.loan_term_years)?;
    let monthly_payment = calculate_monthly_payment(loan, inputs.interest_rate, inputs.loan_term_years)?;
    compute_buying_costs_with_schedule(
        inputs,
        year_index,
        current_home_value,
        &schedule,
        monthly_payment,
    )
}

/// As [`compute_buying_costs`] with a precomputed schedule and payment.
///
/// Principal and interest are summed from the schedule rows for the year, so
/// years past the schedule report none; the level payment is not cut off here.
/// A home value too large to price costs against is an overflow error.
pub fn compute_buying_costs_with_schedule(
    inputs: &BuyScenarioInputs,
    year_index: u32,
    current_home_value: Money,
    schedule: &[AmortizationRow],
    monthly_payment: Money,
) -> HearthResult<BuyingCosts> {
    let mut costs = BuyingCosts::default();

    if year_index == 0 {
        costs.down_payment = inputs.down_payment();
        costs.closing_costs = inputs.closing_cost_amount();
        costs.recompute_totals()?;
        return Ok(costs);
    }

    let (principal, interest) = principal_and_interest_for_year(schedule, year_index);

    let priced_at = |basis: CostBasis| -> HearthResult<Money> {
        match basis {
            CostBasis::Flat(amount) => Ok(round_cents(amount)),
            CostBasis::RateOfValue(pct) => {
                let scaled = checked_product(current_home_value, pct, "yearly buying costs")?;
                Ok(round_cents(scaled / Decimal::ONE_HUNDRED))
            }
        }
    };

    costs.mortgage_payment = round_cents(checked_product(
        monthly_payment,
        Decimal::from(12),
        "yearly buying costs",
    )?);
    costs.principal_paid = round_cents(principal);
    costs.interest_paid = round_cents(interest);
    costs.property_tax = priced_at(CostBasis::RateOfValue(inputs.property_tax_rate))?;
    costs.insurance = priced_at(inputs.home_insurance)?;
    costs.hoa = round_cents(inputs.hoa_fees.annual_amount());
    costs.maintenance = priced_at(inputs.maintenance)?;
    costs.recompute_totals()?;
    Ok(costs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HearthError;
    use crate::types::RecurringAmount;
    use rust_decimal_macros::dec;

    fn inputs() -> BuyScenarioInputs {
        BuyScenarioInputs {
            home_price: dec!(400_000),
            down_payment_percent: dec!(20),
            interest_rate: dec!(6),
            loan_term_years: 15,
            property_tax_rate: dec!(1.2),
            home_insurance: CostBasis::Flat(dec!(1_500)),
            hoa_fees: RecurringAmount::monthly(dec!(150)),
            maintenance: CostBasis::RateOfValue(dec!(1)),
            appreciation_rate: dec!(3),
            closing_costs: CostBasis::RateOfValue(dec!(3)),
            selling_costs_percent: dec!(6),
        }
    }

    #[test]
    fn test_purchase_year_has_only_upfront_costs() {
        let costs = compute_buying_costs(&inputs(), 0, dec!(400_000)).unwrap();
        assert_eq!(costs.down_payment, dec!(80_000));
        assert_eq!(costs.closing_costs, dec!(12_000));
        assert_eq!(costs.mortgage_payment, Decimal::ZERO);
        assert_eq!(costs.property_tax, Decimal::ZERO);
        assert_eq!(costs.total_cost, dec!(92_000));
        assert_eq!(costs.total_cost_excluding_principal, dec!(92_000));
    }

    #[test]
    fn test_first_year_line_items() {
        let b = inputs();
        let costs = compute_buying_costs(&b, 1, dec!(412_000)).unwrap();
        let monthly = calculate_monthly_payment(b.loan_amount(), b.interest_rate, 15).unwrap();

        assert_eq!(costs.down_payment, Decimal::ZERO);
        assert_eq!(costs.mortgage_payment, monthly * dec!(12));
        assert_eq!(costs.property_tax, dec!(4_944));
        assert_eq!(costs.insurance, dec!(1_500));
        assert_eq!(costs.hoa, dec!(1_800));
        assert_eq!(costs.maintenance, dec!(4_120));
        assert_eq!(
            costs.total_cost,
            costs.mortgage_payment + dec!(4_944) + dec!(1_500) + dec!(1_800) + dec!(4_120)
        );
        assert_eq!(
            costs.total_cost_excluding_principal,
            costs.total_cost - costs.principal_paid
        );
        assert!(costs.interest_paid > costs.principal_paid);
    }

    #[test]
    fn test_principal_and_interest_cover_the_payment() {
        let costs = compute_buying_costs(&inputs(), 5, dec!(450_000)).unwrap();
        let diff = (costs.principal_paid + costs.interest_paid - costs.mortgage_payment).abs();
        assert!(diff <= dec!(0.20), "diff {diff}");
    }

    #[test]
    fn test_retire_loan_keeps_running_costs() {
        let mut costs = compute_buying_costs(&inputs(), 16, dec!(600_000)).unwrap();
        assert_eq!(costs.principal_paid, Decimal::ZERO);
        assert_eq!(costs.interest_paid, Decimal::ZERO);
        assert!(costs.mortgage_payment > Decimal::ZERO);

        costs.retire_loan();
        assert_eq!(costs.mortgage_payment, Decimal::ZERO);
        assert_eq!(
            costs.total_cost,
            costs.property_tax + costs.insurance + costs.hoa + costs.maintenance
        );
        assert_eq!(costs.total_cost, costs.total_cost_excluding_principal);
    }

    #[test]
    fn test_cash_purchase_has_no_mortgage() {
        let mut b = inputs();
        b.down_payment_percent = dec!(100);
        let costs = compute_buying_costs(&b, 1, dec!(412_000)).unwrap();
        assert_eq!(costs.mortgage_payment, Decimal::ZERO);
        assert_eq!(costs.principal_paid, Decimal::ZERO);
    }

    #[test]
    fn test_unpriceable_home_value_is_an_error() {
        let b = inputs();
        let err = compute_buying_costs(&b, 1, Decimal::MAX).unwrap_err();
        assert!(matches!(err, HearthError::Overflow { .. }), "{err}");
    }

    #[test]
    fn test_zero_term_propagates_error() {
        let mut b = inputs();
        b.loan_term_years = 0;
        assert!(compute_buying_costs(&b, 1, dec!(400_000)).is_err());
    }
}
