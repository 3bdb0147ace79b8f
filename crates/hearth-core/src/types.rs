use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::HearthError;
use crate::HearthResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.03 = 3%). Used by fee bracket tables.
pub type Rate = Decimal;

/// User-facing percentages (6.5 = 6.5%). Every scenario input rate uses this.
pub type Percent = Decimal;

/// How often a recurring charge is quoted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Monthly,
    Annual,
}

/// A charge quoted per month or per year (HOA fees, body-corporate levies).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecurringAmount {
    pub amount: Money,
    #[serde(default)]
    pub frequency: Frequency,
}

impl RecurringAmount {
    pub fn monthly(amount: Money) -> Self {
        Self {
            amount,
            frequency: Frequency::Monthly,
        }
    }

    pub fn annual(amount: Money) -> Self {
        Self {
            amount,
            frequency: Frequency::Annual,
        }
    }

    /// Amount per year regardless of how it was quoted.
    pub fn annual_amount(&self) -> Money {
        match self.frequency {
            Frequency::Monthly => self.amount.saturating_mul(Decimal::from(12)),
            Frequency::Annual => self.amount,
        }
    }
}

impl Default for RecurringAmount {
    fn default() -> Self {
        Self::monthly(Decimal::ZERO)
    }
}

/// A cost that is either a fixed currency amount or a percentage of a value
/// (home value for insurance and maintenance, purchase price for closing
/// costs). Jurisdictions differ in which form they quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CostBasis {
    Flat(Money),
    RateOfValue(Percent),
}

impl CostBasis {
    /// Resolve against the value the percentage applies to.
    pub fn resolve(&self, value: Money) -> Money {
        match self {
            CostBasis::Flat(amount) => *amount,
            CostBasis::RateOfValue(pct) => value.saturating_mul(*pct) / Decimal::ONE_HUNDRED,
        }
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, CostBasis::Flat(_))
    }
}

impl Default for CostBasis {
    fn default() -> Self {
        CostBasis::Flat(Decimal::ZERO)
    }
}

/// Round to cents, midpoint away from zero.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to whole currency units. Government charges carry no sub-unit part.
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// `a × b`, reporting overflow instead of panicking.
pub fn checked_product(a: Decimal, b: Decimal, context: &str) -> HearthResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| HearthError::Overflow {
        context: context.to_string(),
    })
}

/// Sum of `values`, reporting overflow instead of panicking.
pub fn checked_total<I>(values: I, context: &str) -> HearthResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or_else(|| HearthError::Overflow {
            context: context.to_string(),
        })
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_cents_midpoint_goes_up() {
        assert_eq!(round_cents(dec!(1.005)), dec!(1.01));
        assert_eq!(round_cents(dec!(1.004999)), dec!(1.00));
        assert_eq!(round_cents(dec!(2022.58620)), dec!(2022.59));
    }

    #[test]
    fn test_round_whole() {
        assert_eq!(round_whole(dec!(3000.5)), dec!(3001));
        assert_eq!(round_whole(dec!(3000.49)), dec!(3000));
    }

    #[test]
    fn test_recurring_amount_annualised() {
        assert_eq!(RecurringAmount::monthly(dec!(250)).annual_amount(), dec!(3000));
        assert_eq!(RecurringAmount::annual(dec!(9600)).annual_amount(), dec!(9600));
    }

    #[test]
    fn test_cost_basis_resolution() {
        assert_eq!(CostBasis::Flat(dec!(1400)).resolve(dec!(400_000)), dec!(1400));
        assert_eq!(
            CostBasis::RateOfValue(dec!(0.5)).resolve(dec!(2_500_000)),
            dec!(12500)
        );
    }

    #[test]
    fn test_checked_helpers_report_overflow() {
        assert_eq!(checked_product(dec!(1.5), dec!(4), "x").unwrap(), dec!(6));
        assert_eq!(checked_total([dec!(1), dec!(2.5)], "x").unwrap(), dec!(3.5));

        let err = checked_product(Decimal::MAX, dec!(2), "home value").unwrap_err();
        assert!(matches!(err, HearthError::Overflow { ref context } if context == "home value"));
        assert!(checked_total([Decimal::MAX, Decimal::ONE], "cumulative cost").is_err());
    }

    #[test]
    fn test_cost_basis_serde_shape() {
        let json = serde_json::to_value(CostBasis::RateOfValue(dec!(0.35))).unwrap();
        assert_eq!(json["kind"], "rate_of_value");
        let back: CostBasis = serde_json::from_value(json).unwrap();
        assert_eq!(back, CostBasis::RateOfValue(dec!(0.35)));
    }
}
