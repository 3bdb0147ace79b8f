use rust_decimal::Decimal;

use crate::error::HearthError;
use crate::types::{checked_product, checked_total, Money, Percent};
use crate::HearthResult;

const MONTHS_PER_YEAR: u32 = 12;
const MAX_YEARS: u32 = 100;

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
///
/// Growth past the Decimal range is an [`HearthError::Overflow`].
pub fn compound(rate: Decimal, n: u32) -> HearthResult<Decimal> {
    let factor = Decimal::ONE + rate;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = checked_product(result, factor, "compound growth")?;
        if result.is_zero() {
            break;
        }
    }
    Ok(result)
}

/// Convert an annual percentage (6.5 = 6.5%) to a monthly decimal rate.
pub fn monthly_rate(annual_rate_pct: Percent) -> Decimal {
    annual_rate_pct / Decimal::ONE_HUNDRED / Decimal::from(MONTHS_PER_YEAR)
}

/// Convert an annual percentage to a decimal growth rate (5.5 -> 0.055).
pub fn annual_rate(annual_rate_pct: Percent) -> Decimal {
    annual_rate_pct / Decimal::ONE_HUNDRED
}

/// Future value of a lump sum plus level monthly contributions, compounded
/// monthly.
///
/// FV = P(1+r)^n + PMT × ((1+r)^n − 1) / r, with r the monthly rate and
/// n = years × 12. A zero rate degrades to simple accumulation.
///
/// The comparison engine calls this one year at a time, carrying the running
/// balance forward as the next year's `principal`, so the contribution can
/// change from year to year.
///
/// Terms beyond 100 years are rejected; a balance that outgrows the Decimal
/// range is an [`HearthError::Overflow`].
pub fn future_value(
    principal: Money,
    monthly_contribution: Money,
    annual_rate_pct: Percent,
    years: u32,
) -> HearthResult<Money> {
    if years > MAX_YEARS {
        return Err(HearthError::InvalidInput {
            field: "years".into(),
            reason: format!("Term cannot exceed {MAX_YEARS} years"),
        });
    }
    let r = monthly_rate(annual_rate_pct);
    let months = years * MONTHS_PER_YEAR;
    let growth = compound(r, months)?;

    let fv_principal = checked_product(principal, growth, "future value")?;
    let fv_contributions = if r.is_zero() {
        checked_product(monthly_contribution, Decimal::from(months), "future value")?
    } else {
        checked_product(monthly_contribution, growth - Decimal::ONE, "future value")?
            .checked_div(r)
            .ok_or_else(|| HearthError::Overflow {
                context: "future value".into(),
            })?
    };

    checked_total([fv_principal, fv_contributions], "future value")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compound_basic() {
        assert_eq!(compound(dec!(0.10), 2).unwrap(), dec!(1.21));
        assert_eq!(compound(dec!(0.05), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_compound_overflow_is_an_error() {
        assert!(matches!(
            compound(dec!(9), 50),
            Err(HearthError::Overflow { .. })
        ));
        // Full loss stays at zero instead of looping on
        assert_eq!(compound(dec!(-1), u32::MAX).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
    }

    #[test]
    fn test_future_value_no_contributions_is_pure_compounding() {
        let fv = future_value(dec!(10_000), Decimal::ZERO, dec!(12), 1).unwrap();
        assert_eq!(fv, dec!(10_000) * compound(dec!(0.01), 12).unwrap());
        // 10k at 1%/month for a year ≈ 11,268.25
        assert!((fv - dec!(11268.25)).abs() < dec!(0.01));
    }

    #[test]
    fn test_future_value_zero_rate() {
        let fv = future_value(dec!(1000), dec!(100), Decimal::ZERO, 2).unwrap();
        assert_eq!(fv, dec!(3400));
    }

    #[test]
    fn test_future_value_with_contributions() {
        // 100/month at 12% for one year: 100 × (1.01^12 − 1) / 0.01 ≈ 1268.25
        let fv = future_value(Decimal::ZERO, dec!(100), dec!(12), 1).unwrap();
        assert!((fv - dec!(1268.25)).abs() < dec!(0.01), "fv={fv}");
    }

    #[test]
    fn test_future_value_negative_return_shrinks_balance() {
        let fv = future_value(dec!(100_000), Decimal::ZERO, dec!(-20), 1).unwrap();
        assert!(fv < dec!(100_000));
        assert!(fv > dec!(80_000));
    }

    #[test]
    fn test_future_value_runaway_return_is_an_error() {
        let err = future_value(dec!(1_000_000), dec!(10_000), dec!(5000), 50).unwrap_err();
        assert!(matches!(err, HearthError::Overflow { .. }), "{err}");
    }

    #[test]
    fn test_future_value_rejects_unbounded_terms() {
        let err = future_value(dec!(1), Decimal::ZERO, dec!(5), 400_000_000).unwrap_err();
        assert!(matches!(err, HearthError::InvalidInput { ref field, .. } if field == "years"));
    }
}
