use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::HearthError;
use crate::types::{round_whole, Money, Rate};
use crate::HearthResult;

/// One band of a progressive fee scale. The band runs from the previous
/// band's upper bound (or zero) up to and including `upper_bound`; `None`
/// marks the open-ended top band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressiveBracket {
    pub upper_bound: Option<Money>,
    /// Marginal rate inside the band (0.03 = 3%)
    pub rate: Rate,
    /// Fee already accrued at the band's lower bound
    pub base_amount: Money,
}

/// A named progressive scale, e.g. transfer duty on property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeTable {
    pub name: String,
    pub brackets: Vec<ProgressiveBracket>,
}

impl FeeTable {
    /// Build a table from marginal bands `(upper_bound, rate)`, deriving each
    /// band's base amount from the bands below it.
    pub fn marginal(name: &str, bands: &[(Option<Money>, Rate)]) -> HearthResult<Self> {
        let table = Self::from_bands(name, bands);
        table.check()?;
        Ok(table)
    }

    /// Unchecked variant of [`FeeTable::marginal`] for built-in tables.
    pub(crate) fn from_bands(name: &str, bands: &[(Option<Money>, Rate)]) -> Self {
        let mut brackets = Vec::with_capacity(bands.len());
        let mut lower = Decimal::ZERO;
        let mut base = Decimal::ZERO;

        for (upper, rate) in bands {
            brackets.push(ProgressiveBracket {
                upper_bound: *upper,
                rate: *rate,
                base_amount: base,
            });
            if let Some(u) = upper {
                base = base.saturating_add((*u - lower).saturating_mul(*rate));
                lower = *u;
            }
        }

        FeeTable {
            name: name.to_string(),
            brackets,
        }
    }

    /// Reject tables whose bounds are not strictly ascending, that have a
    /// bounded top band, or that carry negative rates.
    pub fn check(&self) -> HearthResult<()> {
        if self.brackets.is_empty() {
            return Err(HearthError::InvalidConfiguration(format!(
                "fee table '{}' has no brackets",
                self.name
            )));
        }

        let mut previous = Decimal::ZERO;
        let last = self.brackets.len() - 1;
        for (idx, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO {
                return Err(HearthError::InvalidConfiguration(format!(
                    "fee table '{}' bracket {idx} has a negative rate",
                    self.name
                )));
            }
            match bracket.upper_bound {
                Some(upper) if upper <= previous => {
                    return Err(HearthError::InvalidConfiguration(format!(
                        "fee table '{}' bracket {idx} upper bound {upper} is not above {previous}",
                        self.name
                    )));
                }
                Some(upper) => previous = upper,
                None if idx != last => {
                    return Err(HearthError::InvalidConfiguration(format!(
                        "fee table '{}' has an open-ended bracket before the top",
                        self.name
                    )));
                }
                None => {}
            }
        }

        if self.brackets[last].upper_bound.is_some() {
            return Err(HearthError::InvalidConfiguration(format!(
                "fee table '{}' top bracket must be open-ended",
                self.name
            )));
        }
        Ok(())
    }

    pub fn fee(&self, value: Money) -> Money {
        compute_progressive_fee(value, &self.brackets)
    }
}

/// Fee on `value` under a progressive scale, rounded to whole currency units.
///
/// Bands are walked in ascending order; the band containing `value` charges
/// its base amount plus its rate on the excess over the band's lower bound.
/// A value sitting exactly on a bound belongs to the lower band. Values at or
/// below zero pay nothing; fees past the Decimal range saturate.
pub fn compute_progressive_fee(value: Money, brackets: &[ProgressiveBracket]) -> Money {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut lower = Decimal::ZERO;
    for bracket in brackets {
        match bracket.upper_bound {
            Some(upper) if value > upper => lower = upper,
            _ => {
                let excess = (value - lower).saturating_mul(bracket.rate);
                return round_whole(bracket.base_amount.saturating_add(excess));
            }
        }
    }

    // Table ran out of bands without an open top: extend the last band.
    match brackets.last() {
        Some(top) => {
            let top_lower = brackets
                .iter()
                .rev()
                .nth(1)
                .and_then(|b| b.upper_bound)
                .unwrap_or(Decimal::ZERO);
            round_whole(
                top.base_amount
                    .saturating_add((value - top_lower).saturating_mul(top.rate)),
            )
        }
        None => Decimal::ZERO,
    }
}
