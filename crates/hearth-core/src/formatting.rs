use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

/// How a jurisdiction writes money.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// ISO 4217 code
    pub code: String,
    pub symbol: String,
    pub thousands_separator: String,
}

impl CurrencyFormat {
    pub fn new(code: &str, symbol: &str, thousands_separator: &str) -> Self {
        Self {
            code: code.to_string(),
            symbol: symbol.to_string(),
            thousands_separator: thousands_separator.to_string(),
        }
    }
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

/// Whole-unit currency string, e.g. `R2 500 000` or `-$1,200`.
pub fn format_currency(amount: Money, currency: &CurrencyFormat) -> String {
    let whole = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if whole.is_sign_negative() && !whole.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = whole.abs().trunc().to_string();
    format!(
        "{sign}{}{}",
        currency.symbol,
        group_digits(&digits, &currency.thousands_separator)
    )
}

/// Short form for chart labels: `R2.5M`, `$250k`, or the full amount below
/// a thousand.
pub fn format_currency_compact(amount: Money, currency: &CurrencyFormat) -> String {
    let million = Decimal::from(1_000_000);
    let thousand = Decimal::from(1_000);
    let sign = if amount.is_sign_negative() { "-" } else { "" };
    let abs = amount.abs();

    if abs >= million {
        let scaled = (abs / million).round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        format!("{sign}{}{:.1}M", currency.symbol, scaled)
    } else if abs >= thousand {
        let scaled = (abs / thousand).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        format!("{sign}{}{}k", currency.symbol, scaled)
    } else {
        format_currency(amount, currency)
    }
}

/// `6.5%` style percentage with a fixed number of decimals.
pub fn format_percent(value: Percent, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", decimals as usize, rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rand() -> CurrencyFormat {
        CurrencyFormat::new("ZAR", "R", " ")
    }

    fn usd() -> CurrencyFormat {
        CurrencyFormat::new("USD", "$", ",")
    }

    #[test]
    fn test_grouping() {
        assert_eq!(format_currency(dec!(2_500_000), &rand()), "R2 500 000");
        assert_eq!(format_currency(dec!(1234567.89), &usd()), "$1,234,568");
        assert_eq!(format_currency(dec!(999), &usd()), "$999");
        assert_eq!(format_currency(dec!(100_000), &usd()), "$100,000");
    }

    #[test]
    fn test_negative_and_zero() {
        assert_eq!(format_currency(dec!(-1200), &usd()), "-$1,200");
        assert_eq!(format_currency(dec!(-0.2), &usd()), "$0");
    }

    #[test]
    fn test_compact() {
        assert_eq!(format_currency_compact(dec!(2_500_000), &rand()), "R2.5M");
        assert_eq!(format_currency_compact(dec!(250_000), &usd()), "$250k");
        assert_eq!(format_currency_compact(dec!(640), &usd()), "$640");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(dec!(6.5), 1), "6.5%");
        assert_eq!(format_percent(dec!(11.75), 2), "11.75%");
        assert_eq!(format_percent(dec!(12), 1), "12.0%");
    }
}
