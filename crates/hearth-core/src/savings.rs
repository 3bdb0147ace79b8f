//! Side-by-side growth of two savings plans (e.g. "invest R2 000 a month"
//! against "invest R50 000 now"), sharing the monthly-compounding model the
//! buy-vs-rent projection uses for the renter's portfolio.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::HearthError;
use crate::formatting::{format_currency, CurrencyFormat};
use crate::time_value::future_value;
use crate::types::{checked_product, checked_total, round_cents, Money, Percent};
use crate::validation::ValidationIssue;
use crate::HearthResult;

const MAX_HORIZON_YEARS: u32 = 50;
const MAX_NAME_LEN: usize = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDetails {
    pub label: String,
    pub initial_amount: Money,
    pub monthly_amount: Money,
    /// Annual return (7 = 7%)
    pub return_rate: Percent,
    pub time_horizon: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyValue {
    pub year: u32,
    pub total_value: Money,
    pub total_contributed: Money,
    pub total_growth: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub scenario_a: Vec<YearlyValue>,
    pub scenario_b: Vec<YearlyValue>,
    /// Final value of B minus final value of A
    pub difference: Money,
    pub summary: String,
}

// ---------------------------------------------------------------------------
// Calculations
// ---------------------------------------------------------------------------

/// Value, contributions and growth at the end of each year `1..=time_horizon`.
pub fn generate_yearly_breakdown(scenario: &ScenarioDetails) -> HearthResult<Vec<YearlyValue>> {
    (1..=scenario.time_horizon)
        .map(|year| {
            let total_value = future_value(
                scenario.initial_amount,
                scenario.monthly_amount,
                scenario.return_rate,
                year,
            )?;
            let months = Decimal::from(u64::from(year) * 12);
            let deposits = checked_product(scenario.monthly_amount, months, "contributions")?;
            let total_contributed =
                checked_total([scenario.initial_amount, deposits], "contributions")?;
            let total_growth = total_value.checked_sub(total_contributed).ok_or_else(|| {
                HearthError::Overflow {
                    context: "savings growth".into(),
                }
            })?;
            Ok(YearlyValue {
                year,
                total_value: round_cents(total_value),
                total_contributed: round_cents(total_contributed),
                total_growth: round_cents(total_growth),
            })
        })
        .collect()
}

/// Compare two plans over the first plan's horizon.
pub fn compare_scenarios(
    scenario_a: &ScenarioDetails,
    scenario_b: &ScenarioDetails,
    currency: &CurrencyFormat,
) -> HearthResult<ScenarioComparison> {
    if scenario_a.time_horizon == 0 {
        return Err(HearthError::InsufficientData(format!(
            "scenario '{}' has no years to project",
            scenario_a.label
        )));
    }
    if scenario_a.time_horizon != scenario_b.time_horizon {
        return Err(HearthError::InvalidInput {
            field: "time_horizon".into(),
            reason: "Both scenarios must cover the same number of years".into(),
        });
    }

    let breakdown_a = generate_yearly_breakdown(scenario_a)?;
    let breakdown_b = generate_yearly_breakdown(scenario_b)?;

    let final_a = breakdown_a.last().map(|y| y.total_value).unwrap_or_default();
    let final_b = breakdown_b.last().map(|y| y.total_value).unwrap_or_default();
    let difference = final_b
        .checked_sub(final_a)
        .ok_or_else(|| HearthError::Overflow {
            context: "scenario difference".into(),
        })?;

    let (better, worse) = if difference > Decimal::ZERO {
        (&scenario_b.label, &scenario_a.label)
    } else {
        (&scenario_a.label, &scenario_b.label)
    };
    let summary = format!(
        "If you choose \"{better}\" instead of \"{worse}\", you'll have {} more after {} years.",
        format_currency(difference.abs(), currency),
        scenario_a.time_horizon
    );

    Ok(ScenarioComparison {
        scenario_a: breakdown_a,
        scenario_b: breakdown_b,
        difference: round_cents(difference),
        summary,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_scenario_details(scenario: &ScenarioDetails) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if scenario.label.trim().is_empty() {
        issues.push(ValidationIssue::error("label", "Label is required"));
    }
    if scenario.initial_amount < Decimal::ZERO {
        issues.push(ValidationIssue::error(
            "initial_amount",
            "Initial amount cannot be negative",
        ));
    }
    if scenario.monthly_amount < Decimal::ZERO {
        issues.push(ValidationIssue::error(
            "monthly_amount",
            "Monthly amount cannot be negative",
        ));
    }
    if scenario.return_rate < -Decimal::ONE_HUNDRED {
        issues.push(ValidationIssue::error(
            "return_rate",
            "Return rate cannot be less than -100%",
        ));
    }
    if scenario.return_rate > Decimal::ONE_HUNDRED {
        issues.push(ValidationIssue::error(
            "return_rate",
            "Return rate seems unrealistic (>100%)",
        ));
    }
    if scenario.time_horizon < 1 {
        issues.push(ValidationIssue::error(
            "time_horizon",
            "Time horizon must be at least 1 year",
        ));
    }
    if scenario.time_horizon > MAX_HORIZON_YEARS {
        issues.push(ValidationIssue::error(
            "time_horizon",
            "Time horizon cannot exceed 50 years",
        ));
    }

    issues
}

/// A saved-scenario name must be present and at most 100 characters.
pub fn validate_scenario_name(name: &str) -> Option<ValidationIssue> {
    if name.trim().is_empty() {
        return Some(ValidationIssue::error("name", "Scenario name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Some(ValidationIssue::error(
            "name",
            "Scenario name is too long (max 100 characters)",
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn plan(label: &str, initial: Decimal, monthly: Decimal) -> ScenarioDetails {
        ScenarioDetails {
            label: label.into(),
            initial_amount: initial,
            monthly_amount: monthly,
            return_rate: dec!(7),
            time_horizon: 10,
        }
    }

    fn usd() -> CurrencyFormat {
        CurrencyFormat::new("USD", "$", ",")
    }

    #[test]
    fn test_breakdown_contributions_and_growth() {
        let years = generate_yearly_breakdown(&plan("a", dec!(1_000), dec!(100))).unwrap();
        assert_eq!(years.len(), 10);
        assert_eq!(years[0].total_contributed, dec!(2_200));
        assert_eq!(years[9].total_contributed, dec!(13_000));
        for y in &years {
            assert_eq!(y.total_growth, y.total_value - y.total_contributed);
        }
    }

    #[test]
    fn test_zero_rate_is_pure_saving() {
        let mut p = plan("cash", dec!(500), dec!(50));
        p.return_rate = Decimal::ZERO;
        let years = generate_yearly_breakdown(&p).unwrap();
        assert_eq!(years[1].total_value, dec!(1_700));
        assert_eq!(years[1].total_growth, Decimal::ZERO);
    }

    #[test]
    fn test_compare_names_the_winner() {
        let a = plan("Lump sum", dec!(10_000), Decimal::ZERO);
        let b = plan("Monthly", Decimal::ZERO, dec!(200));
        let cmp = compare_scenarios(&a, &b, &usd()).unwrap();
        assert!(cmp.difference > Decimal::ZERO);
        assert!(cmp
            .summary
            .starts_with("If you choose \"Monthly\" instead of \"Lump sum\", you'll have $"));
        assert!(cmp.summary.ends_with("more after 10 years."));
    }

    #[test]
    fn test_mismatched_horizons_rejected() {
        let a = plan("a", dec!(1), dec!(1));
        let mut b = plan("b", dec!(1), dec!(1));
        b.time_horizon = 5;
        assert!(compare_scenarios(&a, &b, &usd()).is_err());
    }

    #[test]
    fn test_runaway_plans_fail_instead_of_panicking() {
        let mut hoard = plan("hoard", Decimal::MAX, Decimal::MAX);
        hoard.return_rate = Decimal::ZERO;
        assert!(matches!(
            generate_yearly_breakdown(&hoard),
            Err(HearthError::Overflow { .. })
        ));

        let mut endless = plan("endless", dec!(1), dec!(1));
        endless.time_horizon = u32::MAX;
        let b = endless.clone();
        assert!(compare_scenarios(&endless, &b, &usd()).is_err());
    }

    #[test]
    fn test_scenario_validation() {
        let mut p = plan(" ", dec!(-1), dec!(10));
        p.return_rate = dec!(150);
        p.time_horizon = 0;
        let fields: Vec<String> = validate_scenario_details(&p)
            .into_iter()
            .map(|i| i.field)
            .collect();
        assert_eq!(fields, vec!["label", "initial_amount", "return_rate", "time_horizon"]);
        assert!(validate_scenario_details(&plan("ok", dec!(0), dec!(0))).is_empty());
    }

    #[test]
    fn test_scenario_names() {
        assert!(validate_scenario_name("Cape Town flat").is_none());
        assert!(validate_scenario_name("").is_some());
        let long = "x".repeat(101);
        assert_eq!(
            validate_scenario_name(&long).map(|i| i.message),
            Some("Scenario name is too long (max 100 characters)".to_string())
        );
    }
}
