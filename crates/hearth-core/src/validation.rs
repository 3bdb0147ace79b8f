use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::HearthError;
use crate::formatting::{format_currency, format_percent, CurrencyFormat};
use crate::inputs::BuyVsRentInputs;
use crate::jurisdiction::JurisdictionConfig;
use crate::types::CostBasis;
use crate::HearthResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The comparison must not run
    Error,
    /// Plausible but unusual; shown to the user only
    Warning,
}

/// A field-level finding from [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

/// Hard range `[min, max]` plus optional soft thresholds that only warn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub min: Decimal,
    pub max: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn_below: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn_above: Option<Decimal>,
}

/// Per-jurisdiction limits for every numeric input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationBounds {
    pub home_price: Bound,
    pub down_payment_percent: Bound,
    pub interest_rate: Bound,
    pub loan_term_years: Bound,
    pub property_tax_rate: Bound,
    /// Applies when insurance is quoted as a percentage of value
    pub insurance_rate: Bound,
    /// Applies when insurance is a flat annual premium
    pub insurance_flat: Bound,
    /// Annualised HOA fees / levies
    pub hoa_annual: Bound,
    pub maintenance_rate: Bound,
    pub maintenance_flat: Bound,
    pub appreciation_rate: Bound,
    /// Percentage range; a flat amount is capped at `max` percent of price
    pub closing_costs_percent: Bound,
    pub selling_costs_percent: Bound,
    pub monthly_rent: Bound,
    pub rent_increase_rate: Bound,
    pub renters_insurance: Bound,
    pub investment_return_rate: Bound,
    pub time_horizon_years: Bound,
}

// ---------------------------------------------------------------------------
// Impls
// ---------------------------------------------------------------------------

impl ValidationIssue {
    pub fn error(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{tag}: {}: {}", self.field, self.message)
    }
}

impl Bound {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self {
            min,
            max,
            warn_below: None,
            warn_above: None,
        }
    }

    pub fn warn_below(mut self, threshold: Decimal) -> Self {
        self.warn_below = Some(threshold);
        self
    }

    pub fn warn_above(mut self, threshold: Decimal) -> Self {
        self.warn_above = Some(threshold);
        self
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }
}

impl ValidationBounds {
    fn named(&self) -> [(&'static str, &Bound); 18] {
        [
            ("home_price", &self.home_price),
            ("down_payment_percent", &self.down_payment_percent),
            ("interest_rate", &self.interest_rate),
            ("loan_term_years", &self.loan_term_years),
            ("property_tax_rate", &self.property_tax_rate),
            ("insurance_rate", &self.insurance_rate),
            ("insurance_flat", &self.insurance_flat),
            ("hoa_annual", &self.hoa_annual),
            ("maintenance_rate", &self.maintenance_rate),
            ("maintenance_flat", &self.maintenance_flat),
            ("appreciation_rate", &self.appreciation_rate),
            ("closing_costs_percent", &self.closing_costs_percent),
            ("selling_costs_percent", &self.selling_costs_percent),
            ("monthly_rent", &self.monthly_rent),
            ("rent_increase_rate", &self.rent_increase_rate),
            ("renters_insurance", &self.renters_insurance),
            ("investment_return_rate", &self.investment_return_rate),
            ("time_horizon_years", &self.time_horizon_years),
        ]
    }

    /// Every range must be non-empty; the loan term and horizon must start
    /// at one year or more.
    pub fn check(&self) -> HearthResult<()> {
        for (name, bound) in self.named() {
            if bound.min > bound.max {
                return Err(HearthError::InvalidConfiguration(format!(
                    "validation bound {name}: min {} exceeds max {}",
                    bound.min, bound.max
                )));
            }
        }
        if self.loan_term_years.min < Decimal::ONE || self.time_horizon_years.min < Decimal::ONE {
            return Err(HearthError::InvalidConfiguration(
                "loan term and time horizon bounds must start at 1 year".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Unit<'a> {
    Currency(&'a CurrencyFormat),
    Percent,
    Years,
}

impl Unit<'_> {
    fn show(&self, value: Decimal) -> String {
        match self {
            Unit::Currency(currency) => format_currency(value, currency),
            Unit::Percent => format_percent(value.normalize(), value.normalize().scale()),
            Unit::Years => format!("{} years", value.normalize()),
        }
    }
}

struct Checker<'a> {
    issues: Vec<ValidationIssue>,
    currency: &'a CurrencyFormat,
}

impl<'a> Checker<'a> {
    fn range(&mut self, field: &str, label: &str, value: Decimal, bound: &Bound, unit: Unit<'_>) {
        if !bound.contains(value) {
            self.issues.push(ValidationIssue::error(
                field,
                format!(
                    "{label} must be between {} and {}",
                    unit.show(bound.min),
                    unit.show(bound.max)
                ),
            ));
            return;
        }
        if let Some(low) = bound.warn_below {
            if value < low {
                self.issues.push(ValidationIssue::warning(
                    field,
                    format!("{label} below {} is unusually low", unit.show(low)),
                ));
            }
        }
        if let Some(high) = bound.warn_above {
            if value > high {
                self.issues.push(ValidationIssue::warning(
                    field,
                    format!("{label} above {} is unusually high", unit.show(high)),
                ));
            }
        }
    }

    fn money(&mut self, field: &str, label: &str, value: Decimal, bound: &Bound) {
        let currency = self.currency;
        self.range(field, label, value, bound, Unit::Currency(currency));
    }

    fn percent(&mut self, field: &str, label: &str, value: Decimal, bound: &Bound) {
        self.range(field, label, value, bound, Unit::Percent);
    }

    fn years(&mut self, field: &str, label: &str, value: u32, bound: &Bound) {
        self.range(field, label, Decimal::from(value), bound, Unit::Years);
    }

    fn cost_basis(
        &mut self,
        field: &str,
        label: &str,
        basis: &CostBasis,
        rate_bound: &Bound,
        flat_bound: &Bound,
    ) {
        match basis {
            CostBasis::RateOfValue(pct) => self.percent(field, label, *pct, rate_bound),
            CostBasis::Flat(amount) => self.money(field, label, *amount, flat_bound),
        }
    }
}

/// Check `inputs` against the jurisdiction's bounds.
///
/// Never fails: returns every finding in input order, errors and warnings
/// interleaved. An empty list means the inputs are fully in range.
pub fn validate(inputs: &BuyVsRentInputs, config: &JurisdictionConfig) -> Vec<ValidationIssue> {
    let bounds = &config.validation;
    let buy = &inputs.buy;
    let rent = &inputs.rent;
    let mut c = Checker {
        issues: Vec::new(),
        currency: &config.currency,
    };

    if buy.home_price <= Decimal::ZERO {
        c.issues.push(ValidationIssue::error(
            "home_price",
            "Home price must be greater than zero",
        ));
    } else {
        c.money("home_price", "Home price", buy.home_price, &bounds.home_price);
    }
    c.percent(
        "down_payment_percent",
        "Down payment",
        buy.down_payment_percent,
        &bounds.down_payment_percent,
    );
    c.percent("interest_rate", "Interest rate", buy.interest_rate, &bounds.interest_rate);
    c.years("loan_term_years", "Loan term", buy.loan_term_years, &bounds.loan_term_years);
    c.percent(
        "property_tax_rate",
        "Property tax rate",
        buy.property_tax_rate,
        &bounds.property_tax_rate,
    );
    c.cost_basis(
        "home_insurance",
        "Home insurance",
        &buy.home_insurance,
        &bounds.insurance_rate,
        &bounds.insurance_flat,
    );
    c.money("hoa_fees", "Annual HOA fees", buy.hoa_fees.annual_amount(), &bounds.hoa_annual);
    c.cost_basis(
        "maintenance",
        "Maintenance",
        &buy.maintenance,
        &bounds.maintenance_rate,
        &bounds.maintenance_flat,
    );
    c.percent(
        "appreciation_rate",
        "Appreciation rate",
        buy.appreciation_rate,
        &bounds.appreciation_rate,
    );

    match buy.closing_costs {
        CostBasis::RateOfValue(pct) => c.percent(
            "closing_costs",
            "Closing costs",
            pct,
            &bounds.closing_costs_percent,
        ),
        CostBasis::Flat(amount) => {
            let cap = (buy.home_price.saturating_mul(bounds.closing_costs_percent.max)
                / Decimal::ONE_HUNDRED)
                .max(Decimal::ZERO);
            c.money(
                "closing_costs",
                "Closing costs",
                amount,
                &Bound::new(Decimal::ZERO, cap),
            );
        }
    }

    c.percent(
        "selling_costs_percent",
        "Selling costs",
        buy.selling_costs_percent,
        &bounds.selling_costs_percent,
    );

    c.money("monthly_rent", "Monthly rent", rent.monthly_rent, &bounds.monthly_rent);
    c.percent(
        "rent_increase_rate",
        "Rent increase",
        rent.rent_increase_rate,
        &bounds.rent_increase_rate,
    );
    c.money(
        "renters_insurance",
        "Renters insurance",
        rent.renters_insurance,
        &bounds.renters_insurance,
    );
    c.percent(
        "investment_return_rate",
        "Investment return",
        inputs.investment_return_rate,
        &bounds.investment_return_rate,
    );
    c.years(
        "time_horizon_years",
        "Time horizon",
        inputs.time_horizon_years,
        &bounds.time_horizon_years,
    );

    c.issues
}

pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(ValidationIssue::is_error)
}
