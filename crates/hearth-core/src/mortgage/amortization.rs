use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::HearthError;
use crate::time_value::{compound, monthly_rate};
use crate::types::{checked_product, round_cents, Money, Percent};
use crate::HearthResult;

const MAX_TERM_YEARS: u32 = 50;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One month of a fixed-rate mortgage. Every currency field is rounded to
/// cents on its own; the running balance behind them is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
}

/// Per-year roll-up of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub payments: Money,
    pub principal: Money,
    pub interest: Money,
    pub ending_balance: Money,
}

/// Lifetime totals for a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub monthly_payment: Money,
    pub months: u32,
    pub total_paid: Money,
    pub total_principal: Money,
    pub total_interest: Money,
    /// First month whose closing balance is zero, if any.
    pub payoff_month: Option<u32>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_terms(principal: Money, annual_rate_pct: Percent, years: u32) -> HearthResult<()> {
    if years == 0 {
        return Err(HearthError::InvalidInput {
            field: "loan_term_years".into(),
            reason: "Loan term must be at least 1 year".into(),
        });
    }
    if years > MAX_TERM_YEARS {
        return Err(HearthError::InvalidInput {
            field: "loan_term_years".into(),
            reason: format!("Loan term cannot exceed {MAX_TERM_YEARS} years"),
        });
    }
    if annual_rate_pct < Decimal::ZERO || annual_rate_pct > Decimal::ONE_HUNDRED {
        return Err(HearthError::InvalidInput {
            field: "interest_rate".into(),
            reason: "Interest rate must be between 0% and 100%".into(),
        });
    }
    if principal < Decimal::ZERO {
        return Err(HearthError::InvalidInput {
            field: "principal".into(),
            reason: "Loan principal cannot be negative".into(),
        });
    }
    Ok(())
}

/// Unrounded level payment: P × r(1+r)^n / ((1+r)^n − 1).
fn annuity_payment(principal: Money, rate: Decimal, months: u32) -> HearthResult<Money> {
    if principal.is_zero() {
        return Ok(Decimal::ZERO);
    }
    if rate.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    let growth = compound(rate, months)?;
    let denominator = growth - Decimal::ONE;
    if denominator.is_zero() {
        return Err(HearthError::DivisionByZero {
            context: "mortgage payment denominator".into(),
        });
    }
    let scaled = checked_product(principal, rate, "mortgage payment")?;
    let numerator = checked_product(scaled, growth, "mortgage payment")?;
    numerator
        .checked_div(denominator)
        .ok_or_else(|| HearthError::Overflow {
            context: "mortgage payment".into(),
        })
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Monthly payment for a fixed-rate loan, rounded to cents.
///
/// A zero principal costs nothing and a zero rate repays in straight-line
/// instalments. A zero term has no months to divide over and is rejected, as
/// are terms over 50 years and rates outside 0..=100%.
pub fn calculate_monthly_payment(
    principal: Money,
    annual_rate_pct: Percent,
    years: u32,
) -> HearthResult<Money> {
    check_terms(principal, annual_rate_pct, years)?;
    let payment = annuity_payment(principal, monthly_rate(annual_rate_pct), years * 12)?;
    Ok(round_cents(payment))
}

/// Full month-by-month schedule, `years * 12` rows long.
///
/// Interest accrues on the running balance; the principal portion is the
/// level payment less that interest. The recurrence runs at full precision so
/// the final balance lands on zero, and each stored row is rounded to cents
/// independently.
pub fn generate_amortization_schedule(
    principal: Money,
    annual_rate_pct: Percent,
    years: u32,
) -> HearthResult<Vec<AmortizationRow>> {
    check_terms(principal, annual_rate_pct, years)?;

    let rate = monthly_rate(annual_rate_pct);
    let months = years * 12;
    let payment = annuity_payment(principal, rate, months)?;
    let rounded_payment = round_cents(payment);

    let mut schedule = Vec::with_capacity(months as usize);
    let mut balance = principal;

    for month in 1..=months {
        let interest = balance * rate;
        let principal_portion = payment - interest;
        balance -= principal_portion;
        if balance < Decimal::ZERO {
            balance = Decimal::ZERO;
        }

        schedule.push(AmortizationRow {
            month,
            payment: rounded_payment,
            principal_portion: round_cents(principal_portion),
            interest_portion: round_cents(interest),
            remaining_balance: round_cents(balance).max(Decimal::ZERO),
        });
    }

    Ok(schedule)
}

/// Balance outstanding after `month` payments. Month 0 is the original
/// principal; anything past the end of the schedule is paid off.
pub fn remaining_balance_after(schedule: &[AmortizationRow], principal: Money, month: u32) -> Money {
    if month == 0 {
        return principal;
    }
    schedule
        .get(month as usize - 1)
        .map(|row| row.remaining_balance)
        .unwrap_or(Decimal::ZERO)
}

/// Sum of principal and interest over ownership year `year` (1-based), i.e.
/// months `(year-1)*12 + 1 ..= year*12`. Months past the schedule contribute
/// nothing, so a retired loan yields `(0, 0)`.
pub fn principal_and_interest_for_year(schedule: &[AmortizationRow], year: u32) -> (Money, Money) {
    if year == 0 {
        return (Decimal::ZERO, Decimal::ZERO);
    }
    let start = ((year - 1) as usize).saturating_mul(12);
    let end = (year as usize).saturating_mul(12).min(schedule.len());
    if start >= end {
        return (Decimal::ZERO, Decimal::ZERO);
    }

    schedule[start..end]
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(p, i), row| {
            (p + row.principal_portion, i + row.interest_portion)
        })
}

/// Roll a monthly schedule up into calendar-of-ownership years.
pub fn yearly_totals(schedule: &[AmortizationRow]) -> Vec<AmortizationYear> {
    schedule
        .chunks(12)
        .enumerate()
        .map(|(idx, rows)| {
            let mut payments = Decimal::ZERO;
            let mut principal = Decimal::ZERO;
            let mut interest = Decimal::ZERO;
            for row in rows {
                payments += row.payment;
                principal += row.principal_portion;
                interest += row.interest_portion;
            }
            AmortizationYear {
                year: idx as u32 + 1,
                payments,
                principal,
                interest,
                ending_balance: rows.last().map(|r| r.remaining_balance).unwrap_or_default(),
            }
        })
        .collect()
}

/// Lifetime totals for a schedule.
pub fn summarize_schedule(schedule: &[AmortizationRow]) -> ScheduleSummary {
    let mut total_paid = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut payoff_month = None;

    for row in schedule {
        total_paid += row.payment;
        total_principal += row.principal_portion;
        total_interest += row.interest_portion;
        if payoff_month.is_none() && row.remaining_balance.is_zero() {
            payoff_month = Some(row.month);
        }
    }

    ScheduleSummary {
        monthly_payment: schedule.first().map(|r| r.payment).unwrap_or_default(),
        months: schedule.len() as u32,
        total_paid,
        total_principal,
        total_interest,
        payoff_month,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
