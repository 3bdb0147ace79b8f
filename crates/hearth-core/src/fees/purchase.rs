use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fees::brackets::FeeTable;
use crate::types::{round_cents, Money, Percent};
use crate::HearthResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The three statutory scales charged on a bonded property transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressiveFeeSchedule {
    /// Charged on the property value
    pub transfer_duty: FeeTable,
    /// Charged on the loan (bond) amount; nothing for a cash purchase
    pub bond_registration: FeeTable,
    /// Charged on the property value
    pub deeds_office: FeeTable,
}

/// How a jurisdiction arrives at one-time purchase costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ClosingCostStrategy {
    /// Bracketed statutory fees
    Progressive(ProgressiveFeeSchedule),
    /// A flat percentage of the purchase price (3 = 3%)
    RateOfPrice(Percent),
    /// A fixed amount regardless of price
    Flat(Money),
}

/// Itemised one-time purchase costs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseFees {
    pub transfer_duty: Money,
    pub bond_registration_fee: Money,
    pub deeds_office_fee: Money,
    /// Costs not broken out by scale (percentage or flat strategies)
    pub other_costs: Money,
    pub total: Money,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

impl ProgressiveFeeSchedule {
    pub fn fees(&self, property_value: Money, loan_amount: Money) -> PurchaseFees {
        if property_value <= Decimal::ZERO {
            return PurchaseFees::default();
        }

        let transfer_duty = self.transfer_duty.fee(property_value);
        let bond_registration_fee = self.bond_registration.fee(loan_amount);
        let deeds_office_fee = self.deeds_office.fee(property_value);

        PurchaseFees {
            transfer_duty,
            bond_registration_fee,
            deeds_office_fee,
            other_costs: Decimal::ZERO,
            total: transfer_duty
                .saturating_add(bond_registration_fee)
                .saturating_add(deeds_office_fee),
        }
    }

    pub fn check(&self) -> HearthResult<()> {
        self.transfer_duty.check()?;
        self.bond_registration.check()?;
        self.deeds_office.check()
    }
}

impl ClosingCostStrategy {
    /// Estimate one-time purchase costs for a property bought with
    /// `loan_amount` of borrowing.
    pub fn estimate(&self, property_value: Money, loan_amount: Money) -> PurchaseFees {
        if property_value <= Decimal::ZERO {
            return PurchaseFees::default();
        }

        let fees = match self {
            ClosingCostStrategy::Progressive(schedule) => schedule.fees(property_value, loan_amount),
            ClosingCostStrategy::RateOfPrice(pct) => {
                let other = round_cents(property_value.saturating_mul(*pct) / Decimal::ONE_HUNDRED);
                PurchaseFees {
                    other_costs: other,
                    total: other,
                    ..PurchaseFees::default()
                }
            }
            ClosingCostStrategy::Flat(amount) => PurchaseFees {
                other_costs: *amount,
                total: *amount,
                ..PurchaseFees::default()
            },
        };

        tracing::debug!(
            %property_value,
            %loan_amount,
            total = %fees.total,
            "estimated purchase fees"
        );
        fees
    }

    pub fn check(&self) -> HearthResult<()> {
        match self {
            ClosingCostStrategy::Progressive(schedule) => schedule.check(),
            ClosingCostStrategy::RateOfPrice(pct) if *pct < Decimal::ZERO => Err(
                crate::error::HearthError::InvalidConfiguration(
                    "closing-cost percentage cannot be negative".into(),
                ),
            ),
            ClosingCostStrategy::Flat(amount) if *amount < Decimal::ZERO => Err(
                crate::error::HearthError::InvalidConfiguration(
                    "flat closing costs cannot be negative".into(),
                ),
            ),
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
