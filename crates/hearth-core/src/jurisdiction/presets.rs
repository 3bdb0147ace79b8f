//! Built-in jurisdictions. Figures reflect 2024/2025 market conditions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fees::brackets::FeeTable;
use crate::fees::purchase::{ClosingCostStrategy, ProgressiveFeeSchedule};
use crate::formatting::CurrencyFormat;
use crate::inputs::{BuyScenarioInputs, BuyVsRentInputs, RentScenarioInputs};
use crate::jurisdiction::config::{HelpText, JurisdictionConfig, ModelingOptions, Terminology};
use crate::types::{CostBasis, RecurringAmount};
use crate::validation::{Bound, ValidationBounds};

/// SARS transfer duty, attorney bond-registration scale and deeds-office
/// scale for a bonded purchase of an existing (non-VAT) property.
pub fn south_africa_fee_schedule() -> ProgressiveFeeSchedule {
    ProgressiveFeeSchedule {
        transfer_duty: FeeTable::from_bands(
            "Transfer duty",
            &[
                (Some(dec!(1_100_000)), dec!(0)),
                (Some(dec!(1_512_500)), dec!(0.03)),
                (Some(dec!(2_117_500)), dec!(0.06)),
                (Some(dec!(2_722_500)), dec!(0.08)),
                (Some(dec!(12_100_000)), dec!(0.11)),
                (None, dec!(0.13)),
            ],
        ),
        bond_registration: FeeTable::from_bands(
            "Bond registration",
            &[
                (Some(dec!(600_000)), dec!(0.015)),
                (Some(dec!(1_500_000)), dec!(0.008)),
                (None, dec!(0.004)),
            ],
        ),
        deeds_office: FeeTable::from_bands(
            "Deeds office",
            &[
                (Some(dec!(600_000)), dec!(0.01)),
                (Some(dec!(1_500_000)), dec!(0.005)),
                (None, dec!(0.0025)),
            ],
        ),
    }
}

pub fn south_africa() -> JurisdictionConfig {
    let closing_costs = ClosingCostStrategy::Progressive(south_africa_fee_schedule());

    let buy = BuyScenarioInputs {
        home_price: dec!(2_500_000),
        down_payment_percent: dec!(10),
        interest_rate: dec!(11.75),
        loan_term_years: 20,
        property_tax_rate: dec!(0.8),
        home_insurance: CostBasis::RateOfValue(dec!(0.5)),
        hoa_fees: RecurringAmount::annual(Decimal::ZERO),
        maintenance: CostBasis::RateOfValue(dec!(1.0)),
        appreciation_rate: dec!(5.5),
        closing_costs: CostBasis::Flat(Decimal::ZERO),
        selling_costs_percent: dec!(7.5),
    }
    .with_estimated_closing_costs(&closing_costs);

    JurisdictionConfig {
        code: "ZA".into(),
        name: "South Africa".into(),
        currency: CurrencyFormat::new("ZAR", "R", " "),
        terminology: Terminology {
            property_tax: "Municipal Rates".into(),
            property_tax_rate: "Municipal Rates (%)".into(),
            hoa_fees: "Levies (Body Corporate)".into(),
            closing_costs: "Transfer & Bond Fees".into(),
            selling_costs: "Estate Agent Commission".into(),
            selling_costs_percent: "Agent Commission (%)".into(),
            home_insurance: "Home Insurance".into(),
            renters_insurance: "Renters Insurance".into(),
            down_payment: "Deposit".into(),
            mortgage: "Bond".into(),
            rent: "Rent".into(),
        },
        help_text: HelpText {
            interest_rate: "Prime lending rate is ~11.75%. Banks typically offer prime or prime + 0.5-2%.".into(),
            property_tax_rate: "Municipal rates vary by municipality, typically 0.5-1.5% of the municipal valuation each year.".into(),
            appreciation_rate: "Property appreciation has averaged 5-6% but varies widely between provinces.".into(),
            investment_return_rate: "The JSE All Share Index has returned ~12% historically; inflation runs ~5%.".into(),
            closing_costs: "Transfer duty is progressive from R1.1M (3% up to 13%), plus bond registration and deeds office fees.".into(),
            selling_costs: "Estate agent commission is typically 7.5% (6.5% + VAT), plus bond cancellation fees.".into(),
            maintenance_rate: "Budget about 1% of property value per year; older homes need more.".into(),
        },
        defaults: BuyVsRentInputs {
            buy,
            rent: RentScenarioInputs {
                monthly_rent: dec!(16_500),
                rent_increase_rate: dec!(6),
                renters_insurance: Decimal::ZERO,
            },
            investment_return_rate: dec!(12),
            time_horizon_years: 20,
        },
        validation: ValidationBounds {
            home_price: Bound::new(dec!(100_000), dec!(100_000_000)),
            down_payment_percent: Bound::new(dec!(0), dec!(100)),
            interest_rate: Bound::new(dec!(5), dec!(20)).warn_above(dec!(15)),
            loan_term_years: Bound::new(dec!(1), dec!(50)),
            property_tax_rate: Bound::new(dec!(0), dec!(3)),
            insurance_rate: Bound::new(dec!(0), dec!(5)),
            insurance_flat: Bound::new(dec!(0), dec!(500_000)),
            hoa_annual: Bound::new(dec!(0), dec!(120_000)),
            maintenance_rate: Bound::new(dec!(0), dec!(10)),
            maintenance_flat: Bound::new(dec!(0), dec!(1_000_000)),
            appreciation_rate: Bound::new(dec!(-20), dec!(20))
                .warn_below(dec!(0))
                .warn_above(dec!(10)),
            closing_costs_percent: Bound::new(dec!(0), dec!(15)),
            selling_costs_percent: Bound::new(dec!(0), dec!(15)),
            monthly_rent: Bound::new(dec!(100), dec!(100_000)),
            rent_increase_rate: Bound::new(dec!(0), dec!(20)).warn_above(dec!(10)),
            renters_insurance: Bound::new(dec!(0), dec!(50_000)),
            investment_return_rate: Bound::new(dec!(-50), dec!(50))
                .warn_below(dec!(0))
                .warn_above(dec!(15)),
            time_horizon_years: Bound::new(dec!(1), dec!(50)),
        },
        closing_costs,
        modeling: ModelingOptions::default(),
    }
}

pub fn united_states() -> JurisdictionConfig {
    let closing_costs = ClosingCostStrategy::RateOfPrice(dec!(3));

    JurisdictionConfig {
        code: "US".into(),
        name: "United States".into(),
        currency: CurrencyFormat::new("USD", "$", ","),
        terminology: Terminology {
            property_tax: "Property Tax".into(),
            property_tax_rate: "Property Tax Rate (%)".into(),
            hoa_fees: "HOA Fees".into(),
            closing_costs: "Closing Costs".into(),
            selling_costs: "Realtor Fees & Costs".into(),
            selling_costs_percent: "Selling Costs (%)".into(),
            home_insurance: "Home Insurance".into(),
            renters_insurance: "Renters Insurance".into(),
            down_payment: "Down Payment".into(),
            mortgage: "Mortgage".into(),
            rent: "Rent".into(),
        },
        help_text: HelpText {
            interest_rate: "30-year fixed rates are ~6.5-7.5% and vary with credit score and down payment.".into(),
            property_tax_rate: "Property tax ranges from ~0.3% (HI) to ~2.5% (NJ). Check your local rate.".into(),
            appreciation_rate: "US home prices have appreciated ~3-4% a year on average.".into(),
            investment_return_rate: "The S&P 500 has returned ~10% historically including dividends.".into(),
            closing_costs: "Closing costs usually run 2-5% of the price: origination, appraisal, title, inspections.".into(),
            selling_costs: "Realtor commission is typically 5-6%, plus seller closing costs.".into(),
            maintenance_rate: "Budget about 1% of home value per year; older homes need more.".into(),
        },
        defaults: BuyVsRentInputs {
            buy: BuyScenarioInputs {
                home_price: dec!(400_000),
                down_payment_percent: dec!(20),
                interest_rate: dec!(6.75),
                loan_term_years: 30,
                property_tax_rate: dec!(1.2),
                home_insurance: CostBasis::RateOfValue(dec!(0.35)),
                hoa_fees: RecurringAmount::monthly(Decimal::ZERO),
                maintenance: CostBasis::RateOfValue(dec!(1.0)),
                appreciation_rate: dec!(3.5),
                closing_costs: CostBasis::RateOfValue(dec!(3)),
                selling_costs_percent: dec!(6),
            },
            rent: RentScenarioInputs {
                monthly_rent: dec!(2_000),
                rent_increase_rate: dec!(3),
                renters_insurance: dec!(200),
            },
            investment_return_rate: dec!(10),
            time_horizon_years: 30,
        },
        validation: ValidationBounds {
            home_price: Bound::new(dec!(10_000), dec!(50_000_000)),
            down_payment_percent: Bound::new(dec!(0), dec!(100)),
            interest_rate: Bound::new(dec!(0), dec!(20)).warn_above(dec!(10)),
            loan_term_years: Bound::new(dec!(1), dec!(50)),
            property_tax_rate: Bound::new(dec!(0), dec!(10)),
            insurance_rate: Bound::new(dec!(0), dec!(5)),
            insurance_flat: Bound::new(dec!(0), dec!(50_000)),
            hoa_annual: Bound::new(dec!(0), dec!(60_000)),
            maintenance_rate: Bound::new(dec!(0), dec!(10)),
            maintenance_flat: Bound::new(dec!(0), dec!(100_000)),
            appreciation_rate: Bound::new(dec!(-20), dec!(20))
                .warn_below(dec!(-5))
                .warn_above(dec!(10)),
            closing_costs_percent: Bound::new(dec!(0), dec!(10)),
            selling_costs_percent: Bound::new(dec!(0), dec!(15)),
            monthly_rent: Bound::new(dec!(100), dec!(100_000)),
            rent_increase_rate: Bound::new(dec!(0), dec!(20)).warn_above(dec!(10)),
            renters_insurance: Bound::new(dec!(0), dec!(50_000)),
            investment_return_rate: Bound::new(dec!(-50), dec!(50))
                .warn_below(dec!(0))
                .warn_above(dec!(15)),
            time_horizon_years: Bound::new(dec!(1), dec!(50)),
        },
        closing_costs,
        modeling: ModelingOptions::default(),
    }
}
