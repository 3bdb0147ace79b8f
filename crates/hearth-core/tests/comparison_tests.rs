use hearth_core::comparison::engine::{compare_buy_vs_rent, run_comparison, BetterChoice};
use hearth_core::jurisdiction::{ModelingOptions, Region};
use hearth_core::{BuyVsRentInputs, CostBasis, HearthError, JurisdictionConfig};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Reference South African scenario
// ===========================================================================

fn south_africa() -> (BuyVsRentInputs, JurisdictionConfig) {
    let config = Region::SouthAfrica.config();
    (config.default_inputs(), config)
}

#[test]
fn test_reference_scenario_inputs() {
    let (inputs, _) = south_africa();
    assert_eq!(inputs.buy.home_price, dec!(2_500_000));
    assert_eq!(inputs.buy.down_payment_percent, dec!(10));
    assert_eq!(inputs.buy.interest_rate, dec!(11.75));
    assert_eq!(inputs.buy.loan_term_years, 20);
    assert_eq!(inputs.buy.closing_costs, CostBasis::Flat(dec!(111_475)));
    assert_eq!(inputs.rent.monthly_rent, dec!(16_500));
    assert_eq!(inputs.investment_return_rate, dec!(12));
    assert_eq!(inputs.time_horizon_years, 20);
}

#[test]
fn test_reference_scenario_shape() {
    let (inputs, config) = south_africa();
    let results = compare_buy_vs_rent(&inputs, &config).unwrap();

    assert_eq!(results.buy_breakdown.len(), 21);
    assert_eq!(results.rent_breakdown.len(), 21);
    assert_eq!(
        results.difference,
        results.final_rent_net_worth - results.final_buy_net_worth
    );
    let expected = if results.difference > Decimal::ZERO {
        BetterChoice::Rent
    } else {
        BetterChoice::Buy
    };
    assert_eq!(results.better_choice, expected);
}

#[test]
fn test_reference_scenario_outcome() {
    let (inputs, config) = south_africa();
    let results = compare_buy_vs_rent(&inputs, &config).unwrap();

    // Both sides open at the R250 000 deposit and the owner leads from
    // year 1 onward, so leaving the opening tie is not a crossing.
    assert_eq!(results.break_even_year, None);
    assert_eq!(results.better_choice, BetterChoice::Buy);
    assert!(results.difference < dec!(-3_000_000));
    assert!(results
        .summary
        .starts_with("After 20 years, buying would leave you R3 "));
    assert!(results.summary.ends_with(" better off than renting."));
}

#[test]
fn test_reference_purchase_year() {
    let (inputs, config) = south_africa();
    let results = compare_buy_vs_rent(&inputs, &config).unwrap();
    let b0 = &results.buy_breakdown[0];
    let r0 = &results.rent_breakdown[0];

    assert_eq!(b0.home_value, dec!(2_500_000));
    assert_eq!(b0.mortgage_balance, dec!(2_250_000));
    assert_eq!(b0.equity, dec!(250_000));
    assert_eq!(b0.down_payment, dec!(250_000));
    assert_eq!(b0.closing_costs, dec!(111_475));
    assert_eq!(b0.cumulative_cost, dec!(361_475));
    assert_eq!(b0.net_worth, dec!(250_000));
    assert_eq!(r0.investment_balance, dec!(250_000));
    assert_eq!(r0.net_worth, dec!(250_000));
}

#[test]
fn test_reference_first_year() {
    let (inputs, config) = south_africa();
    let results = compare_buy_vs_rent(&inputs, &config).unwrap();
    let b1 = &results.buy_breakdown[1];
    let r1 = &results.rent_breakdown[1];

    assert_eq!(b1.home_value, dec!(2_637_500));
    assert_eq!(b1.mortgage_payment, dec!(292_600.92));
    assert_eq!(b1.principal_paid, dec!(29_796.71));
    assert_eq!(b1.interest_paid, dec!(262_804.20));
    assert_eq!(b1.mortgage_balance, dec!(2_220_203.29));
    assert_eq!(b1.equity, dec!(417_296.71));
    assert_eq!(b1.property_tax, dec!(21_100));
    assert_eq!(b1.insurance, dec!(13_187.50));
    assert_eq!(b1.hoa, Decimal::ZERO);
    assert_eq!(b1.maintenance, dec!(26_375));
    assert_eq!(
        b1.total_cost,
        dec!(292_600.92) + dec!(21_100) + dec!(13_187.50) + dec!(26_375)
    );
    assert_eq!(b1.investment_balance, Decimal::ZERO);

    assert_eq!(r1.monthly_rent, dec!(16_500));
    assert_eq!(r1.annual_rent, dec!(198_000));
    assert!(r1.monthly_savings_invested > Decimal::ZERO);
    assert!(r1.investment_balance > dec!(250_000));
}

// ===========================================================================
// Invariants
// ===========================================================================

#[test]
fn test_net_worth_decomposition_is_exact() {
    for region in Region::ALL {
        let config = region.config();
        let results = compare_buy_vs_rent(&config.defaults, &config).unwrap();
        for b in &results.buy_breakdown {
            assert_eq!(b.net_worth, b.equity + b.investment_balance, "{region} year {}", b.year);
            assert_eq!(b.equity, b.home_value - b.mortgage_balance);
        }
        for r in &results.rent_breakdown {
            assert_eq!(r.net_worth, r.investment_balance);
        }
    }
}

#[test]
fn test_cumulative_costs_accumulate_yearly_totals() {
    let (inputs, config) = south_africa();
    let results = compare_buy_vs_rent(&inputs, &config).unwrap();

    let mut buy_total = Decimal::ZERO;
    let mut buy_ex_principal = Decimal::ZERO;
    for b in &results.buy_breakdown {
        buy_total += b.total_cost;
        buy_ex_principal += b.total_cost - b.principal_paid;
        assert_eq!(b.cumulative_cost, buy_total);
        assert_eq!(b.cumulative_cost_excluding_principal, buy_ex_principal);
    }

    let mut rent_total = Decimal::ZERO;
    for r in &results.rent_breakdown {
        rent_total += r.total_cost;
        assert_eq!(r.cumulative_cost, rent_total);
    }
}

#[test]
fn test_every_money_field_is_in_cents() {
    let (inputs, config) = south_africa();
    let results = compare_buy_vs_rent(&inputs, &config).unwrap();
    let json = serde_json::to_value(&results).unwrap();
    for row in json["buy_breakdown"].as_array().unwrap() {
        for (key, value) in row.as_object().unwrap() {
            if key == "year" {
                continue;
            }
            let amount: Decimal = value.as_str().unwrap().parse().unwrap();
            assert_eq!(amount, amount.round_dp(2), "{key}");
        }
    }
}

#[test]
fn test_comparison_is_idempotent() {
    let (inputs, config) = south_africa();
    let first = compare_buy_vs_rent(&inputs, &config).unwrap();
    let second = compare_buy_vs_rent(&inputs, &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_mortgage_retires_inside_horizon() {
    let (mut inputs, config) = south_africa();
    inputs.time_horizon_years = 25;
    let results = compare_buy_vs_rent(&inputs, &config).unwrap();

    assert_eq!(results.buy_breakdown[20].mortgage_balance, Decimal::ZERO);
    for b in &results.buy_breakdown[21..] {
        assert_eq!(b.mortgage_payment, Decimal::ZERO);
        assert_eq!(b.interest_paid, Decimal::ZERO);
        assert_eq!(b.equity, b.home_value);
    }
}

#[test]
fn test_closing_costs_in_renter_capital_creates_break_even() {
    let (inputs, config) = south_africa();
    let config = config.with_modeling(ModelingOptions {
        include_closing_costs_in_renter_initial_investment: true,
        model_buyer_side_investment: true,
    });
    let results = compare_buy_vs_rent(&inputs, &config).unwrap();
    assert_eq!(results.rent_breakdown[0].investment_balance, dec!(361_475));
    // renter opens ahead and the owner overtakes later
    let year = results.break_even_year.unwrap();
    let idx = year as usize;
    assert!(results.buy_breakdown[idx - 1].net_worth < results.rent_breakdown[idx - 1].net_worth);
    assert!(results.buy_breakdown[idx].net_worth >= results.rent_breakdown[idx].net_worth);
}

// ===========================================================================
// Envelope
// ===========================================================================

#[test]
fn test_run_comparison_envelope() {
    let (inputs, config) = south_africa();
    let out = run_comparison(&inputs, &config).unwrap();
    assert_eq!(out.result.buy_breakdown.len(), 21);
    assert_eq!(out.assumptions["region"], "ZA");
    assert_eq!(
        out.assumptions["include_closing_costs_in_renter_initial_investment"],
        false
    );
    assert!(out.warnings.iter().any(|w| w.contains("down payment only")));
    assert!(out.warnings.iter().any(|w| w.starts_with("Selling costs")));
}

#[test]
fn test_run_comparison_rejects_out_of_range_inputs() {
    let (mut inputs, config) = south_africa();
    inputs.buy.interest_rate = dec!(25);
    match run_comparison(&inputs, &config) {
        Err(HearthError::InvalidInput { field, reason }) => {
            assert_eq!(field, "interest_rate");
            assert_eq!(reason, "Interest rate must be between 5% and 20%");
        }
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}
