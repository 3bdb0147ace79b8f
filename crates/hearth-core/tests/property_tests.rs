use hearth_core::fees::brackets::FeeTable;
use hearth_core::jurisdiction::presets::south_africa_fee_schedule;
use hearth_core::mortgage::amortization::{
    calculate_monthly_payment, generate_amortization_schedule,
};
use hearth_core::time_value::{compound, future_value};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn cents(v: i64) -> Decimal {
    Decimal::new(v, 2)
}

proptest! {
    #[test]
    fn amortization_pays_off(
        principal in 1_000_00i64..5_000_000_00,
        rate_bp in 0i64..2_000,
        years in 1u32..=30,
    ) {
        let principal = cents(principal);
        let rate = cents(rate_bp);
        let schedule = generate_amortization_schedule(principal, rate, years).unwrap();
        prop_assert_eq!(schedule.len(), years as usize * 12);

        let last = schedule.last().unwrap();
        prop_assert!(last.remaining_balance <= Decimal::new(1, 2));
        prop_assert!(schedule.iter().all(|r| r.remaining_balance >= Decimal::ZERO));

        let payment = calculate_monthly_payment(principal, rate, years).unwrap();
        prop_assert_eq!(schedule[0].payment, payment);
    }

    #[test]
    fn transfer_duty_is_monotone(a in 0i64..20_000_000, b in 0i64..20_000_000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let schedule = south_africa_fee_schedule();
        for table in [&schedule.transfer_duty, &schedule.bond_registration, &schedule.deeds_office] {
            prop_assert!(table.fee(Decimal::from(hi)) >= table.fee(Decimal::from(lo)));
        }
    }

    #[test]
    fn marginal_tables_are_monotone(
        widths in prop::collection::vec(1i64..1_000_000, 1..6),
        rates_bp in prop::collection::vec(0i64..2_000, 6),
        a in 0i64..10_000_000,
        b in 0i64..10_000_000,
    ) {
        let mut bands = Vec::new();
        let mut upper = 0i64;
        for (idx, width) in widths.iter().enumerate() {
            upper += width;
            bands.push((Some(Decimal::from(upper)), Decimal::new(rates_bp[idx], 4)));
        }
        bands.push((None, Decimal::new(rates_bp[widths.len()], 4)));
        let table = FeeTable::marginal("generated", &bands).unwrap();

        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(table.fee(Decimal::from(hi)) >= table.fee(Decimal::from(lo)));
    }

    #[test]
    fn future_value_without_contributions_is_compounding(
        principal in 0i64..10_000_000_00,
        rate_bp in -1_000i64..2_500,
        years in 1u32..=50,
    ) {
        let principal = cents(principal);
        let rate = cents(rate_bp);
        let fv = future_value(principal, Decimal::ZERO, rate, years).unwrap();
        let expected = principal * compound(rate / Decimal::from(1200), 12 * years).unwrap();
        prop_assert!((fv - expected).abs() < Decimal::new(1, 6), "{} vs {}", fv, expected);
    }
}
