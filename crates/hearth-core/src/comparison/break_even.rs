use std::cmp::Ordering;

use crate::types::Money;

/// Year index of the last point where the buy and rent net-worth series
/// cross, or `None` if one side leads throughout.
///
/// A crossing is a strict change of leader: the sign of `buy - rent` flips,
/// possibly across a run of exact ties. It is dated to the first year of the
/// tie run, or to the year of the flip when there is none. Touching zero and
/// returning to the same leader is not a crossing, and neither is leaving a
/// tie the series opened with. A series that closes to a tie and stays there
/// until the end counts as crossing at the start of that tie. Series of
/// unequal length are compared over the shorter one.
pub fn find_break_even_year(buy_net_worth: &[Money], rent_net_worth: &[Money]) -> Option<u32> {
    let gaps = buy_net_worth
        .iter()
        .zip(rent_net_worth)
        .map(|(buy, rent)| buy.cmp(rent));

    let mut leader: Option<Ordering> = None;
    let mut tie_start: Option<usize> = None;
    let mut last = None;
    for (idx, gap) in gaps.enumerate() {
        if gap == Ordering::Equal {
            tie_start.get_or_insert(idx);
            continue;
        }
        if leader.is_some_and(|prev| prev != gap) {
            last = Some(tie_start.unwrap_or(idx));
        }
        leader = Some(gap);
        tie_start = None;
    }
    if leader.is_some() && tie_start.is_some() {
        last = tie_start;
    }
    last.map(|idx| idx as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn series(values: &[i64]) -> Vec<Money> {
        values.iter().map(|v| Decimal::from(*v)).collect()
    }

    #[test]
    fn test_single_crossing() {
        let buy = series(&[100, 120, 150, 200, 260]);
        let rent = series(&[150, 160, 170, 180, 190]);
        assert_eq!(find_break_even_year(&buy, &rent), Some(3));
    }

    #[test]
    fn test_never_crossing() {
        let buy = series(&[10, 20, 30]);
        let rent = series(&[50, 60, 70]);
        assert_eq!(find_break_even_year(&buy, &rent), None);
    }

    #[test]
    fn test_last_crossing_wins() {
        // below, above, below, above
        let buy = series(&[0, 20, 5, 40]);
        let rent = series(&[10, 10, 10, 10]);
        assert_eq!(find_break_even_year(&buy, &rent), Some(3));
    }

    #[test]
    fn test_touching_zero_counts_once() {
        let buy = vec![dec!(90), dec!(100), dec!(100), dec!(110)];
        let rent = vec![dec!(100); 4];
        // reaches the tie at year 1, stays tied, then leaves it
        assert_eq!(find_break_even_year(&buy, &rent), Some(1));
    }

    #[test]
    fn test_touch_and_return() {
        let buy = series(&[90, 100, 90, 100, 100, 95]);
        let rent = series(&[100; 6]);
        assert_eq!(find_break_even_year(&buy, &rent), None);
    }

    #[test]
    fn test_leaving_an_opening_tie_is_not_a_crossing() {
        let buy = series(&[100, 100, 120]);
        let rent = series(&[100, 100, 100]);
        assert_eq!(find_break_even_year(&buy, &rent), None);
    }

    #[test]
    fn test_closing_to_a_final_tie() {
        let buy = series(&[80, 90, 100, 100]);
        let rent = series(&[100; 4]);
        assert_eq!(find_break_even_year(&buy, &rent), Some(2));
    }

    #[test]
    fn test_short_series() {
        assert_eq!(find_break_even_year(&[], &[]), None);
        assert_eq!(find_break_even_year(&[dec!(1)], &[dec!(2)]), None);
    }
}
