//! Period-over-period fractional change.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::{MergedPricing, ReturnSeries};

/// Scale of the close ratio before subtracting one.
pub const RATIO_SCALE: u32 = 6;

/// Change between each consecutive pair of samples, keyed by the later date.
///
/// The ratio `close[i] / close[i-1]` is rounded half-even to six places and
/// then one is subtracted. Fewer than two samples give an empty series. A pair
/// whose earlier close is zero has no defined ratio and is skipped.
pub fn compute_returns(samples: &[MergedPricing]) -> ReturnSeries {
    let mut returns = ReturnSeries::new();
    for pair in samples.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        match curr.close.checked_div(prev.close) {
            Some(ratio) => {
                let change = ratio
                    .round_dp_with_strategy(RATIO_SCALE, RoundingStrategy::MidpointNearestEven)
                    - Decimal::ONE;
                returns.insert(curr.date, change);
            }
            None => tracing::warn!(
                "Skipping return for {}: previous close on {} is {}",
                curr.date,
                prev.date,
                prev.close
            ),
        }
    }
    returns
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn sample(month: u32, close: &str) -> MergedPricing {
        MergedPricing::projected(
            NaiveDate::from_ymd_opt(2018, month, 28).unwrap(),
            Decimal::from_str(close).unwrap(),
        )
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn closes_10_15_12() {
        let returns = compute_returns(&[sample(1, "10"), sample(2, "15"), sample(3, "12")]);
        let values: Vec<_> = returns.values().copied().collect();
        assert_eq!(values, vec![dec("0.500000"), dec("-0.200000")]);

        let keys: Vec<_> = returns.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                NaiveDate::from_ymd_opt(2018, 2, 28).unwrap(),
                NaiveDate::from_ymd_opt(2018, 3, 28).unwrap()
            ]
        );
    }

    #[test]
    fn ratio_is_rounded_before_subtracting() {
        // 2/3 = 0.666666.. rounds to 0.666667
        let returns = compute_returns(&[sample(1, "3"), sample(2, "2")]);
        assert_eq!(returns.values().next().copied(), Some(dec("-0.333333")));
    }

    #[test]
    fn midpoint_rounds_to_even() {
        // 1.0000005 sits exactly between 1.000000 and 1.000001
        let returns = compute_returns(&[sample(1, "1"), sample(2, "1.0000005")]);
        assert_eq!(returns.values().next().copied(), Some(Decimal::ZERO));

        let returns = compute_returns(&[sample(1, "1"), sample(2, "1.0000015")]);
        assert_eq!(returns.values().next().copied(), Some(dec("0.000002")));
    }

    #[test]
    fn fewer_than_two_samples_is_empty() {
        assert!(compute_returns(&[]).is_empty());
        assert!(compute_returns(&[sample(1, "10")]).is_empty());
    }

    #[test]
    fn zero_previous_close_is_skipped() {
        let returns = compute_returns(&[sample(1, "0"), sample(2, "10"), sample(3, "20")]);
        assert_eq!(returns.len(), 1);
        assert_eq!(returns.values().next().copied(), Some(dec("1")));
    }
}
