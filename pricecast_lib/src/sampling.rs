//! Calendar-month resampling.

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::model::MergedPricing;

/// Keeps one record per (year, month): the one with the latest date.
///
/// A trailing partial month is represented by its latest available day, as
/// if that were month end.
pub fn last_per_month(series: &[MergedPricing]) -> Vec<MergedPricing> {
    let mut months: BTreeMap<(i32, u32), &MergedPricing> = BTreeMap::new();
    for record in series {
        let key = (record.date.year(), record.date.month());
        months
            .entry(key)
            .and_modify(|kept| {
                if record.date > kept.date {
                    *kept = record;
                }
            })
            .or_insert(record);
    }
    months.into_values().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn day(y: i32, m: u32, d: u32, close: i64) -> MergedPricing {
        MergedPricing {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            open: Decimal::ZERO,
            high: Decimal::ZERO,
            low: Decimal::ZERO,
            close: Decimal::from(close),
            dividend: Decimal::ZERO,
        }
    }

    #[test]
    fn november_2018_keeps_the_30th() {
        let series = vec![
            day(2018, 10, 31, 1),
            day(2018, 11, 1, 2),
            day(2018, 11, 30, 3),
        ];
        let monthly = last_per_month(&series);
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].date, NaiveDate::from_ymd_opt(2018, 10, 31).unwrap());
        assert_eq!(monthly[1].date, NaiveDate::from_ymd_opt(2018, 11, 30).unwrap());
        assert_eq!(monthly[1].close, Decimal::from(3));
    }

    #[test]
    fn one_record_per_month_ascending() {
        let series = vec![
            day(2019, 2, 28, 4),
            day(2018, 12, 31, 2),
            day(2019, 1, 15, 3),
            day(2018, 12, 3, 1),
            day(2019, 1, 2, 9),
        ];
        let monthly = last_per_month(&series);
        let dates: Vec<_> = monthly
            .iter()
            .map(|m| (m.date.year(), m.date.month(), m.date.day()))
            .collect();
        assert_eq!(dates, vec![(2018, 12, 31), (2019, 1, 15), (2019, 2, 28)]);
    }

    #[test]
    fn same_month_in_different_years_is_separate() {
        let monthly = last_per_month(&[day(2017, 5, 1, 1), day(2018, 5, 1, 2)]);
        assert_eq!(monthly.len(), 2);
    }

    #[test]
    fn empty_series() {
        assert!(last_per_month(&[]).is_empty());
    }
}
