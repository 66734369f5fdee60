//! Line-oriented parsing of the provider's comma-delimited download tables.
//!
//! Row-level problems never surface as errors: a line with the wrong field
//! count, a date that is not strict `YYYY-MM-DD`, or a numeric field that does
//! not parse to a finite number is dropped and the rest of the table is kept.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::types::{DividendRecord, PriceRecord};

/// Number of leading lines (the header) skipped before parsing rows.
pub const PAYLOAD_START_INDEX: usize = 1;

const PRICE_FIELDS: usize = 7;
const DIVIDEND_FIELDS: usize = 2;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse the daily price table. The first line is treated as the header.
///
/// Output keeps input order.
pub fn parse_prices<'a, I>(lines: I) -> Vec<PriceRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .skip(PAYLOAD_START_INDEX)
        .filter_map(|line| {
            let record = split_fields(line, PRICE_FIELDS).and_then(|f| price_record(&f));
            if record.is_none() {
                tracing::trace!("Dropping malformed price row: {}", line);
            }
            record
        })
        .collect()
}

/// Parse the dividend table. The first line is treated as the header.
pub fn parse_dividends<'a, I>(lines: I) -> Vec<DividendRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .skip(PAYLOAD_START_INDEX)
        .filter_map(|line| {
            let record = split_fields(line, DIVIDEND_FIELDS).and_then(|f| dividend_record(&f));
            if record.is_none() {
                tracing::trace!("Dropping malformed dividend row: {}", line);
            }
            record
        })
        .collect()
}

/// Splits on `,` and requires exactly `expected` fields. Trailing empty
/// fields are not counted.
fn split_fields(line: &str, expected: usize) -> Option<Vec<&str>> {
    let fields: Vec<&str> = line.trim_end_matches(',').split(',').collect();
    (fields.len() == expected).then_some(fields)
}

fn price_record(fields: &[&str]) -> Option<PriceRecord> {
    Some(PriceRecord {
        date: parse_trade_date(fields[0])?,
        open: parse_decimal(fields[1])?,
        high: parse_decimal(fields[2])?,
        low: parse_decimal(fields[3])?,
        close: parse_decimal(fields[4])?,
        adj_close: parse_decimal(fields[5])?,
        volume: parse_decimal(fields[6])?,
    })
}

fn dividend_record(fields: &[&str]) -> Option<DividendRecord> {
    Some(DividendRecord {
        date: parse_trade_date(fields[0])?,
        amount: parse_decimal(fields[1])?,
    })
}

/// Strict calendar date: exactly `YYYY-MM-DD`, zero padded.
pub fn parse_trade_date(field: &str) -> Option<NaiveDate> {
    if field.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(field, DATE_FORMAT).ok()
}

/// Lenient numeric field: surrounding whitespace and exponent notation are
/// accepted, the value goes through `f64` and is stored at its shortest
/// decimal representation. `None` on anything non-finite or unparsable.
pub fn parse_decimal(field: &str) -> Option<Decimal> {
    let value: f64 = field.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn dec(v: f64) -> Decimal {
        Decimal::from_f64(v).unwrap()
    }

    #[test]
    fn parse_prices_drops_malformed_rows() {
        let lines = vec![
            "Date,Open,High,Low,Close,Adj Close,Volume",
            "2017-01-01,1,2,3,100,5,6",
            "2017-01-02,1,2,3,101,11,12",
            "wrongDate,1,2,3,4,5,6",
            "1,2,3,4,5",
            "2017-01-02,1,2,3,wrongClose,5,6",
        ];
        let records = parse_prices(lines);

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            PriceRecord {
                date: date("2017-01-01"),
                open: dec(1.0),
                high: dec(2.0),
                low: dec(3.0),
                close: dec(100.0),
                adj_close: dec(5.0),
                volume: dec(6.0),
            }
        );
        assert_eq!(records[1].date, date("2017-01-02"));
        assert_eq!(records[1].close, dec(101.0));
        assert_eq!(records[1].adj_close, dec(11.0));
        assert_eq!(records[1].volume, dec(12.0));
    }

    #[test]
    fn parse_dividends_drops_malformed_rows() {
        let lines = vec![
            "Date,Dividends",
            "2017-01-01,0.1",
            "2017-01-02,0.24",
            "wrongDate,1",
            "1",
            "2017-01-02,wrongDividend",
        ];
        let records = parse_dividends(lines);

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            DividendRecord {
                date: date("2017-01-01"),
                amount: Decimal::from_str("0.1").unwrap(),
            }
        );
        assert_eq!(records[1].amount, Decimal::from_str("0.24").unwrap());
    }

    #[test]
    fn header_is_always_skipped() {
        // Even a well-formed first line is treated as the header.
        let lines = vec!["2017-01-01,1,2,3,4,5,6", "2017-01-02,1,2,3,4,5,6"];
        let records = parse_prices(lines);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, date("2017-01-02"));
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(parse_prices(Vec::<&str>::new()).is_empty());
        assert!(parse_dividends(vec!["Date,Dividends"]).is_empty());
    }

    #[test]
    fn too_many_fields_is_dropped() {
        let lines = vec!["h", "2017-01-01,1,2,3,4,5,6,7"];
        assert!(parse_prices(lines).is_empty());
    }

    #[test]
    fn trailing_empty_fields_are_ignored() {
        let lines = vec!["h", "2017-01-01,1,2,3,4,5,6,", "2017-01-02,0.5,,"];
        assert_eq!(parse_prices(lines.clone()).len(), 1);
        assert_eq!(parse_dividends(lines).len(), 1);
    }

    #[test]
    fn negative_one_is_a_value_not_a_failure() {
        let lines = vec!["h", "2017-01-01,-1,2,3,4,5,6", "2017-01-02,-1.5"];
        let prices = parse_prices(lines.clone());
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].open, dec(-1.0));

        let dividends = parse_dividends(lines);
        assert_eq!(dividends.len(), 1);
        assert_eq!(dividends[0].amount, dec(-1.5));
    }

    #[test]
    fn null_and_non_finite_fields_drop_the_row() {
        let lines = vec![
            "h",
            "2017-01-01,null,null,null,null,null,null",
            "2017-01-02,NaN,2,3,4,5,6",
            "2017-01-03,1,inf,3,4,5,6",
            "2017-01-04,1,2,3,4,5,6",
        ];
        let records = parse_prices(lines);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, date("2017-01-04"));
    }

    #[test]
    fn numeric_fields_are_lenient() {
        assert_eq!(parse_decimal(" 12.5 "), Some(dec(12.5)));
        assert_eq!(parse_decimal("1e3"), Some(dec(1000.0)));
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn dates_are_strict() {
        assert_eq!(parse_trade_date("2018-11-30"), Some(date("2018-11-30")));
        assert_eq!(parse_trade_date("2018-1-30"), None);
        assert_eq!(parse_trade_date("2018-02-30"), None);
        assert_eq!(parse_trade_date(" 2018-11-30"), None);
        assert_eq!(parse_trade_date("30/11/2018"), None);
    }

    #[test]
    fn crlf_bodies_parse_through_lines() {
        let body = "Date,Dividends\r\n2017-01-01,0.1\r\n2017-01-02,0.2\r\n";
        assert_eq!(parse_dividends(body.lines()).len(), 2);
    }
}
