//! Joins daily prices with same-day dividends.

use std::collections::HashMap;

use chrono::NaiveDate;
use pricecast_api::types::{DividendRecord, PriceRecord};
use rust_decimal::Decimal;

use crate::model::MergedPricing;

/// Merges prices with dividends paid on the same date.
///
/// The result is strictly ascending by date whatever the input order. When a
/// date has several price rows the first one wins, and likewise for
/// dividends. Days without a dividend get zero.
pub fn merge(prices: &[PriceRecord], dividends: &[DividendRecord]) -> Vec<MergedPricing> {
    let mut paid: HashMap<NaiveDate, Decimal> = HashMap::with_capacity(dividends.len());
    for dividend in dividends {
        paid.entry(dividend.date).or_insert(dividend.amount);
    }

    let mut merged: Vec<MergedPricing> = prices
        .iter()
        .map(|p| MergedPricing {
            date: p.date,
            open: p.open,
            high: p.high,
            low: p.low,
            close: p.close,
            dividend: paid.get(&p.date).copied().unwrap_or(Decimal::ZERO),
        })
        .collect();

    // Stable sort, so dedup keeps the first row seen for each date.
    merged.sort_by_key(|m| m.date);
    let before = merged.len();
    merged.dedup_by_key(|m| m.date);
    if merged.len() != before {
        tracing::debug!("Dropped {} duplicate price dates", before - merged.len());
    }
    merged
}
