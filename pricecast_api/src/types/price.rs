//! Daily price rows as published by the provider's history download.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One validated row of the daily price table
/// (`Date,Open,High,Low,Close,Adj Close,Volume`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    /// Trading day. Unique within one series.
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// Close adjusted for splits and distributions.
    pub adj_close: Decimal,
    pub volume: Decimal,
}
