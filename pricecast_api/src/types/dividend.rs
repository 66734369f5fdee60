//! Dividend rows from the provider's `events=div` download.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One validated row of the dividend table (`Date,Dividends`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DividendRecord {
    /// Ex-dividend date.
    pub date: NaiveDate,
    /// Cash amount per share.
    pub amount: Decimal,
}
