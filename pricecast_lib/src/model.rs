//! Shared value types produced by the pipeline.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One trading day with its dividend joined in.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MergedPricing {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// Zero when nothing was paid that day.
    pub dividend: Decimal,
}

impl MergedPricing {
    /// A projected point: only `date` and `close` carry information.
    pub fn projected(date: NaiveDate, close: Decimal) -> Self {
        Self {
            date,
            open: Decimal::ZERO,
            high: Decimal::ZERO,
            low: Decimal::ZERO,
            close,
            dividend: Decimal::ZERO,
        }
    }
}

/// Fractional change keyed by the later date of each sample pair, ascending.
pub type ReturnSeries = BTreeMap<NaiveDate, Decimal>;

/// Order statistics of the simulated terminal prices.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub min: MergedPricing,
    pub median: MergedPricing,
    pub max: MergedPricing,
    /// Population standard deviation of the monthly returns.
    pub monthly_volatility: f64,
    pub last_close: Decimal,
    /// Terminal values that were ranked (after dedupe, if enabled).
    pub ranked: usize,
}

impl ProjectionResult {
    /// `[min, median, max]`.
    pub fn points(&self) -> [&MergedPricing; 3] {
        [&self.min, &self.median, &self.max]
    }
}
