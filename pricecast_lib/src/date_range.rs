//! Resolution of optional start/end bounds into a concrete history window.

use chrono::{Months, NaiveDate, Utc};

use crate::error::PricecastError;

/// Look-back used when no start date is given, and for projections.
pub const DEFAULT_LOOKBACK_YEARS: u32 = 5;
/// Projection horizon used when none is given.
pub const DEFAULT_HORIZON_MONTHS: u32 = 240;

/// An inclusive `[start, end]` window with `start <= end <= today`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Resolves against today's UTC date.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, PricecastError> {
        Self::resolve_at(start, end, Utc::now().date_naive())
    }

    /// Resolves against `today`:
    /// - a missing start is `today` minus [`DEFAULT_LOOKBACK_YEARS`];
    /// - a start after `today` is rejected;
    /// - a missing end, or one after `today`, becomes `today`;
    /// - an end before the start is rejected.
    pub fn resolve_at(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, PricecastError> {
        let start = match start {
            Some(start) if start > today => {
                return Err(PricecastError::InvalidInput(format!(
                    "start date {} is in the future",
                    start
                )))
            }
            Some(start) => start,
            None => default_start(today),
        };

        let end = match end {
            Some(end) if end <= today => end,
            _ => today,
        };

        if end < start {
            return Err(PricecastError::InvalidInput(format!(
                "end date {} is before start date {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// The default projection window ending `today`.
    pub fn lookback_from(today: NaiveDate) -> Self {
        Self {
            start: default_start(today),
            end: today,
        }
    }
}

fn default_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(DEFAULT_LOOKBACK_YEARS * 12))
        .unwrap_or(NaiveDate::MIN)
}

/// `today` plus `months` calendar months, clamped to the last valid day.
pub fn projection_date(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}
