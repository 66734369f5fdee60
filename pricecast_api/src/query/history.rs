use chrono::{NaiveDate, NaiveTime};
use url::Url;

use super::common::{Events, Query};

/// Query for the daily download endpoint, covering `[start, end]`.
///
/// Both bounds are sent as UTC start-of-day epoch seconds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryQuery {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub events: Events,
}

impl HistoryQuery {
    /// Daily price table for `symbol`.
    pub fn prices(symbol: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: symbol.to_string(),
            start,
            end,
            events: Events::History,
        }
    }

    /// Dividend table for `symbol`.
    pub fn dividends(symbol: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: symbol.to_string(),
            start,
            end,
            events: Events::Dividends,
        }
    }
}

fn epoch_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

impl Query for HistoryQuery {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("period1", &epoch_seconds(self.start).to_string())
            .append_pair("period2", &epoch_seconds(self.end).to_string())
            .append_pair("interval", "1d")
            .append_pair("events", &self.events.to_string());
        url
    }
}
