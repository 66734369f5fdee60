//! Shared query infrastructure: the [`Query`] trait and the [`Events`] selector.

use std::fmt;

use url::Url;

/// Trait implemented by all download queries. Provides URL serialization
/// for the provider's query-string parameters.
pub trait Query {
    /// Ticker symbol the query is scoped to. Session acquisition uses the same ticker.
    fn symbol(&self) -> &str;

    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;
}

/// Which table the download endpoint returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Events {
    /// Daily OHLC + adjusted close + volume. This is the default.
    #[default]
    History,
    /// Cash dividends.
    Dividends,
}

impl fmt::Display for Events {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Events::History => write!(f, "history"),
            Events::Dividends => write!(f, "div"),
        }
    }
}
