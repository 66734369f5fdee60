//! HTTP client for the quote provider's daily download endpoint.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::StatusCode;
use url::Url;

use crate::{
    parser::{parse_dividends, parse_prices},
    query::{HistoryQuery, Query},
    session::{SessionCookies, SessionManager},
    types::{DividendRecord, PriceRecord},
    user_agent::get_user_agent,
    Error,
};

pub const DEFAULT_QUERY_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_PAGE_URL: &str = "https://finance.yahoo.com";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const DOWNLOAD_PATH: [&str; 3] = ["v7", "finance", "download"];

/// Endpoints and limits for a [`Client`].
#[derive(Clone, Debug)]
pub struct ClientOptions {
    /// Host serving the download tables.
    pub query_url: String,
    /// Host serving the quote pages the crumb is scraped from.
    pub page_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            query_url: DEFAULT_QUERY_URL.to_string(),
            page_url: DEFAULT_PAGE_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// Outcome of a download that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fetched {
    Body(String),
    /// The provider has no data for the symbol.
    NotFound,
}

/// HTTP client for the quote provider.
///
/// One `reqwest::Client` and one session are shared by every request, so the
/// crumb and cookies acquired for the first call are reused until the
/// provider rejects them. Dropping a returned future cancels the request.
pub struct Client {
    http: reqwest::Client,
    query_url: String,
    session: SessionManager,
}

impl Client {
    /// Creates a client pointing at the production hosts.
    pub fn new() -> Result<Self, Error> {
        Self::with_options(ClientOptions::default())
    }

    /// Creates a client serving both pages and downloads from `base_url`.
    /// Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::with_options(ClientOptions {
            query_url: base_url.to_string(),
            page_url: base_url.to_string(),
            ..ClientOptions::default()
        })
    }

    pub fn with_options(options: ClientOptions) -> Result<Self, Error> {
        let cookies = Arc::new(SessionCookies::default());
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(options.timeout)
            .cookie_provider(Arc::clone(&cookies))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Transport(e)
            })?;
        let session = SessionManager::new(http.clone(), cookies, &options.page_url);
        Ok(Self {
            http,
            query_url: options.query_url,
            session,
        })
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    fn get_url(&self, query: &impl Query, crumb: &str) -> Result<Url, Error> {
        let mut url = Url::parse(&self.query_url).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::InvalidUrl(e)
        })?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(DOWNLOAD_PATH)
            .push(query.symbol());
        let mut url = query.add_to_url(&url);
        url.query_pairs_mut().append_pair("crumb", crumb);
        Ok(url)
    }

    async fn send(&self, url: Url) -> Result<reqwest::Response, Error> {
        self.http
            .get(url)
            .header("accept", "text/csv,text/plain,*/*")
            .header("accept-language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::Transport(e)
            })
    }

    /// Downloads one table, refreshing the session once if the provider
    /// answers 401.
    ///
    /// A 404 is [`Fetched::NotFound`]; a second 401 is
    /// [`Error::Unauthorized`]; any other non-success status is
    /// [`Error::HttpStatus`].
    pub async fn fetch(&self, query: &impl Query) -> Result<Fetched, Error> {
        let ticker = query.symbol();
        let credentials = self.session.acquire(ticker).await?;
        let mut resp = self.send(self.get_url(query, &credentials.crumb)?).await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            drop(resp);
            tracing::debug!(
                "Crumb generation {} rejected for {}, refreshing session",
                credentials.generation,
                ticker
            );
            self.session.invalidate(&credentials).await;
            let refreshed = self.session.acquire(ticker).await?;
            tracing::info!("Retrying {} with a fresh session", ticker);
            resp = self.send(self.get_url(query, &refreshed.crumb)?).await?;

            if resp.status() == StatusCode::UNAUTHORIZED {
                tracing::error!("Still unauthorized for {} after refresh", ticker);
                return Err(Error::Unauthorized);
            }
        }

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("No data for {}", ticker);
            return Ok(Fetched::NotFound);
        }

        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Transport(e)
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(Fetched::Body(body))
    }

    /// Daily prices for `symbol` over `[start, end]`, in provider order.
    /// Unknown symbols yield an empty list.
    pub async fn get_price_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceRecord>, Error> {
        tracing::info!("Acquiring price data for {} from {} to {}", symbol, start, end);
        match self.fetch(&HistoryQuery::prices(symbol, start, end)).await? {
            Fetched::Body(body) => Ok(parse_prices(body.lines())),
            Fetched::NotFound => {
                tracing::warn!("No price data available for {}", symbol);
                Ok(Vec::new())
            }
        }
    }

    /// Dividends for `symbol` over `[start, end]`. Unknown symbols yield an
    /// empty list.
    pub async fn get_dividend_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DividendRecord>, Error> {
        tracing::info!("Acquiring dividend data for {} from {} to {}", symbol, start, end);
        match self
            .fetch(&HistoryQuery::dividends(symbol, start, end))
            .await?
        {
            Fetched::Body(body) => Ok(parse_dividends(body.lines())),
            Fetched::NotFound => {
                tracing::warn!("No dividend data available for {}", symbol);
                Ok(Vec::new())
            }
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut cut = MAX;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...[truncated]", &body[..cut])
}
