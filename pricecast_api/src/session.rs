//! Crumb + cookie session shared by every request of one [`Client`](crate::Client).
//!
//! The provider wants a short-lived "crumb" token in the query string and the
//! cookies set by a preliminary page load for a ticker. Both live here, behind
//! a single async mutex, so concurrent requests never interleave an
//! invalidation with somebody else's acquisition.

use std::sync::{Arc, OnceLock, RwLock};

use regex::Regex;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use reqwest::Url;
use tokio::sync::Mutex;

use crate::Error;

/// Cookie store shared between the session and the HTTP client.
///
/// Wraps a [`Jar`] so the whole store can be dropped when the session is
/// invalidated; a plain `Jar` can only be added to.
#[derive(Debug, Default)]
pub struct SessionCookies {
    jar: RwLock<Jar>,
}

impl SessionCookies {
    /// Forget every cookie.
    pub fn clear(&self) {
        *self.jar.write().unwrap_or_else(|e| e.into_inner()) = Jar::default();
    }
}

impl CookieStore for SessionCookies {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        self.jar
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .set_cookies(cookie_headers, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.jar
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .cookies(url)
    }
}

/// Where the session is in its lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Never acquired.
    Empty,
    /// Holding a crumb; cookies are in the shared store.
    Active { crumb: String },
    /// Cleared after a 401. The next `acquire` loads a fresh crumb.
    Invalidated,
}

/// A crumb together with the acquisition it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub crumb: String,
    /// Incremented on every successful acquisition.
    pub generation: u64,
}

struct Inner {
    state: SessionState,
    generation: u64,
}

/// Owns the crumb and the cookie jar, and is the only place they change.
pub struct SessionManager {
    http: reqwest::Client,
    cookies: Arc<SessionCookies>,
    page_url: String,
    inner: Mutex<Inner>,
}

impl SessionManager {
    /// `http` must have been built with `cookies` as its cookie provider.
    pub fn new(http: reqwest::Client, cookies: Arc<SessionCookies>, page_url: &str) -> Self {
        Self {
            http,
            cookies,
            page_url: page_url.to_string(),
            inner: Mutex::new(Inner {
                state: SessionState::Empty,
                generation: 0,
            }),
        }
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state.clone()
    }

    /// Returns the current credentials, loading a crumb for `ticker` first if
    /// the session is empty or invalidated.
    ///
    /// The lock is held across the page load, so concurrent callers wait for
    /// one acquisition and then share its result.
    pub async fn acquire(&self, ticker: &str) -> Result<Credentials, Error> {
        let mut inner = self.inner.lock().await;
        if let SessionState::Active { crumb } = &inner.state {
            return Ok(Credentials {
                crumb: crumb.clone(),
                generation: inner.generation,
            });
        }

        let crumb = self.request_crumb(ticker).await?;
        inner.generation += 1;
        inner.state = SessionState::Active {
            crumb: crumb.clone(),
        };
        tracing::debug!(
            "Acquired crumb for {} (generation {})",
            ticker,
            inner.generation
        );
        Ok(Credentials {
            crumb,
            generation: inner.generation,
        })
    }

    /// Clears the crumb and cookies if `stale` is still the live acquisition.
    ///
    /// Returns `false` when another caller already refreshed or cleared the
    /// session, in which case nothing changes.
    pub async fn invalidate(&self, stale: &Credentials) -> bool {
        let mut inner = self.inner.lock().await;
        let is_live = inner.generation == stale.generation
            && matches!(inner.state, SessionState::Active { .. });
        if !is_live {
            tracing::debug!(
                "Session moved past generation {} already, not invalidating",
                stale.generation
            );
            return false;
        }
        inner.state = SessionState::Invalidated;
        self.cookies.clear();
        true
    }

    fn crumb_url(&self, ticker: &str) -> Result<Url, Error> {
        let mut url = Url::parse(&self.page_url)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(&["quote", ticker, "history"]);
        url.query_pairs_mut().append_pair("p", ticker);
        Ok(url)
    }

    async fn request_crumb(&self, ticker: &str) -> Result<String, Error> {
        let session_error = |reason: String| Error::Session {
            ticker: ticker.to_string(),
            reason,
        };

        let url = self.crumb_url(ticker)?;
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| session_error(e.to_string()))?;
        let status = resp.status();
        let page = resp
            .text()
            .await
            .map_err(|e| session_error(e.to_string()))?;

        if !status.is_success() {
            return Err(session_error(format!("HTTP {}", status)));
        }

        extract_crumb(&page).ok_or_else(|| session_error("no crumb found in page".to_string()))
    }
}

fn crumb_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#""CrumbStore"\s*:\s*\{\s*"crumb"\s*:\s*"([^"]+)""#)
            .expect("crumb pattern is a valid regex")
    })
}

/// Pulls the crumb out of a quote page, unescaping `\u002F` to `/`.
pub fn extract_crumb(page: &str) -> Option<String> {
    crumb_pattern()
        .captures(page)
        .map(|caps| caps[1].replace("\\u002F", "/"))
}
