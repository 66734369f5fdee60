//! Error types for the quote provider client.

/// Errors that can occur when talking to the quote provider.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The crumb/cookie acquisition request failed or returned no crumb.
    #[error("session acquisition failed for {ticker}: {reason}")]
    Session { ticker: String, reason: String },
    /// Network or I/O failure, including timeouts.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The provider still answered 401 after the session was refreshed once.
    #[error("still unauthorized after refreshing the session")]
    Unauthorized,
    /// The provider returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// A request URL could not be built from the configured base URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// True for failures of the transport itself rather than of authentication setup.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Unauthorized | Error::HttpStatus { .. }
        )
    }
}
