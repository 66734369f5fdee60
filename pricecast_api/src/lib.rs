mod client;
mod errors;
pub mod parser;
mod query;
pub mod session;
pub mod types;
mod user_agent;
pub use self::client::{
    Client, ClientOptions, Fetched, DEFAULT_PAGE_URL, DEFAULT_QUERY_URL, REQUEST_TIMEOUT,
};
pub use self::errors::Error;
pub use self::query::{Events, HistoryQuery, Query};
pub use self::session::{Credentials, SessionManager, SessionState};
