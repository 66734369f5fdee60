mod common;
pub use self::common::{Events, Query};

mod history;
pub use self::history::HistoryQuery;
