//! Library layer for pricecast: history merging, monthly statistics and the
//! Monte Carlo price projection.
//!
//! Wraps the `pricecast_api` crate with an in-memory TTL cache, input
//! validation, and the [`PricingService`] boundary used by the CLI.

pub mod cache;
pub mod config;
pub mod date_range;
pub mod error;
pub mod history;
pub mod model;
pub mod projection;
pub mod returns;
pub mod sampling;
pub mod service;
pub mod validation;
pub mod volatility;

pub use pricecast_api;
pub use pricecast_api::types;

pub use cache::MemoryCache;
pub use config::Config;
pub use date_range::{DateRange, DEFAULT_HORIZON_MONTHS, DEFAULT_LOOKBACK_YEARS};
pub use error::PricecastError;
pub use model::{MergedPricing, ProjectionResult, ReturnSeries};
pub use projection::{MonteCarloProjector, TerminalSampling, TerminalStats, NUM_SIMULATIONS};
pub use service::{project_history, PricingService, ProjectionSettings};
