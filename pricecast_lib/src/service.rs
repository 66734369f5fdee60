//! The library's entry point: history retrieval and projection for a symbol.

use chrono::{NaiveDate, Utc};
use pricecast_api::Client;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::cache::MemoryCache;
use crate::config::Config;
use crate::date_range::{projection_date, DateRange};
use crate::error::PricecastError;
use crate::history::merge;
use crate::model::{MergedPricing, ProjectionResult};
use crate::projection::{MonteCarloProjector, TerminalSampling, NUM_SIMULATIONS};
use crate::returns::compute_returns;
use crate::sampling::last_per_month;
use crate::validation::{validate_horizon, validate_symbol};
use crate::volatility::volatility;

/// Decimal places kept on projected prices.
pub const PROJECTED_PRICE_SCALE: u32 = 6;

/// How projections are simulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectionSettings {
    pub simulations: usize,
    /// Fixed master seed; drawn per projection when `None`.
    pub seed: Option<u64>,
    pub sampling: TerminalSampling,
    pub parallel: bool,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            simulations: NUM_SIMULATIONS,
            seed: None,
            sampling: TerminalSampling::default(),
            parallel: true,
        }
    }
}

impl ProjectionSettings {
    pub fn projector(&self) -> MonteCarloProjector {
        let projector = match self.seed {
            Some(seed) => MonteCarloProjector::new(seed),
            None => MonteCarloProjector::from_entropy(),
        };
        projector
            .with_simulations(self.simulations)
            .with_sampling(self.sampling)
            .with_parallelism(self.parallel)
    }
}

/// Fetches, merges and caches history, and projects forward prices from it.
///
/// One service holds one [`Client`], so every call shares the same provider
/// session.
pub struct PricingService {
    client: Client,
    cache: MemoryCache<Vec<MergedPricing>>,
    settings: ProjectionSettings,
}

impl PricingService {
    pub fn new(config: &Config) -> Result<Self, PricecastError> {
        let client = Client::with_options(config.client.clone())?;
        let settings = ProjectionSettings {
            simulations: config.simulations,
            seed: config.seed,
            ..ProjectionSettings::default()
        };
        Ok(Self::with_client(client, MemoryCache::new(config.cache_ttl)).with_settings(settings))
    }

    pub fn with_client(client: Client, cache: MemoryCache<Vec<MergedPricing>>) -> Self {
        Self {
            client,
            cache,
            settings: ProjectionSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ProjectionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ProjectionSettings {
        &self.settings
    }

    /// Merged daily history for `symbol` over `range`, ascending by date.
    ///
    /// Prices and dividends are downloaded concurrently. A symbol the
    /// provider does not know yields an empty series. A range with its start
    /// after its end is rejected before any request.
    pub async fn get_historical_series(
        &self,
        symbol: &str,
        range: DateRange,
    ) -> Result<Vec<MergedPricing>, PricecastError> {
        let symbol = validate_symbol(symbol)?;
        if range.start > range.end {
            return Err(PricecastError::InvalidInput(format!(
                "start date {} is after end date {}",
                range.start, range.end
            )));
        }
        let cache_key = format!("history:{}:{}:{}", symbol, range.start, range.end);
        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::debug!("Cache hit for {}", cache_key);
            return Ok(cached);
        }

        let (prices, dividends) = tokio::try_join!(
            self.client
                .get_price_history(&symbol, range.start, range.end),
            self.client
                .get_dividend_history(&symbol, range.start, range.end),
        )?;

        let merged = merge(&prices, &dividends);
        tracing::info!(
            "Merged {} trading days and {} dividends for {}",
            merged.len(),
            dividends.len(),
            symbol
        );
        self.cache.set(cache_key, merged.clone());
        Ok(merged)
    }

    /// Projects the close `horizon_months` from today, using the default
    /// look-back window of history.
    pub async fn get_projection(
        &self,
        symbol: &str,
        horizon_months: u32,
    ) -> Result<ProjectionResult, PricecastError> {
        self.get_projection_with(symbol, horizon_months, &self.settings)
            .await
    }

    /// Like [`get_projection`](Self::get_projection) with one-off settings.
    pub async fn get_projection_with(
        &self,
        symbol: &str,
        horizon_months: u32,
        settings: &ProjectionSettings,
    ) -> Result<ProjectionResult, PricecastError> {
        let horizon_months = validate_horizon(horizon_months)?;
        let today = Utc::now().date_naive();
        let history = self
            .get_historical_series(symbol, DateRange::lookback_from(today))
            .await?;
        project_history(&history, horizon_months, today, &settings.projector())
    }
}

/// Monthly samples, returns, volatility and simulation for an already merged
/// history. Projected points are dated `today + horizon_months`.
pub fn project_history(
    history: &[MergedPricing],
    horizon_months: u32,
    today: NaiveDate,
    projector: &MonteCarloProjector,
) -> Result<ProjectionResult, PricecastError> {
    let monthly = last_per_month(history);
    if monthly.len() < 2 {
        return Err(PricecastError::InsufficientHistory {
            samples: monthly.len(),
        });
    }

    let returns = compute_returns(&monthly);
    let monthly_volatility = volatility(&returns)?;
    let last_close = monthly[monthly.len() - 1].close;
    let start = last_close.to_f64().ok_or_else(|| {
        PricecastError::OutOfRange(format!("last close {} is not representable", last_close))
    })?;

    tracing::debug!(
        "Projecting {} months from {} with monthly volatility {:.6}",
        horizon_months,
        last_close,
        monthly_volatility
    );
    let stats = projector.project(horizon_months, start, monthly_volatility)?;

    let date = projection_date(today, horizon_months);
    Ok(ProjectionResult {
        min: MergedPricing::projected(date, to_price(stats.min)?),
        median: MergedPricing::projected(date, to_price(stats.median)?),
        max: MergedPricing::projected(date, to_price(stats.max)?),
        monthly_volatility,
        last_close,
        ranked: stats.ranked,
    })
}

fn to_price(value: f64) -> Result<Decimal, PricecastError> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(PROJECTED_PRICE_SCALE))
        .ok_or_else(|| {
            PricecastError::OutOfRange(format!("projected price {} does not fit a decimal", value))
        })
}
