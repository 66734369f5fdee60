//! Runtime settings read from `PRICECAST_*` environment variables.

use std::time::Duration;

use pricecast_api::ClientOptions;

use crate::projection::NUM_SIMULATIONS;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Settings for a [`PricingService`](crate::PricingService).
#[derive(Clone, Debug)]
pub struct Config {
    pub client: ClientOptions,
    pub cache_ttl: Duration,
    pub simulations: usize,
    /// Master seed for projections; a fresh one per projection when unset.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client: ClientOptions::default(),
            cache_ttl: DEFAULT_CACHE_TTL,
            simulations: NUM_SIMULATIONS,
            seed: None,
        }
    }
}

impl Config {
    /// Reads the process environment. Unset or unparsable values fall back
    /// to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let client = ClientOptions {
            query_url: lookup("PRICECAST_QUERY_URL").unwrap_or(defaults.client.query_url),
            page_url: lookup("PRICECAST_PAGE_URL").unwrap_or(defaults.client.page_url),
            timeout: Duration::from_secs(env_u64(
                &lookup,
                "PRICECAST_TIMEOUT_SECS",
                defaults.client.timeout.as_secs(),
            )),
        };
        Self {
            client,
            cache_ttl: Duration::from_secs(env_u64(
                &lookup,
                "PRICECAST_CACHE_TTL_SECS",
                defaults.cache_ttl.as_secs(),
            )),
            simulations: env_usize(&lookup, "PRICECAST_SIMULATIONS", defaults.simulations),
            seed: lookup("PRICECAST_SEED").and_then(|val| val.parse::<u64>().ok()),
        }
    }
}

fn env_u64<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize<F>(lookup: &F, key: &str, default: usize) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}
