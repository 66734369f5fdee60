//! Monte Carlo projection of a forward price.
//!
//! Each run is an independent random walk with one standard-normal shock per
//! simulated month. Run `i` draws from its own RNG whose seed is derived from
//! the master seed and `i` with BLAKE3, so the terminal values do not depend on
//! how runs are scheduled across threads.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use rayon::prelude::*;

use crate::error::PricecastError;

/// Number of simulated paths per projection.
pub const NUM_SIMULATIONS: usize = 1000;

/// How terminal values are prepared before ranking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TerminalSampling {
    /// Drop bit-identical terminal values before ranking.
    #[default]
    Distinct,
    /// Rank every run's terminal value.
    All,
}

/// Order statistics of the ranked terminal prices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerminalStats {
    pub min: f64,
    /// Element `(ranked - 1) / 2` of the ascending terminal values.
    pub median: f64,
    pub max: f64,
    pub ranked: usize,
}

#[derive(Clone, Debug)]
pub struct MonteCarloProjector {
    master_seed: u64,
    simulations: usize,
    sampling: TerminalSampling,
    parallel: bool,
}

impl MonteCarloProjector {
    pub fn new(master_seed: u64) -> Self {
        Self {
            master_seed,
            simulations: NUM_SIMULATIONS,
            sampling: TerminalSampling::default(),
            parallel: true,
        }
    }

    /// Projector with a master seed drawn from the thread RNG.
    pub fn from_entropy() -> Self {
        let seed: u64 = rand::thread_rng().gen();
        tracing::debug!("Using master seed {} for projection", seed);
        Self::new(seed)
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn with_simulations(mut self, simulations: usize) -> Self {
        self.simulations = simulations;
        self
    }

    pub fn with_sampling(mut self, sampling: TerminalSampling) -> Self {
        self.sampling = sampling;
        self
    }

    /// Enables or disables running simulations on the rayon pool.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Seed of run `run`, independent of the order runs are derived in.
    pub fn sub_seed(&self, run: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(&run.to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    fn simulate_run(
        &self,
        run: usize,
        horizon_months: u32,
        last_close: f64,
        volatility: f64,
    ) -> f64 {
        let mut rng = StdRng::seed_from_u64(self.sub_seed(run as u64));
        let mut price = last_close;
        for _ in 0..horizon_months {
            let z: f64 = StandardNormal.sample(&mut rng);
            price = floor_at_zero(price * (1.0 + z * volatility));
        }
        price
    }

    /// Terminal price of every run, in run order.
    pub fn terminal_prices(
        &self,
        horizon_months: u32,
        last_close: f64,
        monthly_volatility: f64,
    ) -> Result<Vec<f64>, PricecastError> {
        self.check_inputs(horizon_months, last_close, monthly_volatility)?;

        let runs = 0..self.simulations;
        let terminals: Vec<f64> = if self.parallel {
            runs.into_par_iter()
                .map(|run| self.simulate_run(run, horizon_months, last_close, monthly_volatility))
                .collect()
        } else {
            runs.map(|run| self.simulate_run(run, horizon_months, last_close, monthly_volatility))
                .collect()
        };
        Ok(terminals)
    }

    /// Simulates `horizon_months` of monthly shocks from `last_close` and
    /// ranks the terminal prices.
    pub fn project(
        &self,
        horizon_months: u32,
        last_close: f64,
        monthly_volatility: f64,
    ) -> Result<TerminalStats, PricecastError> {
        let mut terminals = self.terminal_prices(horizon_months, last_close, monthly_volatility)?;

        terminals.sort_by(f64::total_cmp);
        if self.sampling == TerminalSampling::Distinct {
            terminals.dedup_by(|a, b| a.to_bits() == b.to_bits());
        }

        let ranked = terminals.len();
        tracing::debug!(
            "Ranked {} terminal values from {} simulations",
            ranked,
            self.simulations
        );
        Ok(TerminalStats {
            min: terminals[0],
            median: terminals[(ranked - 1) / 2],
            max: terminals[ranked - 1],
            ranked,
        })
    }

    fn check_inputs(
        &self,
        horizon_months: u32,
        last_close: f64,
        monthly_volatility: f64,
    ) -> Result<(), PricecastError> {
        if horizon_months < 1 {
            return Err(PricecastError::InvalidInput(
                "horizon must be at least one month".to_string(),
            ));
        }
        if !last_close.is_finite() {
            return Err(PricecastError::InvalidInput(format!(
                "last close must be finite, got {}",
                last_close
            )));
        }
        if !monthly_volatility.is_finite() || monthly_volatility < 0.0 {
            return Err(PricecastError::InvalidInput(format!(
                "volatility must be finite and non-negative, got {}",
                monthly_volatility
            )));
        }
        if self.simulations < 1 {
            return Err(PricecastError::InvalidInput(
                "at least one simulation is required".to_string(),
            ));
        }
        Ok(())
    }
}

// Also maps -0.0 to 0.0 so zeros compare bit-equal when deduplicating.
fn floor_at_zero(price: f64) -> f64 {
    if price > 0.0 {
        price
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_projection() {
        let a = MonteCarloProjector::new(42).project(24, 100.0, 0.05).unwrap();
        let b = MonteCarloProjector::new(42).project(24, 100.0, 0.05).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = MonteCarloProjector::new(1).project(24, 100.0, 0.05).unwrap();
        let b = MonteCarloProjector::new(2).project(24, 100.0, 0.05).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn parallel_matches_sequential() {
        let parallel = MonteCarloProjector::new(7).with_parallelism(true);
        let sequential = MonteCarloProjector::new(7).with_parallelism(false);
        assert_eq!(
            parallel.terminal_prices(36, 50.0, 0.08).unwrap(),
            sequential.terminal_prices(36, 50.0, 0.08).unwrap()
        );
        assert_eq!(
            parallel.project(36, 50.0, 0.08).unwrap(),
            sequential.project(36, 50.0, 0.08).unwrap()
        );
    }

    #[test]
    fn order_statistics_are_ordered() {
        let stats = MonteCarloProjector::new(3).project(240, 178.58, 0.07).unwrap();
        assert!(stats.min <= stats.median);
        assert!(stats.median <= stats.max);
        assert!(stats.min >= 0.0);
        assert!(stats.ranked <= NUM_SIMULATIONS);
    }

    #[test]
    fn single_month_matches_one_draw_per_run() {
        let projector = MonteCarloProjector::new(11)
            .with_simulations(5)
            .with_sampling(TerminalSampling::All);
        let terminals = projector.terminal_prices(1, 100.0, 0.1).unwrap();

        for (run, terminal) in terminals.iter().enumerate() {
            let mut rng = StdRng::seed_from_u64(projector.sub_seed(run as u64));
            let z: f64 = StandardNormal.sample(&mut rng);
            assert_eq!(*terminal, floor_at_zero(100.0 * (1.0 + z * 0.1)));
        }
    }

    #[test]
    fn zero_volatility_collapses_to_last_close() {
        let stats = MonteCarloProjector::new(5).project(12, 80.0, 0.0).unwrap();
        assert_eq!(stats.ranked, 1);
        assert_eq!((stats.min, stats.median, stats.max), (80.0, 80.0, 80.0));
    }

    #[test]
    fn all_sampling_ranks_every_run() {
        let stats = MonteCarloProjector::new(5)
            .with_sampling(TerminalSampling::All)
            .project(12, 80.0, 0.0)
            .unwrap();
        assert_eq!(stats.ranked, NUM_SIMULATIONS);
        assert_eq!(stats.median, 80.0);
    }

    #[test]
    fn median_index_is_lower_middle() {
        let projector = MonteCarloProjector::new(9)
            .with_simulations(4)
            .with_sampling(TerminalSampling::All);
        let mut terminals = projector.terminal_prices(6, 10.0, 0.2).unwrap();
        terminals.sort_by(f64::total_cmp);
        let stats = projector.project(6, 10.0, 0.2).unwrap();
        assert_eq!(stats.median, terminals[1]);
        assert_eq!(stats.min, terminals[0]);
        assert_eq!(stats.max, terminals[3]);
    }

    #[test]
    fn prices_never_go_negative() {
        let terminals = MonteCarloProjector::new(13)
            .terminal_prices(60, 10.0, 3.0)
            .unwrap();
        assert!(terminals.iter().all(|p| *p >= 0.0));
        assert!(terminals.iter().any(|p| *p == 0.0));
    }

    #[test]
    fn floor_normalizes_negative_zero() {
        assert_eq!(floor_at_zero(-0.0).to_bits(), 0.0f64.to_bits());
        assert_eq!(floor_at_zero(-5.0), 0.0);
        assert_eq!(floor_at_zero(2.5), 2.5);
    }

    #[test]
    fn sub_seeds_are_deterministic_and_distinct() {
        let projector = MonteCarloProjector::new(42);
        assert_eq!(projector.sub_seed(0), projector.sub_seed(0));
        assert_ne!(projector.sub_seed(0), projector.sub_seed(1));
        assert_ne!(
            projector.sub_seed(0),
            MonteCarloProjector::new(43).sub_seed(0)
        );
    }

    #[test]
    fn rejects_invalid_inputs() {
        let projector = MonteCarloProjector::new(1);
        assert!(projector.project(0, 100.0, 0.1).is_err());
        assert!(projector.project(12, f64::NAN, 0.1).is_err());
        assert!(projector.project(12, 100.0, -0.1).is_err());
        assert!(projector.project(12, 100.0, f64::INFINITY).is_err());
        assert!(MonteCarloProjector::new(1)
            .with_simulations(0)
            .project(12, 100.0, 0.1)
            .is_err());
    }
}
