//! Dispersion of monthly returns.

use rust_decimal::prelude::ToPrimitive;

use crate::error::PricecastError;
use crate::model::ReturnSeries;

/// Population standard deviation (divides by N) of the returns.
pub fn volatility(returns: &ReturnSeries) -> Result<f64, PricecastError> {
    let values: Vec<f64> = returns.values().filter_map(|r| r.to_f64()).collect();
    if values.is_empty() {
        return Err(PricecastError::InsufficientHistory {
            samples: returns.len(),
        });
    }
    Ok(population_std_dev(&values))
}

fn population_std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
