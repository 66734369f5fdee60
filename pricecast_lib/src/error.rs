//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding input validation and computation failures.
#[derive(Debug)]
pub enum PricecastError {
    /// An error from the underlying quote provider client.
    Api(pricecast_api::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
    /// Not enough monthly samples to estimate volatility.
    InsufficientHistory { samples: usize },
    /// A simulated value does not fit the decimal output representation.
    OutOfRange(String),
}

impl fmt::Display for PricecastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::InsufficientHistory { samples } => write!(
                f,
                "Insufficient history: {} monthly sample(s), at least 2 required",
                samples
            ),
            Self::OutOfRange(msg) => write!(f, "Value out of range: {}", msg),
        }
    }
}

impl std::error::Error for PricecastError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<pricecast_api::Error> for PricecastError {
    fn from(e: pricecast_api::Error) -> Self {
        Self::Api(e)
    }
}
