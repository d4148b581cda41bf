//! Minimum-variance weighting of a book of European calls.
//!
//! Each option's risk is proxied by its volatility and treated as independent, so the book
//! variance is `Σ w_i²σ_i²`. Under `Σ w_i = 1` and `0 <= w_i <= 1` the minimizer is
//! `w_i = (1/σ_i²) / Σ_j (1/σ_j²)`, which already satisfies the box constraint.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core::{OptionType, PricingError};
use crate::engines::analytic::bs_price;

/// One priced book entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub spot: f64,
    pub strike: f64,
    pub volatility: f64,
    pub rate: f64,
    pub expiry: f64,
    /// Closed-form call price.
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedBook {
    pub options: Vec<OptionQuote>,
    pub weights: Vec<f64>,
    /// `Σ w_i²σ_i²` at the optimum.
    pub variance: f64,
    /// Weighted book value `Σ w_i·price_i`.
    pub value: f64,
}

/// Draws `count` calls with spot and strike in `[50, 150)`, volatility in `[0.1, 0.5)`,
/// rate in `[0.01, 0.05)` and expiry in `[0.1, 1)` years.
pub fn random_option_book(count: usize, seed: u64) -> Vec<OptionQuote> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let spot = rng.random_range(50.0..150.0);
            let strike = rng.random_range(50.0..150.0);
            let volatility = rng.random_range(0.1..0.5);
            let rate = rng.random_range(0.01..0.05);
            let expiry = rng.random_range(0.1..1.0);
            OptionQuote {
                spot,
                strike,
                volatility,
                rate,
                expiry,
                price: bs_price(OptionType::Call, spot, strike, rate, volatility, expiry),
            }
        })
        .collect()
}

/// Inverse-variance weights for the given volatilities.
///
/// # Errors
/// [`PricingError::InvalidInput`] for an empty list or a volatility that is not finite
/// and positive.
pub fn min_variance_weights(volatilities: &[f64]) -> Result<Vec<f64>, PricingError> {
    if volatilities.is_empty() {
        return Err(PricingError::InvalidInput(
            "cannot weight an empty book".to_string(),
        ));
    }
    if volatilities.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return Err(PricingError::InvalidInput(
            "book volatilities must be finite and > 0".to_string(),
        ));
    }
    let inverse: Vec<f64> = volatilities.iter().map(|v| 1.0 / (v * v)).collect();
    let total: f64 = inverse.iter().sum();
    Ok(inverse.into_iter().map(|x| x / total).collect())
}

/// Builds a seeded random book of `count` calls and weights it for minimum variance.
///
/// # Examples
/// ```
/// use openvanilla::risk::optimize_option_book;
///
/// let book = optimize_option_book(10, 42).unwrap();
/// assert_eq!(book.weights.len(), 10);
/// assert!((book.weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// ```
pub fn optimize_option_book(count: usize, seed: u64) -> Result<OptimizedBook, PricingError> {
    if count == 0 {
        return Err(PricingError::InvalidInput(
            "book size must be >= 1".to_string(),
        ));
    }
    let options = random_option_book(count, seed);
    let vols: Vec<f64> = options.iter().map(|o| o.volatility).collect();
    let weights = min_variance_weights(&vols)?;
    let variance = weights
        .iter()
        .zip(&vols)
        .map(|(w, s)| w * w * s * s)
        .sum();
    let value = weights
        .iter()
        .zip(&options)
        .map(|(w, o)| w * o.price)
        .sum();
    tracing::debug!(count, seed, variance, "optimized option book");

    Ok(OptimizedBook {
        options,
        weights,
        variance,
        value,
    })
}
