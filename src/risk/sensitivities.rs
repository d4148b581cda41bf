//! Closed-form price sweeps over spot and volatility.
//!
//! - [`spot_sensitivity`]: price and delta against spot for a single contract.
//! - [`volatility_comparison`]: one price-vs-spot curve per candidate volatility, for
//!   reading how the whole profile lifts as volatility rises.

use serde::{Deserialize, Serialize};

use crate::core::{ContractSpec, PricingError};
use crate::engines::analytic::{bs_delta, bs_price};
use crate::strategy::{CurvePoint, SpotRange};

/// Samples used by [`SpotRange`] sweeps built with [`sensitivity_range`].
pub const SENSITIVITY_SAMPLES: usize = 20;

/// `[0.5·spot, 1.5·spot]` with [`SENSITIVITY_SAMPLES`] points.
pub fn sensitivity_range(spot: f64) -> SpotRange {
    SpotRange::new(0.5 * spot, 1.5 * spot, SENSITIVITY_SAMPLES)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub spot: f64,
    pub price: f64,
    pub delta: f64,
}

/// Price and delta of `contract` at every spot of `range`.
pub fn spot_sensitivity(
    contract: &ContractSpec,
    range: &SpotRange,
) -> Result<Vec<SensitivityPoint>, PricingError> {
    contract.validate()?;
    range.validate()?;
    let ContractSpec {
        option_type,
        strike,
        rate,
        volatility,
        expiry,
        ..
    } = *contract;

    Ok(range
        .spots()
        .into_iter()
        .map(|spot| SensitivityPoint {
            spot,
            price: bs_price(option_type, spot, strike, rate, volatility, expiry),
            delta: bs_delta(option_type, spot, strike, rate, volatility, expiry),
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityCurve {
    pub volatility: f64,
    pub points: Vec<CurvePoint>,
}

/// Price-vs-spot curves of `contract` for each entry of `volatilities`.
///
/// # Errors
/// [`PricingError::InvalidInput`] when the list is empty or any volatility is not
/// finite and positive; the contract's own volatility is not used.
pub fn volatility_comparison(
    contract: &ContractSpec,
    volatilities: &[f64],
    range: &SpotRange,
) -> Result<Vec<VolatilityCurve>, PricingError> {
    contract.validate_without_vol()?;
    range.validate()?;
    if volatilities.is_empty() {
        return Err(PricingError::InvalidInput(
            "at least one volatility is required".to_string(),
        ));
    }
    if let Some(bad) = volatilities.iter().find(|v| !v.is_finite() || **v <= 0.0) {
        return Err(PricingError::InvalidInput(format!(
            "volatility must be finite and > 0, got {bad}"
        )));
    }

    let spots = range.spots();
    Ok(volatilities
        .iter()
        .map(|&volatility| VolatilityCurve {
            volatility,
            points: spots
                .iter()
                .map(|&spot| CurvePoint {
                    spot,
                    value: bs_price(
                        contract.option_type,
                        spot,
                        contract.strike,
                        contract.rate,
                        volatility,
                        contract.expiry,
                    ),
                })
                .collect(),
        })
        .collect())
}
