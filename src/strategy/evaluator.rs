//! Payoff curves of multi-leg option strategies across a spot sweep.
//!
//! Each curve point is the combined closed-form value of the legs at that spot, with the
//! contract's rate, volatility and expiry held fixed. Strikes are expressed relative to the
//! contract strike `K`.

use serde::{Deserialize, Serialize};

use crate::core::{ContractSpec, OptionType, PricingError};
use crate::engines::analytic::bs_price;
use crate::math::linspace;

/// Named multi-leg strategies priced by [`evaluate_strategies`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// `C(K) + P(K)`.
    Straddle,
    /// `C(0.9K) + P(1.1K)`.
    Strangle,
    /// `C(K) - C(1.1K)`.
    BullSpread,
    /// `P(K) - P(0.9K)`.
    BearSpread,
    /// `C(0.9K) - 2C(K) + C(1.1K)`.
    Butterfly,
    /// Short iron condor: `P(0.8K) - P(0.9K) - C(1.1K) + C(1.2K)`.
    IronCondor,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 6] = [
        StrategyKind::Straddle,
        StrategyKind::Strangle,
        StrategyKind::BullSpread,
        StrategyKind::BearSpread,
        StrategyKind::Butterfly,
        StrategyKind::IronCondor,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Straddle => "Straddle",
            Self::Strangle => "Strangle",
            Self::BullSpread => "Bull Spread",
            Self::BearSpread => "Bear Spread",
            Self::Butterfly => "Butterfly Spread",
            Self::IronCondor => "Iron Condor",
        }
    }

    /// Legs as `(quantity, side, strike multiple)`.
    pub fn legs(self) -> &'static [(f64, OptionType, f64)] {
        use OptionType::{Call, Put};
        match self {
            Self::Straddle => &[(1.0, Call, 1.0), (1.0, Put, 1.0)],
            Self::Strangle => &[(1.0, Call, 0.9), (1.0, Put, 1.1)],
            Self::BullSpread => &[(1.0, Call, 1.0), (-1.0, Call, 1.1)],
            Self::BearSpread => &[(1.0, Put, 1.0), (-1.0, Put, 0.9)],
            Self::Butterfly => &[(1.0, Call, 0.9), (-2.0, Call, 1.0), (1.0, Call, 1.1)],
            Self::IronCondor => &[
                (1.0, Put, 0.8),
                (-1.0, Put, 0.9),
                (-1.0, Call, 1.1),
                (1.0, Call, 1.2),
            ],
        }
    }

    /// Combined value of the legs at `spot`.
    pub fn value(self, contract: &ContractSpec, spot: f64) -> f64 {
        self.legs()
            .iter()
            .map(|&(qty, side, multiple)| {
                qty * bs_price(
                    side,
                    spot,
                    contract.strike * multiple,
                    contract.rate,
                    contract.volatility,
                    contract.expiry,
                )
            })
            .sum()
    }
}

/// Evenly sampled spot interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotRange {
    pub lower: f64,
    pub upper: f64,
    pub samples: usize,
}

impl SpotRange {
    pub fn new(lower: f64, upper: f64, samples: usize) -> Self {
        Self {
            lower,
            upper,
            samples,
        }
    }

    /// `[0.5·spot, 1.5·spot]` with 100 samples.
    pub fn around(spot: f64) -> Self {
        Self::new(0.5 * spot, 1.5 * spot, 100)
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        if !(self.lower.is_finite() && self.upper.is_finite()) || self.lower <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "spot range must be finite with lower > 0, got [{}, {}]",
                self.lower, self.upper
            )));
        }
        if self.upper < self.lower {
            return Err(PricingError::InvalidInput(format!(
                "spot range upper {} is below lower {}",
                self.upper, self.lower
            )));
        }
        if self.samples == 0 {
            return Err(PricingError::InvalidInput(
                "spot range needs at least one sample".to_string(),
            ));
        }
        Ok(())
    }

    pub fn spots(&self) -> Vec<f64> {
        linspace(self.lower, self.upper, self.samples)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub spot: f64,
    pub value: f64,
}

/// One strategy's value across the spot sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyCurve {
    pub kind: StrategyKind,
    pub label: String,
    pub points: Vec<CurvePoint>,
}

/// Builds one curve per [`StrategyKind`] over `range`.
///
/// # Errors
/// [`PricingError::InvalidInput`] for an invalid contract (volatility included) or range.
///
/// # Examples
/// ```
/// use openvanilla::core::{ContractSpec, OptionType};
/// use openvanilla::strategy::{SpotRange, StrategyKind, evaluate_strategies};
///
/// let spec = ContractSpec::new(OptionType::Call, 100.0, 100.0, 0.02, 0.2, 0.5);
/// let curves = evaluate_strategies(&spec, &SpotRange::around(100.0)).unwrap();
/// assert_eq!(curves.len(), 6);
/// assert_eq!(curves[0].kind, StrategyKind::Straddle);
/// assert_eq!(curves[0].points.len(), 100);
/// ```
pub fn evaluate_strategies(
    contract: &ContractSpec,
    range: &SpotRange,
) -> Result<Vec<StrategyCurve>, PricingError> {
    contract.validate()?;
    range.validate()?;
    let spots = range.spots();
    tracing::debug!(samples = spots.len(), "evaluating strategy curves");

    Ok(StrategyKind::ALL
        .iter()
        .map(|&kind| StrategyCurve {
            kind,
            label: kind.label().to_string(),
            points: spots
                .iter()
                .map(|&spot| CurvePoint {
                    spot,
                    value: kind.value(contract, spot),
                })
                .collect(),
        })
        .collect())
}
