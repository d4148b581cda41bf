//! Engine trait, result payload and error taxonomy shared by every pricer.

use serde::{Deserialize, Serialize};

use crate::core::ContractSpec;

/// Standardized Greeks container used by engine results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// First derivative to spot.
    pub delta: f64,
    /// Second derivative to spot.
    pub gamma: f64,
    /// First derivative to volatility.
    pub vega: f64,
    /// First derivative to calendar time (per year).
    pub theta: f64,
    /// First derivative to rate.
    pub rho: f64,
}

/// Pricing engine abstraction over a European contract.
pub trait PricingEngine {
    /// Prices `contract` after validating its preconditions.
    fn price(&self, contract: &ContractSpec) -> Result<PricingResult, PricingError>;
}

/// Compact key set for engine diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagKey {
    AlphaMax,
    D1,
    D2,
    DiscountFactor,
    NumPaths,
    NumSpaceSteps,
    NumTimeSteps,
    SMax,
    Vol,
}

impl DiagKey {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AlphaMax => "alpha_max",
            Self::D1 => "d1",
            Self::D2 => "d2",
            Self::DiscountFactor => "discount_factor",
            Self::NumPaths => "num_paths",
            Self::NumSpaceSteps => "num_space_steps",
            Self::NumTimeSteps => "num_time_steps",
            Self::SMax => "s_max",
            Self::Vol => "vol",
        }
    }
}

/// Inline diagnostics storage used in [`PricingResult`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: [Option<(DiagKey, f64)>; 8],
}

impl Diagnostics {
    pub const CAPACITY: usize = 8;

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries[0].is_none()
    }

    /// Inserts or overwrites `key`, returning the previous value.
    ///
    /// Entries beyond [`Diagnostics::CAPACITY`] are dropped.
    #[inline]
    pub fn insert(&mut self, key: DiagKey, value: f64) -> Option<f64> {
        for (entry_key, existing) in self.entries.iter_mut().flatten() {
            if *entry_key == key {
                let prev = *existing;
                *existing = value;
                return Some(prev);
            }
        }

        if let Some(slot) = self.entries.iter_mut().find(|e| e.is_none()) {
            *slot = Some((key, value));
        } else {
            debug_assert!(false, "diagnostics capacity exceeded ({})", Self::CAPACITY);
        }
        None
    }

    #[inline]
    pub fn get(&self, key: DiagKey) -> Option<f64> {
        self.iter()
            .find_map(|(entry_key, value)| (entry_key == key).then_some(value))
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (DiagKey, f64)> + '_ {
        self.entries.iter().filter_map(|e| *e)
    }
}

/// Unified engine result payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    /// Present value.
    pub price: f64,
    /// Standard error (Monte Carlo only).
    pub stderr: Option<f64>,
    /// Greeks when available from the engine.
    pub greeks: Option<Greeks>,
    /// Engine-specific scalar diagnostics.
    pub diagnostics: Diagnostics,
}

impl PricingResult {
    /// Price-only result with empty diagnostics.
    pub fn from_price(price: f64) -> Self {
        Self {
            price,
            stderr: None,
            greeks: None,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Delta, when the engine produced Greeks.
    pub fn delta(&self) -> Option<f64> {
        self.greeks.map(|g| g.delta)
    }
}

/// Engine and model errors surfaced by the API.
///
/// Serializes as `{"kind": "...", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum PricingError {
    /// Missing, non-finite or non-positive input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Expiration not strictly after valuation.
    #[error("date order: {0}")]
    DateOrder(String),
    /// Explicit finite-difference grid violates `alpha <= 0.5`.
    #[error("stability violation: {0}")]
    StabilityViolation(String),
    /// Quoted price outside no-arbitrage bounds.
    #[error("arbitrage violation: {0}")]
    ArbitrageViolation(String),
    /// Numerical issue (singular system, NaN/Inf, unbracketed root).
    #[error("numerical error: {0}")]
    NumericalError(String),
}
