//! Joint rate/volatility shift scenarios for a single contract.
//!
//! Each shift `s` reprices the contract with `rate + s` and `volatility + s`. A shift that
//! drives volatility to zero or below cannot be priced; that row carries its error instead of
//! aborting the batch. The spread of the successful prices is graded against the spot:
//! above `0.5·S` is [`RiskLevel::High`], above `0.2·S` is [`RiskLevel::Moderate`], anything
//! else [`RiskLevel::Low`].

use serde::{Deserialize, Serialize};

use crate::core::{ContractSpec, PricingError, PricingEngine};
use crate::engines::analytic::BlackScholesEngine;
use crate::math::linspace;

/// `linspace(-0.2, 0.2, 5)`.
pub fn default_shifts() -> Vec<f64> {
    linspace(-0.2, 0.2, 5)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Moderate,
    Low,
}

impl RiskLevel {
    pub fn classify(variation: f64, spot: f64) -> Self {
        if variation > 0.5 * spot {
            Self::High
        } else if variation > 0.2 * spot {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRow {
    pub shift: f64,
    pub rate: f64,
    pub volatility: f64,
    pub price: Result<f64, PricingError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub rows: Vec<ScenarioRow>,
    /// Max minus min over the rows that priced.
    pub variation: f64,
    pub risk_level: RiskLevel,
}

impl ScenarioReport {
    pub fn priced(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(|row| row.price.as_ref().ok().copied())
    }
}

/// Reprices `contract` under every shift in `shifts`.
///
/// # Errors
/// [`PricingError::InvalidInput`] for an invalid base contract, an empty or non-finite
/// shift list, or when no scenario could be priced at all.
pub fn scenario_analysis(
    contract: &ContractSpec,
    shifts: &[f64],
) -> Result<ScenarioReport, PricingError> {
    contract.validate()?;
    if shifts.is_empty() || shifts.iter().any(|s| !s.is_finite()) {
        return Err(PricingError::InvalidInput(
            "scenario shifts must be a non-empty list of finite values".to_string(),
        ));
    }

    let engine = BlackScholesEngine::new();
    let rows: Vec<ScenarioRow> = shifts
        .iter()
        .map(|&shift| {
            let shocked = contract
                .with_rate(contract.rate + shift)
                .with_volatility(contract.volatility + shift);
            ScenarioRow {
                shift,
                rate: shocked.rate,
                volatility: shocked.volatility,
                price: engine.price(&shocked).map(|res| res.price),
            }
        })
        .collect();

    let (lo, hi) = rows
        .iter()
        .filter_map(|row| row.price.as_ref().ok())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| {
            (lo.min(p), hi.max(p))
        });
    if lo > hi {
        return Err(PricingError::InvalidInput(
            "no scenario could be priced".to_string(),
        ));
    }
    let failed = rows.iter().filter(|row| row.price.is_err()).count();
    if failed > 0 {
        tracing::debug!(failed, "scenarios skipped");
    }

    let variation = hi - lo;
    Ok(ScenarioReport {
        rows,
        variation,
        risk_level: RiskLevel::classify(variation, contract.spot),
    })
}
