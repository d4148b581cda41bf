//! Default engine settings used when a request leaves a parameter out.
//!
//! Every field carries `#[serde(default)]`, so a JSON document only needs the keys it
//! overrides:
//!
//! ```
//! use openvanilla::pricing::EngineConfig;
//!
//! let cfg = EngineConfig::from_json(r#"{ "monte_carlo": { "num_paths": 5000 } }"#).unwrap();
//! assert_eq!(cfg.monte_carlo.num_paths, 5000);
//! assert_eq!(cfg.monte_carlo.time_steps, 252);
//! assert_eq!(cfg.strategy_samples, 100);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::PricingError;
use crate::engines::monte_carlo::MonteCarloEngine;
use crate::engines::pde::{ExplicitFdEngine, ImplicitFdEngine};
use crate::strategy::SelectorThresholds;
use crate::vol::ImpliedVolSolver;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub monte_carlo: MonteCarloEngine,
    pub explicit_fd: ExplicitFdEngine,
    pub implicit_fd: ImplicitFdEngine,
    pub implied_vol: ImpliedVolSolver,
    pub selector: SelectorThresholds,
    /// Spot samples for strategy curves.
    pub strategy_samples: usize,
    /// Spot samples for sensitivity sweeps.
    pub sensitivity_samples: usize,
    /// Time samples for value evolution.
    pub evolution_samples: usize,
    /// Seed for the random option book.
    pub book_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            monte_carlo: MonteCarloEngine::default(),
            explicit_fd: ExplicitFdEngine::default(),
            implicit_fd: ImplicitFdEngine::default(),
            implied_vol: ImpliedVolSolver::default(),
            selector: SelectorThresholds::default(),
            strategy_samples: 100,
            sensitivity_samples: 20,
            evolution_samples: 50,
            book_seed: 42,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json(payload: &str) -> Result<Self, PricingError> {
        let cfg: Self = serde_json::from_str(payload)
            .map_err(|e| PricingError::InvalidInput(format!("config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks sample counts and selector thresholds; engine grids are checked when used.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.monte_carlo.num_paths == 0 || self.monte_carlo.time_steps == 0 {
            return Err(PricingError::InvalidInput(
                "monte_carlo num_paths and time_steps must be >= 1".to_string(),
            ));
        }
        if self.strategy_samples == 0 || self.sensitivity_samples == 0 {
            return Err(PricingError::InvalidInput(
                "sample counts must be >= 1".to_string(),
            ));
        }
        if self.evolution_samples < 2 {
            return Err(PricingError::InvalidInput(
                "evolution_samples must be >= 2".to_string(),
            ));
        }
        self.selector.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_the_default() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn nested_overrides_keep_sibling_defaults() {
        let cfg = EngineConfig::from_json(
            r#"{ "explicit_fd": { "space_steps": 60, "s_max": 250.0 }, "book_seed": 7 }"#,
        )
        .unwrap();
        assert_eq!(cfg.explicit_fd.space_steps, 60);
        assert_eq!(cfg.explicit_fd.s_max, Some(250.0));
        assert_eq!(cfg.explicit_fd.time_steps, 1_000);
        assert_eq!(cfg.book_seed, 7);
    }

    #[test]
    fn rejects_bad_documents() {
        assert!(matches!(
            EngineConfig::from_json("not json"),
            Err(PricingError::InvalidInput(_))
        ));
        assert!(EngineConfig::from_json(r#"{ "evolution_samples": 1 }"#).is_err());
        assert!(
            EngineConfig::from_json(r#"{ "selector": { "high_vol": 0.1, "low_vol": 0.2 } }"#)
                .is_err()
        );
    }
}
