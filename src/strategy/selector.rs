use serde::{Deserialize, Serialize};

use crate::core::{ContractSpec, PricingError};

/// Outcome of the volatility/move decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyRecommendation {
    Straddle,
    Strangle,
    ButterflySpread,
    BullSpread,
    BearSpread,
    /// Low volatility with a large expected move has no rule; the caller decides.
    Undetermined,
}

impl StrategyRecommendation {
    pub fn label(self) -> &'static str {
        match self {
            Self::Straddle => "Straddle",
            Self::Strangle => "Strangle",
            Self::ButterflySpread => "Butterfly Spread",
            Self::BullSpread => "Bull Spread",
            Self::BearSpread => "Bear Spread",
            Self::Undetermined => "Undetermined",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolRegime {
    High,
    Mid,
    Low,
}

/// Decision-table cut-offs. Volatilities are decimals (`0.25` = 25%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorThresholds {
    /// Volatility strictly above this is [`VolRegime::High`].
    pub high_vol: f64,
    /// Volatility strictly below this is [`VolRegime::Low`].
    pub low_vol: f64,
    /// Move threshold as a fraction of spot.
    pub move_fraction: f64,
    /// Days per year in the expected-move horizon.
    pub days_per_year: f64,
}

impl Default for SelectorThresholds {
    fn default() -> Self {
        Self {
            high_vol: 0.25,
            low_vol: 0.15,
            move_fraction: 0.10,
            days_per_year: 365.25,
        }
    }
}

impl SelectorThresholds {
    pub fn validate(&self) -> Result<(), PricingError> {
        let finite = [
            self.high_vol,
            self.low_vol,
            self.move_fraction,
            self.days_per_year,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite || self.low_vol > self.high_vol || self.move_fraction <= 0.0 {
            return Err(PricingError::InvalidInput(
                "selector thresholds need low_vol <= high_vol and move_fraction > 0".to_string(),
            ));
        }
        if self.days_per_year <= 0.0 {
            return Err(PricingError::InvalidInput(
                "days_per_year must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn regime(&self, vol: f64) -> VolRegime {
        if vol > self.high_vol {
            VolRegime::High
        } else if vol < self.low_vol {
            VolRegime::Low
        } else {
            VolRegime::Mid
        }
    }
}

/// Recommendation together with the quantities it was decided on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategySelection {
    pub recommendation: StrategyRecommendation,
    pub regime: VolRegime,
    /// `σ·S·√(days / days_per_year)`.
    pub expected_move: f64,
    /// `move_fraction · S`.
    pub move_threshold: f64,
}

/// Picks a strategy from volatility regime, expected move and moneyness.
///
/// | regime | expected move vs threshold | result |
/// |--------|----------------------------|--------|
/// | high   | above                      | Straddle |
/// | high   | at or below                | Strangle |
/// | low    | below                      | Butterfly Spread |
/// | low    | at or above                | Undetermined |
/// | mid    | any                        | Bull Spread if `S >= K`, else Bear Spread |
///
/// Days to expiry come from the contract dates when present, otherwise `expiry * 365`.
pub fn select_strategy(
    contract: &ContractSpec,
    thresholds: &SelectorThresholds,
) -> Result<StrategySelection, PricingError> {
    contract.validate()?;
    thresholds.validate()?;

    let spot = contract.spot;
    let vol = contract.volatility;
    let expected_move = vol * spot * (contract.days_to_expiry() / thresholds.days_per_year).sqrt();
    let move_threshold = thresholds.move_fraction * spot;
    let regime = thresholds.regime(vol);

    let recommendation = match regime {
        VolRegime::High if expected_move > move_threshold => StrategyRecommendation::Straddle,
        VolRegime::High => StrategyRecommendation::Strangle,
        VolRegime::Low if expected_move < move_threshold => StrategyRecommendation::ButterflySpread,
        VolRegime::Low => StrategyRecommendation::Undetermined,
        VolRegime::Mid if spot >= contract.strike => StrategyRecommendation::BullSpread,
        VolRegime::Mid => StrategyRecommendation::BearSpread,
    };
    if recommendation == StrategyRecommendation::Undetermined {
        tracing::info!(vol, expected_move, move_threshold, "no strategy rule for low vol with a large move");
    }

    Ok(StrategySelection {
        recommendation,
        regime,
        expected_move,
        move_threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionType;
    use approx::assert_relative_eq;

    fn select(vol: f64, expiry: f64, spot: f64) -> StrategySelection {
        let c = ContractSpec::new(OptionType::Call, spot, 100.0, 0.02, vol, expiry);
        select_strategy(&c, &SelectorThresholds::default()).unwrap()
    }

    #[test]
    fn decision_table() {
        // one year: move = σ·S·√(365/365.25) ≈ σ·S
        assert_eq!(select(0.40, 1.0, 100.0).recommendation, StrategyRecommendation::Straddle);
        assert_eq!(select(0.30, 0.02, 100.0).recommendation, StrategyRecommendation::Strangle);
        assert_eq!(
            select(0.10, 0.5, 100.0).recommendation,
            StrategyRecommendation::ButterflySpread
        );
        assert_eq!(select(0.20, 0.5, 100.0).recommendation, StrategyRecommendation::BullSpread);
        assert_eq!(select(0.20, 0.5, 90.0).recommendation, StrategyRecommendation::BearSpread);
    }

    #[test]
    fn low_vol_large_move_is_left_undetermined() {
        // 0.14 * √(10 years) > 0.1
        let sel = select(0.14, 10.0, 100.0);
        assert_eq!(sel.regime, VolRegime::Low);
        assert_eq!(sel.recommendation, StrategyRecommendation::Undetermined);
        assert_eq!(sel.recommendation.label(), "Undetermined");
    }

    #[test]
    fn regime_boundaries_are_mid() {
        let t = SelectorThresholds::default();
        assert_eq!(t.regime(0.25), VolRegime::Mid);
        assert_eq!(t.regime(0.15), VolRegime::Mid);
        assert_eq!(t.regime(0.2501), VolRegime::High);
        assert_eq!(t.regime(0.1499), VolRegime::Low);
    }

    #[test]
    fn expected_move_uses_calendar_days() {
        let sel = select(0.20, 0.5, 100.0);
        assert_relative_eq!(sel.expected_move, 20.0 * (182.5_f64 / 365.25).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(sel.move_threshold, 10.0);
    }

    #[test]
    fn zero_volatility_is_rejected() {
        let c = ContractSpec::new(OptionType::Call, 100.0, 100.0, 0.02, 0.0, 1.0);
        assert!(matches!(
            select_strategy(&c, &SelectorThresholds::default()),
            Err(PricingError::InvalidInput(_))
        ));
    }
}
