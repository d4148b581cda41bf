//! Multi-leg strategy payoff curves and the rule-based strategy selector.

pub mod evaluator;
pub mod selector;

pub use evaluator::{CurvePoint, SpotRange, StrategyCurve, StrategyKind, evaluate_strategies};
pub use selector::{
    SelectorThresholds, StrategyRecommendation, StrategySelection, VolRegime, select_strategy,
};
