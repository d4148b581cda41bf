//! Risk views built on the closed-form pricer.
//!
//! - `sensitivities`: price/delta against spot and price curves across volatilities,
//! - `scenarios`: joint rate/volatility shifts with a graded risk level,
//! - `portfolio`: minimum-variance weighting of a seeded random option book.

pub mod portfolio;
pub mod scenarios;
pub mod sensitivities;

pub use portfolio::{
    OptimizedBook, OptionQuote, min_variance_weights, optimize_option_book, random_option_book,
};
pub use scenarios::{RiskLevel, ScenarioReport, ScenarioRow, default_shifts, scenario_analysis};
pub use sensitivities::{
    SENSITIVITY_SAMPLES, SensitivityPoint, VolatilityCurve, sensitivity_range, spot_sensitivity,
    volatility_comparison,
};
