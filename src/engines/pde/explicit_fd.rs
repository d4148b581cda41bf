//! Forward-Euler finite-difference solver for European vanilla options.
//!
//! This module marches the Black-Scholes PDE backward from the terminal payoff on a uniform
//! spot grid `S_i = i·ds`. With `α_i = 0.5σ²i²dt` and `β_i = r·i·dt` the layer update is
//!
//! `V[i,j] = (α_i - β_i/2)·V[i-1,j+1] + (1 - 2α_i - r·dt)·V[i,j+1] + (α_i + β_i/2)·V[i+1,j+1]`
//!
//! The scheme is conditionally stable: pricing refuses to start when the largest interior
//! diffusion number `α_max = 0.5σ²(N-1)²dt` exceeds `0.5`, and the error names the
//! smallest time-step count that would pass. Nodes within a layer are independent and are
//! updated in parallel; layers are strictly sequential.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{ContractSpec, DiagKey, Diagnostics, PricingEngine, PricingError, PricingResult};

use super::fd_common::{
    UniformGrid, ValueSurface, boundary_values, explicit_alpha_max, resolve_s_max,
};

/// Largest admissible `α_max` for the forward-Euler stencil.
pub const EXPLICIT_STABILITY_LIMIT: f64 = 0.5;

#[cfg(feature = "parallel")]
const MIN_NODES_PER_TASK: usize = 256;

/// Forward-Euler explicit finite-difference engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplicitFdEngine {
    /// Number of spot intervals `N`; the grid has `N + 1` nodes.
    pub space_steps: usize,
    /// Number of time steps `M`.
    pub time_steps: usize,
    /// Upper spot truncation. `None` uses `2 * max(spot, strike)`.
    pub s_max: Option<f64>,
}

impl Default for ExplicitFdEngine {
    fn default() -> Self {
        Self {
            space_steps: 100,
            time_steps: 1_000,
            s_max: None,
        }
    }
}

impl ExplicitFdEngine {
    pub fn new(space_steps: usize, time_steps: usize) -> Self {
        Self {
            space_steps,
            time_steps,
            s_max: None,
        }
    }

    /// Fixes the upper spot truncation bound.
    pub fn with_s_max(mut self, s_max: f64) -> Self {
        self.s_max = Some(s_max);
        self
    }

    /// Diffusion number the stability gate checks for `contract`.
    pub fn alpha_max(&self, contract: &ContractSpec) -> f64 {
        let dt = contract.expiry / self.time_steps as f64;
        explicit_alpha_max(contract.volatility, self.space_steps, dt)
    }

    /// Solves the full value surface for `contract`.
    ///
    /// # Errors
    /// - [`PricingError::InvalidInput`] for an invalid contract or grid.
    /// - [`PricingError::StabilityViolation`] when `α_max > 0.5`; nothing is computed.
    /// - [`PricingError::NumericalError`] if a non-finite value reaches the surface.
    pub fn solve(&self, contract: &ContractSpec) -> Result<ValueSurface, PricingError> {
        contract.validate()?;
        let s_max = resolve_s_max(self.s_max, contract)?;
        let grid = UniformGrid::new(self.space_steps, self.time_steps, s_max, contract.expiry)?;

        let vol = contract.volatility;
        let rate = contract.rate;
        let n_s = grid.space_steps;
        let n_t = grid.time_steps;
        let dt = grid.dt();

        let alpha_max = explicit_alpha_max(vol, n_s, dt);
        if alpha_max > EXPLICIT_STABILITY_LIMIT {
            let i_max = (n_s - 1) as f64;
            let min_steps = (vol * vol * i_max * i_max * contract.expiry).ceil() as usize;
            tracing::warn!(
                alpha_max,
                space_steps = n_s,
                time_steps = n_t,
                min_steps,
                "explicit fd stability gate rejected grid"
            );
            return Err(PricingError::StabilityViolation(format!(
                "explicit FD unstable: alpha_max={alpha_max:.6} > {EXPLICIT_STABILITY_LIMIT}; \
                 increase time_steps to at least {min_steps} or reduce space_steps"
            )));
        }
        tracing::debug!(space_steps = n_s, time_steps = n_t, s_max, alpha_max, "explicit fd solve");

        let option_type = contract.option_type;
        let strike = contract.strike;
        let mut surface = grid.terminal_surface(option_type, strike);

        let discount = 1.0 - rate * dt;
        let update = move |i: usize, prev: &[f64]| -> f64 {
            let fi = i as f64;
            let alpha = 0.5 * vol * vol * fi * fi * dt;
            let half_beta = 0.5 * rate * fi * dt;
            (alpha - half_beta).mul_add(
                prev[i - 1],
                (discount - 2.0 * alpha).mul_add(prev[i], (alpha + half_beta) * prev[i + 1]),
            )
        };

        for j in (0..n_t).rev() {
            let tau = contract.expiry - j as f64 * dt;
            let (lower_bv, upper_bv) = boundary_values(option_type, strike, rate, s_max, tau);
            let (current, prev) = surface.layer_pair_mut(j);

            #[cfg(feature = "parallel")]
            current[1..n_s]
                .par_iter_mut()
                .with_min_len(MIN_NODES_PER_TASK)
                .enumerate()
                .for_each(|(k, v)| *v = update(k + 1, prev));
            #[cfg(not(feature = "parallel"))]
            current[1..n_s]
                .iter_mut()
                .enumerate()
                .for_each(|(k, v)| *v = update(k + 1, prev));

            current[0] = lower_bv;
            current[n_s] = upper_bv;
        }

        surface.ensure_finite()?;
        Ok(surface)
    }

    /// Solves the surface and reads today's price off it at `contract.spot`.
    pub fn solve_and_price(
        &self,
        contract: &ContractSpec,
    ) -> Result<(ValueSurface, PricingResult), PricingError> {
        let surface = self.solve(contract)?;
        let s_max = surface.spots()[surface.space_steps()];

        let mut diagnostics = Diagnostics::new();
        diagnostics.insert(DiagKey::NumTimeSteps, self.time_steps as f64);
        diagnostics.insert(DiagKey::NumSpaceSteps, self.space_steps as f64);
        diagnostics.insert(DiagKey::SMax, s_max);
        diagnostics.insert(DiagKey::AlphaMax, self.alpha_max(contract));
        diagnostics.insert(DiagKey::Vol, contract.volatility);

        let result = PricingResult {
            price: surface.price_at(contract.spot),
            stderr: None,
            greeks: None,
            diagnostics,
        };
        Ok((surface, result))
    }
}

impl PricingEngine for ExplicitFdEngine {
    fn price(&self, contract: &ContractSpec) -> Result<PricingResult, PricingError> {
        self.solve_and_price(contract).map(|(_, result)| result)
    }
}
