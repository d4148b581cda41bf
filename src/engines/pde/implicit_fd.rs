use serde::{Deserialize, Serialize};

use crate::core::{ContractSpec, DiagKey, Diagnostics, PricingEngine, PricingError, PricingResult};
use crate::math::solve_tridiagonal_inplace;

use super::fd_common::{UniformGrid, ValueSurface, boundary_values, resolve_s_max};

/// Implicit (backward Euler) finite-difference engine for the Black-Scholes PDE.
///
/// Each layer solves `a_i·V[i-1,j] + b_i·V[i,j] + c_i·V[i+1,j] = V[i,j+1]` on the interior
/// with `a_i = -α_i + β_i/2`, `b_i = 1 + 2α_i + r·dt`, `c_i = -α_i - β_i/2`,
/// `α_i = 0.5σ²i²dt` and `β_i = r·i·dt`. Unconditionally stable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImplicitFdEngine {
    pub space_steps: usize,
    pub time_steps: usize,
    /// Upper spot truncation. `None` uses `2 * max(spot, strike)`.
    pub s_max: Option<f64>,
}

impl Default for ImplicitFdEngine {
    fn default() -> Self {
        Self {
            space_steps: 200,
            time_steps: 200,
            s_max: None,
        }
    }
}

impl ImplicitFdEngine {
    pub fn new(space_steps: usize, time_steps: usize) -> Self {
        Self {
            space_steps,
            time_steps,
            s_max: None,
        }
    }

    pub fn with_s_max(mut self, s_max: f64) -> Self {
        self.s_max = Some(s_max);
        self
    }

    /// Solves the full value surface for `contract`.
    pub fn solve(&self, contract: &ContractSpec) -> Result<ValueSurface, PricingError> {
        contract.validate()?;
        let s_max = resolve_s_max(self.s_max, contract)?;
        let grid = UniformGrid::new(self.space_steps, self.time_steps, s_max, contract.expiry)?;

        let vol = contract.volatility;
        let rate = contract.rate;
        let n_s = grid.space_steps;
        let n_t = grid.time_steps;
        let dt = grid.dt();
        tracing::debug!(space_steps = n_s, time_steps = n_t, s_max, "implicit fd solve");

        let option_type = contract.option_type;
        let strike = contract.strike;
        let mut surface = grid.terminal_surface(option_type, strike);

        // Interior unknowns i = 1..N-1 map to k = i - 1.
        let interior_n = n_s - 1;
        let mut lhs_lower = vec![0.0_f64; interior_n];
        let mut lhs_diag = vec![0.0_f64; interior_n];
        let mut lhs_upper = vec![0.0_f64; interior_n];
        for k in 0..interior_n {
            let fi = (k + 1) as f64;
            let alpha = 0.5 * vol * vol * fi * fi * dt;
            let half_beta = 0.5 * rate * fi * dt;
            lhs_lower[k] = -alpha + half_beta;
            lhs_diag[k] = 1.0 + 2.0 * alpha + rate * dt;
            lhs_upper[k] = -alpha - half_beta;
        }
        let a_first = lhs_lower[0];
        let c_last = lhs_upper[interior_n - 1];

        let mut rhs = vec![0.0_f64; interior_n];
        let mut c_star = vec![0.0_f64; interior_n];
        let mut d_star = vec![0.0_f64; interior_n];
        let mut solution = vec![0.0_f64; interior_n];

        for j in (0..n_t).rev() {
            let tau = contract.expiry - j as f64 * dt;
            let (lower_bv, upper_bv) = boundary_values(option_type, strike, rate, s_max, tau);
            let (current, prev) = surface.layer_pair_mut(j);

            rhs.copy_from_slice(&prev[1..n_s]);
            rhs[0] -= a_first * prev[0];
            rhs[interior_n - 1] -= c_last * prev[n_s];

            solve_tridiagonal_inplace(
                &lhs_lower,
                &lhs_diag,
                &lhs_upper,
                &rhs,
                &mut c_star,
                &mut d_star,
                &mut solution,
            )?;

            current[1..n_s].copy_from_slice(&solution);
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

        let mut diagnostics = Diagnostics::new();
        diagnostics.insert(DiagKey::NumTimeSteps, self.time_steps as f64);
        diagnostics.insert(DiagKey::NumSpaceSteps, self.space_steps as f64);
        diagnostics.insert(DiagKey::SMax, surface.spots()[surface.space_steps()]);
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

impl PricingEngine for ImplicitFdEngine {
    fn price(&self, contract: &ContractSpec) -> Result<PricingResult, PricingError> {
        self.solve_and_price(contract).map(|(_, result)| result)
    }
}
