//! Terminal Return Simulation
//!
//! The statistical Monte Carlo batch: cumulative portfolio log-returns over
//! the full horizon, accumulated from daily steps.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::config::EngineConfig;
use crate::model::PortfolioConfig;

/// Samples cumulative portfolio log-returns
///
/// All tiers share one standard normal per simulated day, so the daily
/// portfolio log-return
/// `Σ w_i * (mu_i*dt + sigma_i*sqrt(dt)*Z)` collapses to
/// `(Σ w_i*mu_i)*dt + (Σ w_i*sigma_i)*sqrt(dt)*Z`.
#[derive(Clone, Debug)]
pub struct TerminalReturnSimulator {
    drift_per_step: f64,
    diffusion_per_step: f64,
    total_steps: usize,
}

impl TerminalReturnSimulator {
    /// `portfolio` must carry normalized weights.
    pub fn new(portfolio: &PortfolioConfig, years: u32, config: &EngineConfig) -> Self {
        let dt = 1.0 / f64::from(config.steps_per_year);
        Self {
            drift_per_step: portfolio.weights.dot(&portfolio.mus) * dt,
            diffusion_per_step: portfolio.weights.dot(&portfolio.sigmas) * dt.sqrt(),
            total_steps: years as usize * config.steps_per_year as usize,
        }
    }

    /// Draw `sims` cumulative log-returns.
    ///
    /// Draws are simulation-major: every step of simulation 0, then every
    /// step of simulation 1, and so on. Each row is reduced as it is drawn.
    pub fn simulate<R: Rng + ?Sized>(&self, sims: usize, rng: &mut R) -> Vec<f64> {
        let mut log_returns = Vec::with_capacity(sims);
        for _ in 0..sims {
            let mut cumulative = 0.0;
            for _ in 0..self.total_steps {
                let z: f64 = rng.sample(StandardNormal);
                cumulative += self.drift_per_step + self.diffusion_per_step * z;
            }
            log_returns.push(cumulative);
        }
        log_returns
    }
}
