//! Engine Configuration
//!
//! Constants that shape a run but are not part of the request. The engine
//! receives these explicitly instead of reading globals.

use serde::{Deserialize, Serialize};

use crate::model::{ShockKind, Tiered};

/// Numerical settings for the simulation engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Trading days per year for GBM stepping
    pub steps_per_year: u32,

    /// Number of chart paths per asset class
    pub sample_paths: usize,

    /// Starting level of every chart path
    pub sample_start_level: f64,

    /// Multiplier applied to wealth on a crash
    pub crash_factor: f64,

    /// Multiplier applied to wealth on a boom
    pub boom_factor: f64,

    /// Absolute wealth below which an outcome counts as ruin
    pub ruin_threshold: f64,

    /// Percentile reported as `VaR_5`
    pub var_percentile: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            steps_per_year: 252,
            sample_paths: 20,
            sample_start_level: 100.0,
            crash_factor: 0.80,
            boom_factor: 1.15,
            ruin_threshold: 5_000.0,
            var_percentile: 5.0,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            steps_per_year: env_or("FORECAST_STEPS_PER_YEAR", defaults.steps_per_year)
                .max(1),
            sample_paths: env_or("FORECAST_SAMPLE_PATHS", defaults.sample_paths),
            ..defaults
        }
    }

    /// Wealth multiplier for a shock direction
    pub const fn shock_factor(&self, kind: ShockKind) -> f64 {
        match kind {
            ShockKind::Crash => self.crash_factor,
            ShockKind::Boom => self.boom_factor,
        }
    }
}

/// Values substituted for request fields the caller left out
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestDefaults {
    pub wealth: f64,
    pub weights: Tiered<f64>,
    pub mus: Tiered<f64>,
    pub sigmas: Tiered<f64>,
    pub years: u32,
    pub sims: usize,
    pub auto_shock: bool,
    pub shock_prob: f64,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            wealth: 10_000.0,
            weights: Tiered::new(0.4, 0.4, 0.2),
            mus: Tiered::new(0.04, 0.08, 0.14),
            sigmas: Tiered::new(0.06, 0.15, 0.30),
            years: 1,
            sims: 3_000,
            auto_shock: true,
            shock_prob: 0.05,
        }
    }
}

/// Safety bounds applied at the request boundary
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationLimits {
    pub min_sims: usize,
    pub max_sims: usize,
    pub max_years: u32,
}

impl Default for SimulationLimits {
    fn default() -> Self {
        Self {
            min_sims: 100,
            max_sims: 15_000,
            max_years: 50,
        }
    }
}

impl SimulationLimits {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let min_sims = env_or("FORECAST_MIN_SIMS", defaults.min_sims).max(1);
        Self {
            min_sims,
            max_sims: env_or("FORECAST_MAX_SIMS", defaults.max_sims).max(min_sims),
            max_years: env_or("FORECAST_MAX_YEARS", defaults.max_years).max(1),
        }
    }

    pub fn clamp_sims(&self, sims: usize) -> usize {
        sims.clamp(self.min_sims, self.max_sims)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
