//! Simulation Engine
//!
//! Sequences weight normalization, chart paths, the terminal Monte Carlo
//! batch, the shock overlay and metric aggregation for one request.

mod metrics;
mod paths;
mod returns;
mod shock;
mod weights;

pub use metrics::{aggregate, percentile};
pub use paths::PathSampler;
pub use returns::TerminalReturnSimulator;
pub use shock::{ShockEngine, ShockOutcome, ShockPlan};
pub use weights::{normalize_weights, FALLBACK_WEIGHTS};

use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::model::{PortfolioConfig, SimulationRequest, SimulationResult};

/// Runs forecasts against a fixed configuration
///
/// Holds no per-run state: every call builds its own RNG, so identical
/// requests with identical seeds give identical results.
#[derive(Clone, Debug, Default)]
pub struct ForecastEngine {
    config: EngineConfig,
}

impl ForecastEngine {
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one forecast.
    ///
    /// RNG draw order: chart paths (low, medium, high), then the terminal
    /// batch, then auto-shock draws.
    pub fn run(&self, request: &SimulationRequest) -> Result<SimulationResult> {
        request.validate()?;

        let mut rng = seeded_rng(request.seed);
        let portfolio = PortfolioConfig {
            weights: normalize_weights(request.portfolio.weights),
            ..request.portfolio.clone()
        };

        tracing::debug!(
            wealth = request.wealth,
            years = request.years,
            sims = request.sims,
            shock = request.shock.map(|k| k.label()),
            auto_shock = request.auto_shock,
            seed = request.seed,
            "Running forecast"
        );

        let sample_paths =
            PathSampler::new(&self.config).sample_portfolio(&portfolio, request.years, &mut rng);

        let log_returns = TerminalReturnSimulator::new(&portfolio, request.years, &self.config)
            .simulate(request.sims, &mut rng);

        let ShockOutcome {
            final_wealth,
            summary,
        } = ShockEngine::new(&self.config).apply(request, &log_returns, &mut rng)?;

        let metrics = aggregate(&final_wealth, request.wealth, &self.config);

        tracing::debug!(
            expected = metrics.expected,
            prob_loss = metrics.prob_loss,
            prob_ruin = metrics.prob_ruin,
            var_5 = metrics.var_5,
            "Forecast complete"
        );

        Ok(SimulationResult {
            sample_paths,
            final_wealth_samples: final_wealth,
            metrics,
            shock_summary: summary,
            weights: portfolio.weights,
            mus: portfolio.mus,
            sigmas: portfolio.sigmas,
        })
    }
}

/// Fresh generator for one run (None = entropy)
fn seeded_rng(seed: Option<u64>) -> Pcg64 {
    match seed {
        Some(s) => Pcg64::seed_from_u64(s),
        None => Pcg64::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ShockKind, Tiered};

    fn request() -> SimulationRequest {
        SimulationRequest {
            wealth: 10_000.0,
            portfolio: PortfolioConfig {
                weights: Tiered::new(0.4, 0.4, 0.2),
                mus: Tiered::new(0.04, 0.08, 0.14),
                sigmas: Tiered::new(0.06, 0.15, 0.30),
            },
            years: 2,
            sims: 500,
            shock: None,
            auto_shock: false,
            shock_prob: 0.05,
            seed: Some(2024),
        }
    }

    #[test]
    fn test_zero_variance_scenario() {
        let engine = ForecastEngine::default();
        let req = SimulationRequest {
            years: 1,
            sims: 5,
            portfolio: PortfolioConfig {
                weights: Tiered::new(1.0, 0.0, 0.0),
                mus: Tiered::new(0.0, 0.08, 0.14),
                sigmas: Tiered::new(0.0, 0.15, 0.30),
            },
            ..request()
        };

        let result = engine.run(&req).unwrap();

        assert_eq!(result.final_wealth_samples, vec![10_000.0; 5]);
        assert_eq!(result.metrics.expected, 10_000.0);
        assert_eq!(result.metrics.prob_loss, 0.0);
        assert_eq!(result.metrics.prob_ruin, 0.0);
        assert_eq!(result.metrics.var_5, 10_000.0);
    }

    #[test]
    fn test_shapes() {
        let engine = ForecastEngine::default();
        let result = engine.run(&request()).unwrap();

        assert_eq!(result.sample_paths.len(), engine.config().sample_paths);
        assert!(result.sample_paths.iter().all(|p| p.len() == 3));
        assert_eq!(result.final_wealth_samples.len(), 500);
    }

    #[test]
    fn test_deterministic_with_seed() {
        let engine = ForecastEngine::default();
        let req = SimulationRequest {
            auto_shock: true,
            shock_prob: 0.2,
            ..request()
        };

        let a = engine.run(&req).unwrap();
        let b = engine.run(&req).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let engine = ForecastEngine::default();
        let a = engine.run(&request()).unwrap();
        let b = engine
            .run(&SimulationRequest {
                seed: Some(2025),
                ..request()
            })
            .unwrap();
        assert_ne!(a.final_wealth_samples, b.final_wealth_samples);
    }

    #[test]
    fn test_manual_crash_against_unshocked_run() {
        let engine = ForecastEngine::default();
        let base = engine.run(&request()).unwrap();
        let crashed = engine
            .run(&SimulationRequest {
                shock: Some(ShockKind::Crash),
                auto_shock: true,
                ..request()
            })
            .unwrap();

        assert_eq!(base.sample_paths, crashed.sample_paths);
        let s = &crashed.shock_summary;
        assert!(s.applied_to_all);
        assert_eq!((s.total_shocked, s.count_crash, s.count_boom), (500, 500, 0));
        for (c, b) in crashed.final_wealth_samples.iter().zip(&base.final_wealth_samples) {
            assert!((c - b * 0.80).abs() < 1e-8 * b);
        }
    }

    #[test]
    fn test_manual_boom_against_unshocked_run() {
        let engine = ForecastEngine::default();
        let base = engine.run(&request()).unwrap();
        let boomed = engine
            .run(&SimulationRequest {
                shock: Some(ShockKind::Boom),
                ..request()
            })
            .unwrap();

        assert_eq!(boomed.shock_summary.count_boom, 500);
        for (c, b) in boomed.final_wealth_samples.iter().zip(&base.final_wealth_samples) {
            assert!((c - b * 1.15).abs() < 1e-8 * b);
        }
    }

    #[test]
    fn test_auto_shock_zero_probability_matches_unshocked() {
        let engine = ForecastEngine::default();
        let base = engine.run(&request()).unwrap();
        let auto = engine
            .run(&SimulationRequest {
                auto_shock: true,
                shock_prob: 0.0,
                ..request()
            })
            .unwrap();

        assert_eq!(auto.shock_summary.total_shocked, 0);
        assert!(auto.shock_summary.auto_shock);
        assert_eq!(auto.final_wealth_samples, base.final_wealth_samples);
    }

    #[test]
    fn test_probability_bounds() {
        let engine = ForecastEngine::default();
        let result = engine
            .run(&SimulationRequest {
                portfolio: PortfolioConfig {
                    weights: Tiered::new(0.0, 0.0, 1.0),
                    mus: Tiered::new(0.04, 0.08, 0.14),
                    sigmas: Tiered::new(0.06, 0.15, 0.60),
                },
                years: 5,
                ..request()
            })
            .unwrap();

        let m = result.metrics;
        assert!((0.0..=1.0).contains(&m.prob_loss));
        assert!((0.0..=1.0).contains(&m.prob_ruin));
        assert!(m.prob_ruin <= m.prob_loss);
    }

    #[test]
    fn test_echoes_normalized_parameters() {
        let engine = ForecastEngine::default();
        let result = engine
            .run(&SimulationRequest {
                portfolio: PortfolioConfig {
                    weights: Tiered::new(2.0, 2.0, 4.0),
                    ..request().portfolio
                },
                ..request()
            })
            .unwrap();

        assert_eq!(result.weights, Tiered::new(0.25, 0.25, 0.5));
        assert_eq!(result.mus, Tiered::new(0.04, 0.08, 0.14));
        assert_eq!(result.sigmas, Tiered::new(0.06, 0.15, 0.30));
    }

    #[test]
    fn test_degenerate_weights_fall_back() {
        let engine = ForecastEngine::default();
        let result = engine
            .run(&SimulationRequest {
                portfolio: PortfolioConfig {
                    weights: Tiered::new(0.0, 0.0, 0.0),
                    ..request().portfolio
                },
                ..request()
            })
            .unwrap();

        assert_eq!(result.weights, FALLBACK_WEIGHTS);
        assert!(result.final_wealth_samples.iter().all(|w| w.is_finite()));
    }

    #[test]
    fn test_invalid_request_rejected() {
        let engine = ForecastEngine::default();
        let err = engine
            .run(&SimulationRequest {
                sims: 0,
                ..request()
            })
            .unwrap_err();
        assert!(err.is_client_error());
    }
}
