//! # portfolio-forecast
//!
//! Monte Carlo forecasting of a three-tier portfolio (low / medium / high
//! risk) under Geometric Brownian Motion, with an optional crash/boom shock
//! overlay.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  SimulationRequest                                          │
//! │     │                                                       │
//! │     ▼                                                       │
//! │  normalize_weights ──┬──► PathSampler ──────► sample_paths  │
//! │                      │                                      │
//! │                      └──► TerminalReturnSimulator           │
//! │                                 │ log-returns               │
//! │                                 ▼                           │
//! │                           ShockEngine ──► final wealth      │
//! │                                 │                           │
//! │                                 ▼                           │
//! │                           aggregate ──► expected, prob_loss,│
//! │                                         prob_ruin, VaR_5    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Chart paths and the statistical batch are drawn independently; only the
//! normalized weights are shared. Chart paths never feed a statistic.
//!
//! ## Example
//!
//! ```no_run
//! use portfolio_forecast::{EngineConfig, ForecastEngine, PortfolioConfig, SimulationRequest, Tiered};
//!
//! let engine = ForecastEngine::new(EngineConfig::default());
//! let result = engine.run(&SimulationRequest {
//!     wealth: 10_000.0,
//!     portfolio: PortfolioConfig {
//!         weights: Tiered::new(0.4, 0.4, 0.2),
//!         mus: Tiered::new(0.04, 0.08, 0.14),
//!         sigmas: Tiered::new(0.06, 0.15, 0.30),
//!     },
//!     years: 5,
//!     sims: 3_000,
//!     shock: None,
//!     auto_shock: true,
//!     shock_prob: 0.05,
//!     seed: Some(42),
//! })?;
//! println!("VaR 5%: {:.2}", result.metrics.var_5);
//! # Ok::<(), portfolio_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod model;

pub use config::{EngineConfig, RequestDefaults, SimulationLimits};
pub use engine::ForecastEngine;
pub use error::{ForecastError, Result};
pub use model::{
    AssetClass, PortfolioConfig, RiskMetrics, ShockKind, ShockSummary, SimulationRequest,
    SimulationResult, Tiered,
};
