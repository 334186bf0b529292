//! Application State

use std::sync::Arc;

use portfolio_forecast::{ForecastEngine, RequestDefaults, SimulationLimits};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Simulation engine with its fixed configuration
    pub engine: Arc<ForecastEngine>,

    /// Values used for request fields the client omits
    pub defaults: Arc<RequestDefaults>,

    /// Bounds enforced before a request reaches the engine
    pub limits: SimulationLimits,
}

impl AppState {
    pub fn new(engine: ForecastEngine, defaults: RequestDefaults, limits: SimulationLimits) -> Self {
        Self {
            engine: Arc::new(engine),
            defaults: Arc::new(defaults),
            limits,
        }
    }
}
