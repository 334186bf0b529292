//! Portfolio forecast HTTP server
//!
//! Axum-based server exposing the Monte Carlo wealth forecast at
//! `POST /simulate`.

mod handlers;
mod params;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portfolio_forecast::{EngineConfig, ForecastEngine, RequestDefaults, SimulationLimits};

use crate::handlers::{health_check, simulate_handler};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let engine = ForecastEngine::new(EngineConfig::from_env());
    let limits = SimulationLimits::from_env();

    let config = engine.config();
    tracing::info!(
        steps_per_year = config.steps_per_year,
        sample_paths = config.sample_paths,
        min_sims = limits.min_sims,
        max_sims = limits.max_sims,
        max_years = limits.max_years,
        "Engine configured"
    );

    let state = AppState::new(engine, RequestDefaults::default(), limits);
    let app = router(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5001".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Forecast server running on http://{}", addr);
    tracing::info!("  GET  /health   - Health check");
    tracing::info!("  POST /simulate - Run a Monte Carlo forecast");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/simulate", post(simulate_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
