//! HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use portfolio_forecast::SimulationResult;

use crate::params::RequestParams;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Run one forecast
///
/// The body is read as text so malformed JSON gets the same 400 shape as
/// any other bad input.
pub async fn simulate_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<SimulationResult>, ApiError> {
    let request = RequestParams::from_body(&body)
        .and_then(|params| params.to_request(&state.defaults, &state.limits))
        .map_err(|e| {
            tracing::warn!("Rejected simulation request: {}", e);
            api_error(StatusCode::BAD_REQUEST, e.to_string(), "INVALID_PARAMETER")
        })?;

    let engine = state.engine.clone();
    let result = tokio::task::spawn_blocking(move || engine.run(&request))
        .await
        .map_err(|e| {
            tracing::error!("Simulation task failed: {}", e);
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Simulation task failed",
                "INTERNAL_ERROR",
            )
        })?
        .map_err(|e| {
            tracing::error!("Simulation error: {}", e);
            api_error(StatusCode::BAD_REQUEST, e.user_message(), "SIMULATION_ERROR")
        })?;

    tracing::info!(
        sims = result.final_wealth_samples.len(),
        expected = result.metrics.expected,
        var_5 = result.metrics.var_5,
        shocked = result.shock_summary.total_shocked,
        "Simulation complete"
    );

    Ok(Json(result))
}
