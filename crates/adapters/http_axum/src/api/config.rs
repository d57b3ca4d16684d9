//! JSON handlers for the widget configuration.

use axum::Json;
use axum::extract::State;

use timer24h_app::ports::HostPorts;
use timer24h_domain::config::CardConfig;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/config`
pub async fn show<H: HostPorts>(State(state): State<AppState<H>>) -> Json<CardConfig> {
    Json(CardConfig::clone(&state.engine.config()))
}

/// `PUT /api/config` — apply a raw configuration and reload the saved schedule.
///
/// Malformed fields fall back to defaults; only a non-object body is rejected.
pub async fn update<H: HostPorts>(
    State(state): State<AppState<H>>,
    Json(raw): Json<serde_json::Value>,
) -> Result<Json<CardConfig>, ApiError> {
    let config = state.engine.set_config(&raw).await?;
    Ok(Json(CardConfig::clone(&config)))
}
