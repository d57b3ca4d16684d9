//! JSON handlers for the slot grid.

use axum::Json;
use axum::extract::{Path, State};

use timer24h_app::ports::HostPorts;
use timer24h_domain::slot::TimeSlot;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/slots`
pub async fn list<H: HostPorts>(State(state): State<AppState<H>>) -> Json<Vec<TimeSlot>> {
    Json(state.engine.grid().snapshot())
}

/// `POST /api/slots/{hour}/{minute}/toggle`
///
/// Responds with the slot as it is after the toggle. Persistence happens in
/// the background.
pub async fn toggle<H: HostPorts>(
    State(state): State<AppState<H>>,
    Path((hour, minute)): Path<(u8, u8)>,
) -> Result<Json<TimeSlot>, ApiError> {
    let active = state
        .engine
        .toggle(hour, minute)
        .ok_or_else(|| ApiError::NotFound(format!("no slot starts at {hour:02}:{minute:02}")))?;
    Ok(Json(TimeSlot {
        hour,
        minute,
        active,
    }))
}
