//! Liveness probe.

use crate::{error::AppError, state::AppState};
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
    pub checked_at: DateTime<Utc>,
}

/// `GET /health`: 200 once the balance store answers a ping, 500 otherwise.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state.balances.ping().await?;

    Ok(Json(HealthResponse {
        status: "ok",
        store: "reachable",
        checked_at: Utc::now(),
    }))
}
