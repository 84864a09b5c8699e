//! Health and status handlers

use crate::api::rest::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use synth_engine::MetricsSnapshot;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
    })
}

/// Daemon status response
#[derive(Debug, Serialize)]
pub struct DaemonStatusResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// Feedback entries waiting for the store to come back.
    pub pending_feedback: usize,
    pub metrics: MetricsSnapshot,
}

/// Daemon status endpoint
pub async fn daemon_status(State(state): State<AppState>) -> Json<DaemonStatusResponse> {
    let pending_feedback = state.engine.pending_feedback().await;
    let status = if pending_feedback > 0 {
        "degraded"
    } else {
        "healthy"
    };

    Json(DaemonStatusResponse {
        status: status.to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
        started_at: state.started_at,
        pending_feedback,
        metrics: state.engine.metrics(),
    })
}
