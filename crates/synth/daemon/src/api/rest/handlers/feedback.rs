//! Feedback handlers

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{extract::State, Json};
use synth_engine::ChoiceReport;
use synth_feedback::{FeedbackReceipt, FlushReport};

/// Record which surfaced candidate the caller executed
pub async fn record_choice(
    State(state): State<AppState>,
    Json(report): Json<ChoiceReport>,
) -> ApiResult<Json<FeedbackReceipt>> {
    let receipt = state.engine.record_choice(report).await?;
    Ok(Json(receipt))
}

/// Retry feedback queued while the store was unavailable
pub async fn flush_feedback(State(state): State<AppState>) -> Json<FlushReport> {
    Json(state.engine.flush_feedback().await)
}
