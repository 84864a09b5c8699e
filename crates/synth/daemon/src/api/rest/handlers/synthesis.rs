//! Encoding and synthesis handlers

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{extract::State, Json};
use synth_engine::{SynthesisRequest, SynthesisResponse};
use synth_types::{EncodedIntent, IntentSummary};

/// Encode a summary without generating anything
pub async fn encode_intent(
    State(state): State<AppState>,
    Json(summary): Json<IntentSummary>,
) -> Json<EncodedIntent> {
    Json(state.engine.encode(&summary))
}

/// Run one synthesize call
pub async fn synthesize(
    State(state): State<AppState>,
    Json(request): Json<SynthesisRequest>,
) -> ApiResult<Json<SynthesisResponse>> {
    if !request.threshold_relaxation.is_finite() || request.threshold_relaxation < 0.0 {
        return Err(ApiError::Validation(format!(
            "threshold_relaxation must be a non-negative number, got {}",
            request.threshold_relaxation
        )));
    }

    let response = state.engine.synthesize(request).await;
    tracing::debug!(
        outcome = ?response.outcome,
        surfaced = response.candidates.len(),
        elapsed_ms = response.elapsed_ms,
        "synthesize served"
    );
    Ok(Json(response))
}
