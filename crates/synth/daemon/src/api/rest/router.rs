//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let api_routes = Router::new()
        // Health and status
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::daemon_status))
        // Synthesis
        .route("/encode", post(handlers::encode_intent))
        .route("/synthesize", post(handlers::synthesize))
        // Feedback
        .route("/record-choice", post(handlers::record_choice))
        .route("/feedback/flush", post(handlers::flush_feedback))
        // Statistics
        .route("/plan-types", get(handlers::list_plan_stats))
        .route("/catalog", get(handlers::list_templates))
        .route("/profiles/:user_id", get(handlers::get_profile));

    let router = Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http());

    let router = if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}
