//! Plan statistics, catalog and profile handlers

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use synth_generator::PlanProfile;
use synth_store::QueryWindow;
use synth_types::{IntentCategory, PlanType, PlanTypeStats, UserId, UserProfile};

/// Paging parameters
#[derive(Debug, Deserialize)]
pub struct WindowParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    100
}

impl From<WindowParams> for QueryWindow {
    fn from(params: WindowParams) -> Self {
        QueryWindow {
            limit: params.limit,
            offset: params.offset,
        }
    }
}

/// List observed plan-type statistics
pub async fn list_plan_stats(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> ApiResult<Json<Vec<PlanTypeStats>>> {
    let stats = state.engine.plan_stats(params.into()).await?;
    Ok(Json(stats))
}

/// Catalog entry summary
#[derive(Debug, Serialize)]
pub struct TemplateSummary {
    pub plan_type: PlanType,
    pub category: IntentCategory,
    pub profile: PlanProfile,
    pub title: String,
    pub description: String,
    pub steps: usize,
}

/// List the built-in plan templates
pub async fn list_templates(State(state): State<AppState>) -> Json<Vec<TemplateSummary>> {
    let templates = state
        .engine
        .catalog()
        .templates()
        .iter()
        .map(|template| TemplateSummary {
            plan_type: template.plan_type.clone(),
            category: template.category,
            profile: template.profile,
            title: template.title.clone(),
            description: template.description.clone(),
            steps: template.steps.len(),
        })
        .collect();
    Json(templates)
}

/// Get one user's preference profile
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    let profile = state
        .engine
        .profile(&UserId::new(user_id.as_str()))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Profile {} not found", user_id)))?;

    Ok(Json(profile))
}
