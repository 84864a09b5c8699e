//! Immutable record of a completed interaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{InteractionId, PlanPayload, PlanType, Regime, SemanticVector, UserId};

/// Appended once per recorded choice and never modified afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: InteractionId,
    pub user_id: Option<UserId>,
    /// Vector of the intent the candidate was synthesized for.
    pub intent_vector: SemanticVector,
    /// Vector of the chosen candidate.
    pub candidate_vector: SemanticVector,
    pub plan_type: PlanType,
    pub plan_payload: PlanPayload,
    pub title: String,
    pub description: String,
    pub regime: Regime,
    pub success: bool,
    pub duration_ms: u64,
    pub quality: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

impl InteractionRecord {
    pub fn belongs_to(&self, user: &UserId) -> bool {
        self.user_id.as_ref() == Some(user)
    }
}
