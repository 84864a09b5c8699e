use async_trait::async_trait;
use synth_types::{
    InteractionRecord, PlanOutcome, PlanType, PlanTypeStats, ProfileUpdate, UserId, UserProfile,
};

use crate::StoreResult;

/// Generic query window for paged reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryWindow {
    pub limit: usize,
    pub offset: usize,
}

impl QueryWindow {
    pub fn first(limit: usize) -> Self {
        Self { limit, offset: 0 }
    }
}

/// Storage interface for per-plan-type statistics.
#[async_trait]
pub trait PlanStatsStore: Send + Sync {
    /// Get the statistics for one plan type, if it was ever observed.
    async fn get_plan_stats(&self, plan_type: &PlanType) -> StoreResult<Option<PlanTypeStats>>;

    /// Fold an outcome into a plan type's statistics, creating them on first
    /// observation. Updates to the same plan type are serialized.
    async fn apply_outcome(
        &self,
        plan_type: &PlanType,
        outcome: PlanOutcome,
    ) -> StoreResult<PlanTypeStats>;

    /// List statistics ordered by execution count, most used first.
    async fn list_plan_stats(&self, window: QueryWindow) -> StoreResult<Vec<PlanTypeStats>>;
}

/// Storage interface for user preference profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: &UserId) -> StoreResult<Option<UserProfile>>;

    /// Apply a feedback update, creating a neutral profile first if needed.
    /// Updates to the same user are serialized.
    async fn apply_profile_update(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> StoreResult<UserProfile>;

    async fn list_profiles(&self, window: QueryWindow) -> StoreResult<Vec<UserProfile>>;
}

/// Storage interface for the append-only interaction log.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    async fn append_interaction(&self, record: InteractionRecord) -> StoreResult<()>;

    /// Most recent successful interactions, newest first.
    async fn recent_successes(&self, limit: usize) -> StoreResult<Vec<InteractionRecord>>;

    /// Most recent interactions of one user, newest first.
    async fn recent_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> StoreResult<Vec<InteractionRecord>>;

    async fn interaction_count(&self) -> StoreResult<usize>;
}

/// Unified storage bundle used by the synthesis pipeline.
pub trait SynthesisStorage: PlanStatsStore + ProfileStore + InteractionStore + Send + Sync {}

impl<T> SynthesisStorage for T where T: PlanStatsStore + ProfileStore + InteractionStore + Send + Sync
{}
