//! In-memory reference implementation of the synthesis storage traits.
//!
//! Statistics and profiles live in `DashMap`s: an update holds only the
//! shard entry for its key, so writes to one plan type or user serialize
//! while writes to other keys proceed. The interaction log is a bounded ring
//! that drops the oldest record once full.

use std::collections::VecDeque;
use std::sync::RwLock;

use async_trait::async_trait;
use dashmap::DashMap;
use synth_types::{
    InteractionRecord, PlanOutcome, PlanType, PlanTypeStats, ProfileUpdate, UserId, UserProfile,
};

use crate::traits::{InteractionStore, PlanStatsStore, ProfileStore, QueryWindow};
use crate::{StoreError, StoreResult};

/// Default number of interaction records retained.
pub const DEFAULT_INTERACTION_CAPACITY: usize = 10_000;

/// In-memory synthesis store.
pub struct InMemorySynthesisStore {
    plan_stats: DashMap<PlanType, PlanTypeStats>,
    profiles: DashMap<UserId, UserProfile>,
    interactions: RwLock<VecDeque<InteractionRecord>>,
    interaction_capacity: usize,
}

impl InMemorySynthesisStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INTERACTION_CAPACITY)
    }

    /// Store retaining at most `interaction_capacity` interaction records.
    pub fn with_capacity(interaction_capacity: usize) -> Self {
        Self {
            plan_stats: DashMap::new(),
            profiles: DashMap::new(),
            interactions: RwLock::new(VecDeque::new()),
            interaction_capacity: interaction_capacity.max(1),
        }
    }
}

impl Default for InMemorySynthesisStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlanStatsStore for InMemorySynthesisStore {
    async fn get_plan_stats(&self, plan_type: &PlanType) -> StoreResult<Option<PlanTypeStats>> {
        Ok(self.plan_stats.get(plan_type).map(|entry| entry.clone()))
    }

    async fn apply_outcome(
        &self,
        plan_type: &PlanType,
        outcome: PlanOutcome,
    ) -> StoreResult<PlanTypeStats> {
        if plan_type.as_str().trim().is_empty() {
            return Err(StoreError::InvalidInput("empty plan type".to_string()));
        }

        let mut entry = self
            .plan_stats
            .entry(plan_type.clone())
            .or_insert_with(|| PlanTypeStats::new(plan_type.clone()));
        entry.apply(&outcome);
        Ok(entry.clone())
    }

    async fn list_plan_stats(&self, window: QueryWindow) -> StoreResult<Vec<PlanTypeStats>> {
        let mut values: Vec<PlanTypeStats> =
            self.plan_stats.iter().map(|entry| entry.clone()).collect();
        values.sort_by(|a, b| {
            b.execution_count
                .cmp(&a.execution_count)
                .then_with(|| a.plan_type.cmp(&b.plan_type))
        });
        Ok(apply_window(values, window))
    }
}

#[async_trait]
impl ProfileStore for InMemorySynthesisStore {
    async fn get_profile(&self, user_id: &UserId) -> StoreResult<Option<UserProfile>> {
        Ok(self.profiles.get(user_id).map(|entry| entry.clone()))
    }

    async fn apply_profile_update(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> StoreResult<UserProfile> {
        let mut entry = self
            .profiles
            .entry(user_id.clone())
            .or_insert_with(|| UserProfile::new(user_id.clone()));
        entry.apply(&update);
        Ok(entry.clone())
    }

    async fn list_profiles(&self, window: QueryWindow) -> StoreResult<Vec<UserProfile>> {
        let mut values: Vec<UserProfile> =
            self.profiles.iter().map(|entry| entry.clone()).collect();
        values.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(apply_window(values, window))
    }
}

#[async_trait]
impl InteractionStore for InMemorySynthesisStore {
    async fn append_interaction(&self, record: InteractionRecord) -> StoreResult<()> {
        let mut guard = self
            .interactions
            .write()
            .map_err(|_| StoreError::Backend("interactions lock poisoned".to_string()))?;
        if guard.len() >= self.interaction_capacity {
            guard.pop_front();
        }
        guard.push_back(record);
        Ok(())
    }

    async fn recent_successes(&self, limit: usize) -> StoreResult<Vec<InteractionRecord>> {
        let guard = self
            .interactions
            .read()
            .map_err(|_| StoreError::Backend("interactions lock poisoned".to_string()))?;
        Ok(guard
            .iter()
            .rev()
            .filter(|record| record.success)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn recent_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> StoreResult<Vec<InteractionRecord>> {
        let guard = self
            .interactions
            .read()
            .map_err(|_| StoreError::Backend("interactions lock poisoned".to_string()))?;
        Ok(guard
            .iter()
            .rev()
            .filter(|record| record.belongs_to(user_id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn interaction_count(&self) -> StoreResult<usize> {
        let guard = self
            .interactions
            .read()
            .map_err(|_| StoreError::Backend("interactions lock poisoned".to_string()))?;
        Ok(guard.len())
    }
}

fn apply_window<T>(items: Vec<T>, window: QueryWindow) -> Vec<T> {
    let iter = items.into_iter().skip(window.offset);
    if window.limit == 0 {
        iter.collect()
    } else {
        iter.take(window.limit).collect()
    }
}
