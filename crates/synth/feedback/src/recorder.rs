use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use synth_store::{StoreError, SynthesisStorage};
use synth_types::{
    Candidate, EncodedIntent, InteractionId, InteractionRecord, PlanOutcome, PlanType,
    PlanTypeStats, ProfileUpdate, UserId, UserProfile,
};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::config::FeedbackConfig;
use crate::error::{FeedbackError, FeedbackResult};

/// Whether a choice reached the store or is waiting in the pending queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    Recorded,
    Queued,
}

/// Acknowledgement returned for every recorded choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackReceipt {
    pub interaction_id: InteractionId,
    pub plan_type: PlanType,
    pub status: FeedbackStatus,
    /// The execution ran past the timeout and was counted as a failure.
    pub timed_out: bool,
    pub attempts: u32,
    /// Statistics after the update, when it landed.
    pub plan_stats: Option<PlanTypeStats>,
    /// Profile after the update, when a user was given and it landed.
    pub profile: Option<UserProfile>,
}

/// Outcome of replaying the pending queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushReport {
    pub recorded: usize,
    pub requeued: usize,
    pub discarded: usize,
}

/// One choice and which of its writes already landed.
#[derive(Debug, Clone)]
struct PendingFeedback {
    record: InteractionRecord,
    outcome: PlanOutcome,
    profile_update: Option<(UserId, ProfileUpdate)>,
    plan_stats: Option<PlanTypeStats>,
    profile: Option<UserProfile>,
    appended: bool,
    attempts: u32,
}

impl PendingFeedback {
    fn receipt(&self, status: FeedbackStatus) -> FeedbackReceipt {
        FeedbackReceipt {
            interaction_id: self.record.id.clone(),
            plan_type: self.record.plan_type.clone(),
            status,
            timed_out: self.outcome.timed_out,
            attempts: self.attempts,
            plan_stats: self.plan_stats.clone(),
            profile: self.profile.clone(),
        }
    }
}

/// Records chosen candidates and their outcomes.
pub struct FeedbackRecorder {
    config: FeedbackConfig,
    storage: Arc<dyn SynthesisStorage>,
    pending: Mutex<VecDeque<PendingFeedback>>,
}

impl FeedbackRecorder {
    pub fn new(config: FeedbackConfig, storage: Arc<dyn SynthesisStorage>) -> Self {
        Self {
            config,
            storage,
            pending: Mutex::new(VecDeque::new()),
        }
    }

    pub fn config(&self) -> &FeedbackConfig {
        &self.config
    }

    /// Number of entries waiting for a flush.
    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Record that `chosen` was executed for `intent`.
    ///
    /// Store unavailability never surfaces as an error: the entry is queued
    /// and the receipt says so. Only writes the store rejects outright fail.
    #[instrument(skip_all, fields(plan_type = %chosen.plan_type, success = success))]
    pub async fn record(
        &self,
        chosen: &Candidate,
        success: bool,
        duration: Duration,
        user_id: Option<UserId>,
        intent: &EncodedIntent,
    ) -> FeedbackResult<FeedbackReceipt> {
        let mut entry = self.prepare(chosen, success, duration, user_id, intent);

        match self.write_with_retry(&mut entry).await {
            Ok(()) => {
                debug!(
                    interaction = %entry.record.id,
                    attempts = entry.attempts,
                    "feedback recorded"
                );
                Ok(entry.receipt(FeedbackStatus::Recorded))
            }
            Err(err) if err.is_transient() => {
                warn!(
                    interaction = %entry.record.id,
                    attempts = entry.attempts,
                    error = %err,
                    "feedback store unavailable, queueing"
                );
                let receipt = entry.receipt(FeedbackStatus::Queued);
                self.enqueue(entry).await;
                Ok(receipt)
            }
            Err(err) => Err(FeedbackError::Rejected(err)),
        }
    }

    /// Replay queued entries. Entries that still hit a transient failure go
    /// back to the queue; rejected ones are discarded.
    #[instrument(skip(self))]
    pub async fn flush_pending(&self) -> FlushReport {
        let drained: Vec<PendingFeedback> = {
            let mut pending = self.pending.lock().await;
            pending.drain(..).collect()
        };

        let mut report = FlushReport::default();
        let mut requeue = Vec::new();
        for mut entry in drained {
            match self.write_with_retry(&mut entry).await {
                Ok(()) => report.recorded += 1,
                Err(err) if err.is_transient() => {
                    report.requeued += 1;
                    requeue.push(entry);
                }
                Err(err) => {
                    warn!(
                        interaction = %entry.record.id,
                        error = %err,
                        "discarding queued feedback"
                    );
                    report.discarded += 1;
                }
            }
        }

        if !requeue.is_empty() {
            let mut pending = self.pending.lock().await;
            for entry in requeue.into_iter().rev() {
                pending.push_front(entry);
            }
            self.enforce_capacity(&mut pending);
        }

        if report.recorded + report.discarded > 0 {
            info!(
                recorded = report.recorded,
                requeued = report.requeued,
                discarded = report.discarded,
                "flushed pending feedback"
            );
        }
        report
    }

    fn prepare(
        &self,
        chosen: &Candidate,
        success: bool,
        duration: Duration,
        user_id: Option<UserId>,
        intent: &EncodedIntent,
    ) -> PendingFeedback {
        let duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        let timed_out = duration_ms >= self.config.timeout_after_ms;
        let quality = chosen.quality.as_ref().map(|q| q.unified);

        let outcome = PlanOutcome {
            success,
            timed_out,
            duration_ms,
            quality,
        };
        let profile_update = user_id.clone().map(|user| {
            (
                user,
                ProfileUpdate {
                    vector: chosen.vector,
                    learning_rate: self.config.learning_rate,
                    regime: chosen.regime,
                    success: success && !timed_out,
                },
            )
        });
        let record = InteractionRecord {
            id: InteractionId::new(),
            user_id,
            intent_vector: intent.vector,
            candidate_vector: chosen.vector,
            plan_type: chosen.plan_type.clone(),
            plan_payload: chosen.plan_payload.clone(),
            title: chosen.title.clone(),
            description: chosen.description.clone(),
            regime: chosen.regime,
            success: success && !timed_out,
            duration_ms,
            quality,
            recorded_at: Utc::now(),
        };

        PendingFeedback {
            record,
            outcome,
            profile_update,
            plan_stats: None,
            profile: None,
            appended: false,
            attempts: 0,
        }
    }

    async fn write_with_retry(&self, entry: &mut PendingFeedback) -> Result<(), StoreError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            entry.attempts += 1;
            match self.write(entry).await {
                Ok(()) => return Ok(()),
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    debug!(attempt, error = %err, "feedback write failed, retrying");
                    tokio::time::sleep(self.backoff(attempt)).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Apply whichever writes have not landed yet.
    async fn write(&self, entry: &mut PendingFeedback) -> Result<(), StoreError> {
        if entry.plan_stats.is_none() {
            let stats = self
                .storage
                .apply_outcome(&entry.record.plan_type, entry.outcome)
                .await?;
            entry.plan_stats = Some(stats);
        }

        if entry.profile.is_none() {
            if let Some((user_id, update)) = &entry.profile_update {
                let profile = self
                    .storage
                    .apply_profile_update(user_id, *update)
                    .await?;
                entry.profile = Some(profile);
            }
        }

        if !entry.appended {
            self.storage
                .append_interaction(entry.record.clone())
                .await?;
            entry.appended = true;
        }
        Ok(())
    }

    fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.config.retry_backoff_ms.saturating_mul(u64::from(attempt)))
    }

    async fn enqueue(&self, entry: PendingFeedback) {
        let mut pending = self.pending.lock().await;
        pending.push_back(entry);
        self.enforce_capacity(&mut pending);
    }

    fn enforce_capacity(&self, pending: &mut VecDeque<PendingFeedback>) {
        let capacity = self.config.pending_capacity.max(1);
        while pending.len() > capacity {
            if let Some(dropped) = pending.pop_front() {
                warn!(
                    interaction = %dropped.record.id,
                    plan_type = %dropped.record.plan_type,
                    "pending feedback queue full, dropping oldest"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use synth_store::{
        InMemorySynthesisStore, InteractionStore, PlanStatsStore, ProfileStore, QueryWindow,
        StoreResult,
    };
    use synth_types::{
        CandidateId, IntentCategory, PlanPayload, PlanStep, QualityBreakdown, Regime,
        SemanticVector, StepKind, StrategyKind,
    };

    /// Store whose stats writes fail while `failures` is positive.
    struct FlakyStore {
        inner: InMemorySynthesisStore,
        failures: AtomicUsize,
        error: StoreError,
    }

    impl FlakyStore {
        fn new(failures: usize) -> Self {
            Self::failing_with(failures, StoreError::Unavailable("primary down".into()))
        }

        fn failing_with(failures: usize, error: StoreError) -> Self {
            Self {
                inner: InMemorySynthesisStore::new(),
                failures: AtomicUsize::new(failures),
                error,
            }
        }

        fn heal(&self) {
            self.failures.store(0, Ordering::SeqCst);
        }

        fn trip(&self) -> StoreResult<()> {
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(self.error.clone());
            }
            Ok(())
        }
    }

    #[async_trait]
    impl PlanStatsStore for FlakyStore {
        async fn get_plan_stats(&self, plan_type: &PlanType) -> StoreResult<Option<PlanTypeStats>> {
            self.inner.get_plan_stats(plan_type).await
        }

        async fn apply_outcome(
            &self,
            plan_type: &PlanType,
            outcome: PlanOutcome,
        ) -> StoreResult<PlanTypeStats> {
            self.trip()?;
            self.inner.apply_outcome(plan_type, outcome).await
        }

        async fn list_plan_stats(&self, window: QueryWindow) -> StoreResult<Vec<PlanTypeStats>> {
            self.inner.list_plan_stats(window).await
        }
    }

    #[async_trait]
    impl ProfileStore for FlakyStore {
        async fn get_profile(&self, user_id: &UserId) -> StoreResult<Option<UserProfile>> {
            self.inner.get_profile(user_id).await
        }

        async fn apply_profile_update(
            &self,
            user_id: &UserId,
            update: ProfileUpdate,
        ) -> StoreResult<UserProfile> {
            self.inner.apply_profile_update(user_id, update).await
        }

        async fn list_profiles(&self, window: QueryWindow) -> StoreResult<Vec<UserProfile>> {
            self.inner.list_profiles(window).await
        }
    }

    #[async_trait]
    impl InteractionStore for FlakyStore {
        async fn append_interaction(&self, record: InteractionRecord) -> StoreResult<()> {
            self.inner.append_interaction(record).await
        }

        async fn recent_successes(&self, limit: usize) -> StoreResult<Vec<InteractionRecord>> {
            self.inner.recent_successes(limit).await
        }

        async fn recent_for_user(
            &self,
            user_id: &UserId,
            limit: usize,
        ) -> StoreResult<Vec<InteractionRecord>> {
            self.inner.recent_for_user(user_id, limit).await
        }

        async fn interaction_count(&self) -> StoreResult<usize> {
            self.inner.interaction_count().await
        }
    }

    fn fast_config() -> FeedbackConfig {
        FeedbackConfig {
            retry_backoff_ms: 1,
            ..FeedbackConfig::default()
        }
    }

    fn intent() -> EncodedIntent {
        EncodedIntent {
            vector: SemanticVector::try_new(0.7, 0.3, 0.5, 0.4).unwrap(),
            regime: Regime::Stabilization,
            confidence: 0.95,
            category: IntentCategory::Retrieval,
            degenerate: false,
        }
    }

    fn chosen(plan: &str) -> Candidate {
        let plan_type = PlanType::new(plan);
        Candidate {
            id: CandidateId::new(),
            strategy_origin: StrategyKind::HistoryLookup,
            plan_type: plan_type.clone(),
            title: "Indexed lookup".into(),
            description: "Filter through the primary index".into(),
            confidence: 0.9,
            regime: Regime::Stabilization,
            estimated_duration_ms: 24,
            estimated_cost: 1.0,
            plan_payload: PlanPayload {
                plan_type,
                steps: vec![PlanStep::new("index_filter", StepKind::Filter, 1.0)],
                external_dependencies: 0,
                edge_cases_covered: 4,
                optimizations: Vec::new(),
            },
            reasoning: String::new(),
            vector: SemanticVector::try_new(1.0, 0.0, 0.0, 0.0).unwrap(),
            quality: Some(QualityBreakdown::from_scores(9.5, 9.5, 9.5, 9.5, 9.5)),
        }
    }

    #[tokio::test]
    async fn test_record_updates_stats_and_profile() {
        let store = Arc::new(InMemorySynthesisStore::new());
        let recorder = FeedbackRecorder::new(fast_config(), store.clone());
        let user = UserId::new("alice");
        let candidate = chosen("lookup.indexed");

        let receipt = recorder
            .record(
                &candidate,
                true,
                Duration::from_millis(18),
                Some(user.clone()),
                &intent(),
            )
            .await
            .unwrap();

        assert_eq!(receipt.status, FeedbackStatus::Recorded);
        assert_eq!(receipt.attempts, 1);
        assert!(!receipt.timed_out);

        let stats = store
            .get_plan_stats(&candidate.plan_type)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stats.execution_count, 1);
        assert_eq!(stats.success_count, 1);

        let profile = store.get_profile(&user).await.unwrap().unwrap();
        let before = SemanticVector::NEUTRAL.similarity(&candidate.vector);
        let after = profile.preference.similarity(&candidate.vector);
        assert!(after > before);
        assert!(after < 1.0);
        let bounded = SemanticVector::NEUTRAL.blend(&candidate.vector, 0.1);
        assert!(after <= bounded.similarity(&candidate.vector) + 1e-9);

        assert_eq!(store.interaction_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_each_record_counts_once() {
        let store = Arc::new(InMemorySynthesisStore::new());
        let recorder = FeedbackRecorder::new(fast_config(), store.clone());
        let candidate = chosen("lookup.indexed");

        for expected in 1..=3u64 {
            recorder
                .record(&candidate, true, Duration::from_millis(20), None, &intent())
                .await
                .unwrap();
            let stats = store
                .get_plan_stats(&candidate.plan_type)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(stats.execution_count, expected);
        }
    }

    #[tokio::test]
    async fn test_long_execution_counts_as_timeout() {
        let store = Arc::new(InMemorySynthesisStore::new());
        let recorder = FeedbackRecorder::new(fast_config(), store.clone());
        let candidate = chosen("scan.full");

        let receipt = recorder
            .record(&candidate, true, Duration::from_secs(30), None, &intent())
            .await
            .unwrap();
        assert!(receipt.timed_out);

        let stats = receipt.plan_stats.unwrap();
        assert_eq!(stats.execution_count, 1);
        assert_eq!(stats.timeout_count, 1);
        assert_eq!(stats.failure_count, 1);
        assert_eq!(stats.success_count, 0);
    }

    #[tokio::test]
    async fn test_anonymous_choice_leaves_profiles_alone() {
        let store = Arc::new(InMemorySynthesisStore::new());
        let recorder = FeedbackRecorder::new(fast_config(), store.clone());

        let receipt = recorder
            .record(
                &chosen("lookup.indexed"),
                true,
                Duration::from_millis(5),
                None,
                &intent(),
            )
            .await
            .unwrap();
        assert!(receipt.profile.is_none());
        assert!(store
            .list_profiles(QueryWindow::first(10))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let store = Arc::new(FlakyStore::new(2));
        let recorder = FeedbackRecorder::new(fast_config(), store.clone());
        let candidate = chosen("lookup.indexed");

        let receipt = recorder
            .record(&candidate, true, Duration::from_millis(10), None, &intent())
            .await
            .unwrap();

        assert_eq!(receipt.status, FeedbackStatus::Recorded);
        assert_eq!(receipt.attempts, 3);
        assert_eq!(receipt.plan_stats.unwrap().execution_count, 1);
        assert_eq!(recorder.pending_len().await, 0);
    }

    #[tokio::test]
    async fn test_exhausted_retries_queue_then_flush() {
        let store = Arc::new(FlakyStore::new(usize::MAX));
        let recorder = FeedbackRecorder::new(fast_config(), store.clone());
        let user = UserId::new("bob");
        let candidate = chosen("lookup.indexed");

        let receipt = recorder
            .record(
                &candidate,
                true,
                Duration::from_millis(10),
                Some(user.clone()),
                &intent(),
            )
            .await
            .unwrap();
        assert_eq!(receipt.status, FeedbackStatus::Queued);
        assert_eq!(receipt.attempts, 3);
        assert_eq!(recorder.pending_len().await, 1);

        let still_down = recorder.flush_pending().await;
        assert_eq!(still_down.requeued, 1);
        assert_eq!(recorder.pending_len().await, 1);

        store.heal();
        let report = recorder.flush_pending().await;
        assert_eq!(
            report,
            FlushReport {
                recorded: 1,
                requeued: 0,
                discarded: 0
            }
        );
        assert_eq!(recorder.pending_len().await, 0);

        let stats = store
            .get_plan_stats(&candidate.plan_type)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stats.execution_count, 1);
        assert!(store.get_profile(&user).await.unwrap().is_some());
        assert_eq!(store.interaction_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_pending_queue_is_bounded() {
        let store = Arc::new(FlakyStore::new(usize::MAX));
        let config = FeedbackConfig {
            pending_capacity: 2,
            max_attempts: 1,
            ..fast_config()
        };
        let recorder = FeedbackRecorder::new(config, store);

        for plan in ["a", "b", "c"] {
            let receipt = recorder
                .record(&chosen(plan), true, Duration::from_millis(1), None, &intent())
                .await
                .unwrap();
            assert_eq!(receipt.status, FeedbackStatus::Queued);
        }
        assert_eq!(recorder.pending_len().await, 2);
    }

    #[tokio::test]
    async fn test_rejected_writes_surface_as_errors() {
        let store = Arc::new(FlakyStore::failing_with(
            1,
            StoreError::InvalidInput("plan type must not be empty".into()),
        ));
        let recorder = FeedbackRecorder::new(fast_config(), store);

        let result = recorder
            .record(&chosen("x"), true, Duration::from_millis(1), None, &intent())
            .await;
        assert!(matches!(result, Err(FeedbackError::Rejected(_))));
        assert_eq!(recorder.pending_len().await, 0);
    }
}
