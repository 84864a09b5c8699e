//! Concurrent fan-out over the generation strategies.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use synth_store::SynthesisStorage;
use synth_types::{Candidate, EncodedIntent, StrategyKind, SystemIndicators, UserId};
use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};

use crate::catalog::PlanCatalog;
use crate::config::GeneratorConfig;
use crate::indicators::IndicatorSource;
use crate::strategies::{self, StrategyContext};

/// Inputs of one generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub intent: EncodedIntent,
    pub user_id: Option<UserId>,
    /// Caller-supplied indicators; the configured source is asked otherwise.
    pub indicators: Option<SystemIndicators>,
    /// Hard stop for every strategy, on top of the per-strategy budget.
    pub deadline: Option<tokio::time::Instant>,
}

impl GenerationRequest {
    pub fn new(intent: EncodedIntent) -> Self {
        Self {
            intent,
            user_id: None,
            indicators: None,
            deadline: None,
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_indicators(mut self, indicators: SystemIndicators) -> Self {
        self.indicators = Some(indicators);
        self
    }

    pub fn with_deadline(mut self, deadline: tokio::time::Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// How one strategy ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StrategyStatus {
    Completed,
    Failed { error: String },
    TimedOut,
    Panicked,
}

/// Outcome of one strategy within a generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyReport {
    pub strategy: StrategyKind,
    #[serde(flatten)]
    pub status: StrategyStatus,
    pub candidates: usize,
    pub elapsed_ms: u64,
}

/// Per-strategy outcomes of a generation call, in strategy order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub strategies: Vec<StrategyReport>,
    /// A strategy was cut by the request deadline rather than its own budget.
    #[serde(default)]
    pub deadline_reached: bool,
}

impl GenerationReport {
    pub fn get(&self, strategy: StrategyKind) -> Option<&StrategyReport> {
        self.strategies.iter().find(|r| r.strategy == strategy)
    }

    /// Strategies that did not complete, timeouts included.
    pub fn failures(&self) -> usize {
        self.strategies
            .iter()
            .filter(|r| r.status != StrategyStatus::Completed)
            .count()
    }

    pub fn timeouts(&self) -> usize {
        self.strategies
            .iter()
            .filter(|r| r.status == StrategyStatus::TimedOut)
            .count()
    }

    pub fn produced(&self) -> usize {
        self.strategies.iter().map(|r| r.candidates).sum()
    }
}

/// Candidates from every strategy that completed, plus the report.
#[derive(Debug, Clone)]
pub struct Generation {
    pub candidates: Vec<Candidate>,
    pub report: GenerationReport,
}

/// Runs the enabled strategies concurrently and concatenates their output.
#[derive(Clone)]
pub struct CandidateGenerator {
    ctx: Arc<StrategyContext>,
}

impl CandidateGenerator {
    pub fn new(
        config: GeneratorConfig,
        catalog: Arc<PlanCatalog>,
        storage: Arc<dyn SynthesisStorage>,
        indicators: Arc<dyn IndicatorSource>,
    ) -> Self {
        Self {
            ctx: Arc::new(StrategyContext {
                config,
                catalog,
                storage,
                indicators,
            }),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.ctx.config
    }

    pub fn catalog(&self) -> &PlanCatalog {
        &self.ctx.catalog
    }

    /// Run every enabled strategy under its own timeout, capped by the
    /// request deadline when one is set.
    ///
    /// A strategy that errors, panics or overruns contributes nothing and is
    /// reported; the others are unaffected and their candidates are kept.
    /// Output order follows strategy order, not completion order.
    #[instrument(skip(self, request), fields(regime = %request.intent.regime))]
    pub async fn generate(&self, request: GenerationRequest) -> Generation {
        let budget = Duration::from_millis(self.ctx.config.strategy_timeout_ms);
        let own_deadline = tokio::time::Instant::now() + budget;
        let (cutoff, deadline_bound) = match request.deadline {
            Some(deadline) if deadline < own_deadline => (deadline, true),
            _ => (own_deadline, false),
        };
        let request = Arc::new(request);

        let mut enabled: Vec<StrategyKind> = Vec::with_capacity(StrategyKind::ALL.len());
        for kind in StrategyKind::ALL {
            if self.ctx.config.enabled.contains(&kind) {
                enabled.push(kind);
            }
        }

        let mut set = JoinSet::new();
        for kind in enabled.iter().copied() {
            let ctx = Arc::clone(&self.ctx);
            let request = Arc::clone(&request);
            set.spawn(async move {
                let started = Instant::now();
                let run = AssertUnwindSafe(strategies::run(kind, &ctx, &request)).catch_unwind();
                let outcome = tokio::time::timeout_at(cutoff, run).await;
                (kind, outcome, started.elapsed())
            });
        }

        let mut finished: HashMap<StrategyKind, (Vec<Candidate>, StrategyReport)> = HashMap::new();
        while let Some(joined) = set.join_next().await {
            let (kind, outcome, elapsed) = match joined {
                Ok(result) => result,
                Err(e) => {
                    warn!(error = %e, "strategy task aborted");
                    continue;
                }
            };
            let elapsed_ms = elapsed.as_millis() as u64;

            let (candidates, status) = match outcome {
                Ok(Ok(Ok(candidates))) => (candidates, StrategyStatus::Completed),
                Ok(Ok(Err(e))) => {
                    warn!(strategy = %kind, error = %e, "strategy failed");
                    (Vec::new(), StrategyStatus::Failed { error: e.to_string() })
                }
                Ok(Err(_)) => {
                    warn!(strategy = %kind, "strategy panicked");
                    (Vec::new(), StrategyStatus::Panicked)
                }
                Err(_) if deadline_bound => {
                    warn!(strategy = %kind, "request deadline reached, strategy cancelled");
                    (Vec::new(), StrategyStatus::TimedOut)
                }
                Err(_) => {
                    warn!(strategy = %kind, budget_ms = budget.as_millis() as u64, "strategy timed out");
                    (Vec::new(), StrategyStatus::TimedOut)
                }
            };

            let report = StrategyReport {
                strategy: kind,
                status,
                candidates: candidates.len(),
                elapsed_ms,
            };
            finished.insert(kind, (candidates, report));
        }

        let mut candidates = Vec::new();
        let mut report = GenerationReport {
            strategies: Vec::with_capacity(enabled.len()),
            deadline_reached: deadline_bound
                && finished
                    .values()
                    .any(|(_, r)| r.status == StrategyStatus::TimedOut),
        };
        for kind in enabled {
            match finished.remove(&kind) {
                Some((mut produced, strategy_report)) => {
                    candidates.append(&mut produced);
                    report.strategies.push(strategy_report);
                }
                None => report.strategies.push(StrategyReport {
                    strategy: kind,
                    status: StrategyStatus::Failed {
                        error: "strategy task aborted".to_string(),
                    },
                    candidates: 0,
                    elapsed_ms: 0,
                }),
            }
        }

        debug!(
            candidates = candidates.len(),
            failures = report.failures(),
            "generation finished"
        );
        Generation { candidates, report }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GenerationError, GenerationResult};
    use crate::indicators::StaticIndicators;
    use async_trait::async_trait;
    use synth_encoder::SemanticEncoder;
    use synth_store::{InMemorySynthesisStore, InteractionStore, PlanStatsStore, ProfileStore};
    use std::collections::HashSet;
    use synth_types::{
        Certainty, InteractionId, InteractionRecord, IntentSummary, PlanOutcome, PlanType,
        ProfileUpdate, Regime, SUCCESS_PRIOR_RATE,
    };

    struct FailingIndicators;

    #[async_trait]
    impl IndicatorSource for FailingIndicators {
        async fn current(&self) -> GenerationResult<SystemIndicators> {
            Err(GenerationError::Indicators("indicator feed offline".to_string()))
        }
    }

    struct SlowIndicators;

    #[async_trait]
    impl IndicatorSource for SlowIndicators {
        async fn current(&self) -> GenerationResult<SystemIndicators> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(SystemIndicators::default())
        }
    }

    struct PanickingIndicators;

    #[async_trait]
    impl IndicatorSource for PanickingIndicators {
        async fn current(&self) -> GenerationResult<SystemIndicators> {
            panic!("indicator feed exploded")
        }
    }

    struct Fixture {
        encoder: SemanticEncoder,
        catalog: Arc<PlanCatalog>,
        store: Arc<InMemorySynthesisStore>,
    }

    impl Fixture {
        fn new() -> Self {
            let encoder = SemanticEncoder::default();
            let catalog = Arc::new(PlanCatalog::builtin(&encoder));
            Self {
                encoder,
                catalog,
                store: Arc::new(InMemorySynthesisStore::new()),
            }
        }

        fn generator(&self, indicators: Arc<dyn IndicatorSource>) -> CandidateGenerator {
            self.generator_with(GeneratorConfig::default(), indicators)
        }

        fn generator_with(
            &self,
            config: GeneratorConfig,
            indicators: Arc<dyn IndicatorSource>,
        ) -> CandidateGenerator {
            CandidateGenerator::new(
                config,
                Arc::clone(&self.catalog),
                self.store.clone(),
                indicators,
            )
        }

        fn intent(&self, certainty: Certainty) -> EncodedIntent {
            self.encoder.encode(
                &IntentSummary::new("search", "customer").with_certainty(certainty),
            )
        }

        async fn seed(&self, user: Option<&str>, intent: &EncodedIntent, plan: &str) {
            let template = self.catalog.get(&PlanType::new(plan)).unwrap();
            self.store
                .append_interaction(InteractionRecord {
                    id: InteractionId::new(),
                    user_id: user.map(UserId::new),
                    intent_vector: intent.vector,
                    candidate_vector: intent.vector,
                    plan_type: template.plan_type.clone(),
                    plan_payload: template.payload(),
                    title: template.title.clone(),
                    description: template.description.clone(),
                    regime: intent.regime,
                    success: true,
                    duration_ms: 20,
                    quality: Some(9.5),
                    recorded_at: chrono::Utc::now(),
                })
                .await
                .unwrap();
            self.store
                .apply_outcome(
                    &template.plan_type,
                    PlanOutcome {
                        success: true,
                        timed_out: false,
                        duration_ms: 20,
                        quality: Some(9.5),
                    },
                )
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn cold_generation_runs_every_strategy() {
        let fixture = Fixture::new();
        let generator = fixture.generator(Arc::new(StaticIndicators::default()));
        let intent = fixture.intent(Certainty::High);

        let generation = generator.generate(GenerationRequest::new(intent)).await;

        assert_eq!(generation.report.strategies.len(), 4);
        assert_eq!(generation.report.failures(), 0);
        let history = generation.report.get(StrategyKind::HistoryLookup).unwrap();
        assert!(history.candidates >= 2);
        let neighborhood = generation
            .report
            .get(StrategyKind::NeighborhoodExploration)
            .unwrap();
        assert!(neighborhood.candidates >= 1);
        let state = generation.report.get(StrategyKind::StateAware).unwrap();
        assert_eq!(state.candidates, 1);
        assert_eq!(generation.report.produced(), generation.candidates.len());

        for candidate in &generation.candidates {
            if candidate.strategy_origin == StrategyKind::NeighborhoodExploration {
                assert_eq!(candidate.regime, Regime::Exploration);
                assert!(candidate.confidence < 0.6);
            }
        }
    }

    #[tokio::test]
    async fn warm_cache_proposes_cache_first_plan() {
        let fixture = Fixture::new();
        let generator = fixture.generator(Arc::new(StaticIndicators::default()));
        let request = GenerationRequest::new(fixture.intent(Certainty::High))
            .with_indicators(SystemIndicators::new(0.9, 0.2));

        let generation = generator.generate(request).await;
        let state: Vec<_> = generation
            .candidates
            .iter()
            .filter(|c| c.strategy_origin == StrategyKind::StateAware)
            .collect();
        assert_eq!(state.len(), 1);
        assert_eq!(state[0].plan_type.as_str(), "lookup.cached");
        assert_eq!(state[0].regime, Regime::Stabilization);
    }

    #[tokio::test]
    async fn cold_cache_proposes_load_distributing_plan() {
        let fixture = Fixture::new();
        let generator = fixture.generator(Arc::new(StaticIndicators::new(
            SystemIndicators::new(0.1, 0.5),
        )));
        let generation = generator
            .generate(GenerationRequest::new(fixture.intent(Certainty::Medium)))
            .await;
        let state = generation
            .candidates
            .iter()
            .find(|c| c.strategy_origin == StrategyKind::StateAware)
            .unwrap();
        assert_eq!(state.plan_type.as_str(), "lookup.partitioned");
        assert_eq!(state.estimated_duration_ms, 270);
    }

    #[tokio::test]
    async fn history_reuses_similar_successes() {
        let fixture = Fixture::new();
        let intent = fixture.intent(Certainty::High);
        fixture.seed(None, &intent, "lookup.indexed").await;
        fixture.seed(None, &intent, "lookup.indexed").await;
        fixture.seed(None, &intent, "lookup.partitioned").await;

        let config = GeneratorConfig {
            history_catalog_prior: false,
            ..GeneratorConfig::default()
        };
        let generator = fixture.generator_with(config, Arc::new(StaticIndicators::default()));
        let generation = generator.generate(GenerationRequest::new(intent.clone())).await;

        let history: Vec<_> = generation
            .candidates
            .iter()
            .filter(|c| c.strategy_origin == StrategyKind::HistoryLookup)
            .collect();
        assert_eq!(history.len(), 2);
        for candidate in history {
            assert_eq!(candidate.vector, intent.vector);
            assert_eq!(candidate.regime, intent.regime);
            assert!(candidate.confidence > 0.9 && candidate.confidence <= 1.0);
        }
    }

    #[tokio::test]
    async fn cold_history_falls_back_to_closest_catalog_plans() {
        let fixture = Fixture::new();
        let intent = fixture.intent(Certainty::High);
        let config = GeneratorConfig {
            enabled: vec![StrategyKind::HistoryLookup],
            ..GeneratorConfig::default()
        };
        let generator = fixture.generator_with(config, Arc::new(StaticIndicators::default()));
        let generation = generator.generate(GenerationRequest::new(intent.clone())).await;

        assert_eq!(generation.candidates.len(), 3);
        let plans: HashSet<&str> = generation
            .candidates
            .iter()
            .map(|c| c.plan_type.as_str())
            .collect();
        assert_eq!(plans.len(), 3);
        assert!(plans.contains("lookup.indexed"));
        assert!(plans.contains("lookup.cached"));
        for candidate in &generation.candidates {
            let template = fixture.catalog.get(&candidate.plan_type).unwrap();
            assert_eq!(template.category, intent.category);
            assert_eq!(candidate.vector, template.anchor);
            assert_eq!(candidate.regime, Regime::Stabilization);
            assert!(candidate.confidence <= SUCCESS_PRIOR_RATE);
        }
        for pair in generation.candidates.windows(2) {
            assert!(
                pair[0].vector.similarity(&intent.vector) >= pair[1].vector.similarity(&intent.vector)
            );
        }
    }

    #[tokio::test]
    async fn recorded_successes_keep_precedence_over_catalog() {
        let fixture = Fixture::new();
        let intent = fixture.intent(Certainty::High);
        fixture.seed(None, &intent, "lookup.partitioned").await;

        let config = GeneratorConfig {
            enabled: vec![StrategyKind::HistoryLookup],
            ..GeneratorConfig::default()
        };
        let generator = fixture.generator_with(config, Arc::new(StaticIndicators::default()));
        let generation = generator.generate(GenerationRequest::new(intent.clone())).await;

        assert_eq!(generation.candidates.len(), 3);
        let first = &generation.candidates[0];
        assert_eq!(first.plan_type.as_str(), "lookup.partitioned");
        assert_eq!(first.vector, intent.vector);
        assert!(generation.candidates[1..]
            .iter()
            .all(|c| c.plan_type.as_str() != "lookup.partitioned"));
    }

    #[tokio::test]
    async fn neighborhood_spreads_over_distinct_buckets() {
        let fixture = Fixture::new();
        let config = GeneratorConfig {
            enabled: vec![StrategyKind::NeighborhoodExploration],
            ..GeneratorConfig::default()
        };
        let generator = fixture.generator_with(config, Arc::new(StaticIndicators::default()));
        let generation = generator
            .generate(GenerationRequest::new(fixture.intent(Certainty::High)))
            .await;

        assert_eq!(generation.candidates.len(), 8);
        let buckets: HashSet<&PlanType> =
            generation.candidates.iter().map(|c| &c.plan_type).collect();
        assert_eq!(buckets.len(), 8);
        for candidate in &generation.candidates {
            assert_eq!(candidate.regime, Regime::Exploration);
        }
    }

    #[tokio::test]
    async fn failing_strategy_is_isolated() {
        let fixture = Fixture::new();
        let generator = fixture.generator(Arc::new(FailingIndicators));
        let generation = generator
            .generate(GenerationRequest::new(fixture.intent(Certainty::High)))
            .await;

        let state = generation.report.get(StrategyKind::StateAware).unwrap();
        assert!(matches!(state.status, StrategyStatus::Failed { .. }));
        assert_eq!(generation.report.failures(), 1);
        assert!(!generation.candidates.is_empty());
    }

    #[tokio::test]
    async fn slow_strategy_times_out() {
        let fixture = Fixture::new();
        let config = GeneratorConfig {
            strategy_timeout_ms: 50,
            ..GeneratorConfig::default()
        };
        let generator = fixture.generator_with(config, Arc::new(SlowIndicators));
        let generation = generator
            .generate(GenerationRequest::new(fixture.intent(Certainty::High)))
            .await;

        let state = generation.report.get(StrategyKind::StateAware).unwrap();
        assert_eq!(state.status, StrategyStatus::TimedOut);
        assert_eq!(generation.report.timeouts(), 1);
        assert!(!generation.report.deadline_reached);
        assert!(generation
            .report
            .get(StrategyKind::NeighborhoodExploration)
            .map(|r| r.status == StrategyStatus::Completed)
            .unwrap_or(false));
    }

    #[tokio::test]
    async fn request_deadline_keeps_finished_strategies() {
        let fixture = Fixture::new();
        let generator = fixture.generator(Arc::new(SlowIndicators));
        let request = GenerationRequest::new(fixture.intent(Certainty::Hedged))
            .with_deadline(tokio::time::Instant::now() + Duration::from_millis(40));

        let started = Instant::now();
        let generation = generator.generate(request).await;
        assert!(started.elapsed() < Duration::from_millis(240));

        assert!(generation.report.deadline_reached);
        let state = generation.report.get(StrategyKind::StateAware).unwrap();
        assert_eq!(state.status, StrategyStatus::TimedOut);
        let neighborhood = generation
            .report
            .get(StrategyKind::NeighborhoodExploration)
            .unwrap();
        assert_eq!(neighborhood.status, StrategyStatus::Completed);
        assert!(neighborhood.candidates > 0);
        assert_eq!(generation.report.produced(), generation.candidates.len());
        assert!(generation
            .candidates
            .iter()
            .any(|c| c.strategy_origin == StrategyKind::NeighborhoodExploration));
    }

    #[tokio::test]
    async fn panicking_strategy_is_isolated() {
        let fixture = Fixture::new();
        let generator = fixture.generator(Arc::new(PanickingIndicators));
        let generation = generator
            .generate(GenerationRequest::new(fixture.intent(Certainty::High)))
            .await;

        let state = generation.report.get(StrategyKind::StateAware).unwrap();
        assert_eq!(state.status, StrategyStatus::Panicked);
        assert_eq!(generation.report.strategies.len(), 4);
    }

    #[tokio::test]
    async fn profile_strategy_predicts_for_known_user() {
        let fixture = Fixture::new();
        let intent = fixture.intent(Certainty::Medium);
        let user = UserId::new("dana");
        for plan in ["lookup.indexed", "report.export", "lookup.indexed"] {
            fixture.seed(Some("dana"), &intent, plan).await;
            fixture
                .store
                .apply_profile_update(
                    &user,
                    ProfileUpdate {
                        vector: intent.vector,
                        learning_rate: 0.1,
                        regime: Regime::Stabilization,
                        success: true,
                    },
                )
                .await
                .unwrap();
        }

        let config = GeneratorConfig {
            enabled: vec![StrategyKind::ProfilePredictive],
            ..GeneratorConfig::default()
        };
        let generator = fixture.generator_with(config, Arc::new(StaticIndicators::default()));
        let generation = generator
            .generate(GenerationRequest::new(intent).with_user(user))
            .await;

        assert_eq!(generation.candidates.len(), 1);
        let candidate = &generation.candidates[0];
        assert_eq!(candidate.plan_type.as_str(), "report.export");
        assert_eq!(candidate.regime, Regime::Stabilization);
        assert!(candidate.confidence > 0.0);
    }

    #[tokio::test]
    async fn profile_strategy_skips_anonymous_calls() {
        let fixture = Fixture::new();
        let config = GeneratorConfig {
            enabled: vec![StrategyKind::ProfilePredictive],
            ..GeneratorConfig::default()
        };
        let generator = fixture.generator_with(config, Arc::new(StaticIndicators::default()));
        let generation = generator
            .generate(GenerationRequest::new(fixture.intent(Certainty::High)))
            .await;
        assert!(generation.candidates.is_empty());
        assert_eq!(generation.report.failures(), 0);
    }
}
