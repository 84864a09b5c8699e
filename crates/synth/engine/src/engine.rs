use std::sync::Arc;
use std::time::{Duration, Instant};

use synth_encoder::SemanticEncoder;
use synth_feedback::{FeedbackReceipt, FeedbackRecorder, FlushReport};
use synth_generator::{
    CandidateGenerator, GenerationReport, GenerationRequest, IndicatorSource, PlanCatalog,
};
use synth_scorer::QualityScorer;
use synth_selector::{dedupe_by_plan_type, CandidateSelector};
use synth_store::{QueryWindow, SynthesisStorage};
use synth_types::{
    Candidate, EncodedIntent, IntentSummary, PlanTypeStats, Regime, UserId, UserProfile,
};
use tokio::task::JoinSet;
use tokio::time::timeout_at;
use tracing::{debug, info, instrument, warn};

use crate::cache::{CachedCandidate, CandidateCache};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::synthesis::{
    ChoiceReport, PoolSummary, SynthesisOutcome, SynthesisRequest, SynthesisResponse,
};
use crate::telemetry::{CallFigures, EngineTelemetry, MetricsSnapshot};

const DEGENERATE_SUGGESTION: &str =
    "the intent names neither an action nor an entity; refine the request";
const NO_MATCH_SUGGESTION: &str =
    "no plan matched this intent; add an action, entity or attributes";
const BELOW_THRESHOLD_SUGGESTION: &str =
    "candidates were found but none met the quality bar; retry with threshold_relaxation";

/// The synthesis pipeline: encode, generate, score, gate, and learn.
pub struct SynthesisEngine {
    config: EngineConfig,
    encoder: SemanticEncoder,
    generator: CandidateGenerator,
    scorer: Arc<QualityScorer>,
    selector: CandidateSelector,
    feedback: FeedbackRecorder,
    storage: Arc<dyn SynthesisStorage>,
    cache: CandidateCache,
    telemetry: EngineTelemetry,
}

impl SynthesisEngine {
    /// Build an engine over `storage`, reading live indicators from
    /// `indicators` when a request carries none.
    pub fn new(
        config: EngineConfig,
        storage: Arc<dyn SynthesisStorage>,
        indicators: Arc<dyn IndicatorSource>,
    ) -> EngineResult<Self> {
        config.validate()?;

        let encoder = SemanticEncoder::new(config.encoder.clone());
        let catalog = Arc::new(PlanCatalog::builtin(&encoder));
        let generator = CandidateGenerator::new(
            config.generator.clone(),
            catalog,
            Arc::clone(&storage),
            indicators,
        );
        let scorer = Arc::new(QualityScorer::new(config.scorer.clone()));
        let selector = CandidateSelector::new(config.selector.clone());
        let feedback = FeedbackRecorder::new(config.feedback.clone(), Arc::clone(&storage));
        let cache = CandidateCache::new(config.candidate_cache_capacity);

        info!(
            plan_types = generator.catalog().len(),
            strategies = config.generator.enabled.len(),
            "synthesis engine ready"
        );

        Ok(Self {
            config,
            encoder,
            generator,
            scorer,
            selector,
            feedback,
            storage,
            cache,
            telemetry: EngineTelemetry::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PlanCatalog {
        self.generator.catalog()
    }

    /// Encode a summary without synthesizing anything.
    pub fn encode(&self, summary: &IntentSummary) -> EncodedIntent {
        self.encoder.encode(summary)
    }

    /// Run the full pipeline for one intent.
    ///
    /// Never fails: missing coverage, failed gates and deadline overruns are
    /// all reported through the response.
    #[instrument(skip(self, request), fields(user = ?request.user_id))]
    pub async fn synthesize(&self, request: SynthesisRequest) -> SynthesisResponse {
        let started = Instant::now();
        let call_started = tokio::time::Instant::now();
        let deadline = call_started + self.config.call_timeout();
        let intent = self.encoder.encode(&request.summary);
        let relaxation = self.selector.clamp_relaxation(request.threshold_relaxation);

        if intent.degenerate {
            debug!("degenerate intent, skipping generation");
            return self.finish(
                &intent,
                relaxation,
                Pass::empty(SynthesisOutcome::NoMatch, DEGENERATE_SUGGESTION),
                started,
            );
        }

        let mut generation_request = GenerationRequest::new(intent.clone())
            .with_deadline(call_started + self.config.generation_timeout());
        if let Some(user_id) = &request.user_id {
            generation_request = generation_request.with_user(user_id.clone());
        }
        if let Some(indicators) = request.indicators {
            generation_request = generation_request.with_indicators(indicators);
        }

        let generation = self.generator.generate(generation_request).await;
        let mut timed_out = generation.report.deadline_reached;
        if timed_out {
            warn!(
                kept = generation.candidates.len(),
                "call deadline cut generation short"
            );
        }

        let generated = generation.candidates.len();
        if generated == 0 {
            let mut pass = Pass::empty(SynthesisOutcome::NoMatch, NO_MATCH_SUGGESTION);
            pass.report = generation.report;
            pass.timed_out = timed_out;
            return self.finish(&intent, relaxation, pass, started);
        }

        let profile = match timeout_at(deadline, self.read_profile(request.user_id.as_ref())).await
        {
            Ok(profile) => profile,
            Err(_) => {
                warn!("call deadline reached reading the profile, scoring without it");
                timed_out = true;
                None
            }
        };
        let (scored, scoring_timed_out) = self
            .score_all(generation.candidates, &intent, profile, deadline)
            .await;
        timed_out |= scoring_timed_out;

        let scored_count = scored.len();
        let distinct = dedupe_by_plan_type(scored);
        let distinct_count = distinct.len();
        let selection = self.selector.select(distinct, intent.regime, relaxation);

        let outcome = if !selection.selected.is_empty() {
            SynthesisOutcome::Ranked
        } else if scored_count == 0 {
            SynthesisOutcome::NoMatch
        } else {
            SynthesisOutcome::BelowThreshold
        };
        let suggestion = match outcome {
            SynthesisOutcome::Ranked => None,
            SynthesisOutcome::NoMatch => Some(NO_MATCH_SUGGESTION),
            SynthesisOutcome::BelowThreshold => Some(BELOW_THRESHOLD_SUGGESTION),
        };

        for candidate in &selection.selected {
            self.cache.insert(CachedCandidate {
                candidate: candidate.clone(),
                intent: intent.clone(),
                user_id: request.user_id.clone(),
            });
        }

        let pass = Pass {
            outcome,
            candidates: selection.selected,
            suggestion,
            timed_out,
            pool: PoolSummary {
                generated,
                scored: scored_count,
                distinct: distinct_count,
                gated_out: selection.gated_out.len(),
                trimmed: selection.trimmed,
            },
            report: generation.report,
        };
        self.finish(&intent, relaxation, pass, started)
    }

    /// Record which surfaced candidate was executed and how it went.
    #[instrument(skip(self, report), fields(candidate = %report.candidate_id, success = report.success))]
    pub async fn record_choice(&self, report: ChoiceReport) -> EngineResult<FeedbackReceipt> {
        let cached = self
            .cache
            .get(&report.candidate_id)
            .ok_or_else(|| EngineError::UnknownCandidate(report.candidate_id.clone()))?;

        let intent = match &report.intent {
            Some(summary) => self.encoder.encode(summary),
            None => cached.intent,
        };
        let user_id = report.user_id.or(cached.user_id);

        let receipt = self
            .feedback
            .record(
                &cached.candidate,
                report.success,
                Duration::from_millis(report.duration_ms),
                user_id,
                &intent,
            )
            .await?;
        self.telemetry.record_feedback(receipt.status);
        Ok(receipt)
    }

    /// Plan-type statistics, most executed first.
    pub async fn plan_stats(&self, window: QueryWindow) -> EngineResult<Vec<PlanTypeStats>> {
        Ok(self.storage.list_plan_stats(window).await?)
    }

    pub async fn profile(&self, user_id: &UserId) -> EngineResult<Option<UserProfile>> {
        Ok(self.storage.get_profile(user_id).await?)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.telemetry.snapshot()
    }

    /// Replay feedback that could not be written earlier.
    pub async fn flush_feedback(&self) -> FlushReport {
        let report = self.feedback.flush_pending().await;
        self.telemetry.record_flushed(report.recorded);
        report
    }

    pub async fn pending_feedback(&self) -> usize {
        self.feedback.pending_len().await
    }

    async fn read_profile(&self, user_id: Option<&UserId>) -> Option<UserProfile> {
        let user_id = user_id?;
        match self.storage.get_profile(user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(user = %user_id, error = %e, "profile unavailable, scoring without it");
                None
            }
        }
    }

    /// Score every candidate on its own task. Candidates still unscored at
    /// the deadline are dropped.
    async fn score_all(
        &self,
        candidates: Vec<Candidate>,
        intent: &EncodedIntent,
        profile: Option<UserProfile>,
        deadline: tokio::time::Instant,
    ) -> (Vec<Candidate>, bool) {
        let intent = Arc::new(intent.clone());
        let profile = Arc::new(profile);
        let expected = candidates.len();

        let mut set = JoinSet::new();
        for candidate in candidates {
            let scorer = Arc::clone(&self.scorer);
            let storage = Arc::clone(&self.storage);
            let intent = Arc::clone(&intent);
            let profile = Arc::clone(&profile);
            set.spawn(async move {
                let stats = match storage.get_plan_stats(&candidate.plan_type).await {
                    Ok(stats) => stats,
                    Err(e) => {
                        warn!(
                            plan_type = %candidate.plan_type,
                            error = %e,
                            "plan stats unavailable, scoring with neutral stats"
                        );
                        None
                    }
                };
                let quality =
                    scorer.score(&candidate, &intent, stats.as_ref(), (*profile).as_ref());
                candidate.with_quality(quality)
            });
        }

        let mut scored = Vec::with_capacity(expected);
        let mut timed_out = false;
        loop {
            match timeout_at(deadline, set.join_next()).await {
                Ok(Some(Ok(candidate))) => scored.push(candidate),
                Ok(Some(Err(e))) => warn!(error = %e, "scoring task failed"),
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        scored = scored.len(),
                        expected,
                        "call deadline reached during scoring"
                    );
                    set.abort_all();
                    timed_out = true;
                    break;
                }
            }
        }
        (scored, timed_out)
    }

    fn finish(
        &self,
        intent: &EncodedIntent,
        relaxation: f64,
        pass: Pass,
        started: Instant,
    ) -> SynthesisResponse {
        let regime = if pass.outcome == SynthesisOutcome::NoMatch {
            Regime::Exploration
        } else {
            intent.regime
        };

        self.telemetry.record_call(CallFigures {
            regime,
            outcome: pass.outcome,
            timed_out: pass.timed_out,
            strategy_failures: pass.report.failures(),
            strategy_timeouts: pass.report.timeouts(),
            generated: pass.pool.generated,
            gated_out: pass.pool.gated_out,
            surfaced: pass.candidates.len(),
        });

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            outcome = ?pass.outcome,
            regime = %regime,
            surfaced = pass.candidates.len(),
            generated = pass.pool.generated,
            elapsed_ms,
            "synthesis finished"
        );

        SynthesisResponse {
            outcome: pass.outcome,
            candidates: pass.candidates,
            regime,
            confidence: intent.confidence,
            threshold: self
                .selector
                .effective_threshold(regime, regime, relaxation),
            suggestion: pass.suggestion.map(str::to_string),
            timed_out: pass.timed_out,
            elapsed_ms,
            pool: pass.pool,
            report: pass.report,
        }
    }
}

/// What one synthesize call produced before it is turned into a response.
struct Pass {
    outcome: SynthesisOutcome,
    candidates: Vec<Candidate>,
    suggestion: Option<&'static str>,
    timed_out: bool,
    pool: PoolSummary,
    report: GenerationReport,
}

impl Pass {
    fn empty(outcome: SynthesisOutcome, suggestion: &'static str) -> Self {
        Self {
            outcome,
            candidates: Vec::new(),
            suggestion: Some(suggestion),
            timed_out: false,
            pool: PoolSummary::default(),
            report: GenerationReport::default(),
        }
    }
}
