//! The four generation strategies.
//!
//! The set is closed: [`StrategyKind`] names every strategy and [`run`]
//! dispatches on it. Strategies only read shared state and return owned
//! candidates.

use std::sync::Arc;

use synth_store::SynthesisStorage;
use synth_types::{Candidate, CandidateId, InteractionRecord, Regime, SemanticVector, StrategyKind};

use crate::catalog::PlanCatalog;
use crate::config::GeneratorConfig;
use crate::error::GenerationResult;
use crate::generator::GenerationRequest;
use crate::indicators::IndicatorSource;

pub(crate) mod history;
pub(crate) mod neighborhood;
pub(crate) mod profile;
pub(crate) mod state;

/// Cost assumed for a recorded plan type the catalog does not know.
const UNKNOWN_PLAN_COST: f64 = 2.0;

/// Shared, read-only inputs every strategy may consult.
pub(crate) struct StrategyContext {
    pub config: GeneratorConfig,
    pub catalog: Arc<PlanCatalog>,
    pub storage: Arc<dyn SynthesisStorage>,
    pub indicators: Arc<dyn IndicatorSource>,
}

pub(crate) async fn run(
    kind: StrategyKind,
    ctx: &StrategyContext,
    request: &GenerationRequest,
) -> GenerationResult<Vec<Candidate>> {
    match kind {
        StrategyKind::HistoryLookup => history::propose(ctx, request).await,
        StrategyKind::NeighborhoodExploration => neighborhood::propose(ctx, request).await,
        StrategyKind::StateAware => state::propose(ctx, request).await,
        StrategyKind::ProfilePredictive => profile::propose(ctx, request).await,
    }
}

/// Re-instantiate a recorded plan. Known plan types take their estimates
/// from the catalog; the recorded payload is kept either way.
pub(crate) fn candidate_from_record(
    record: &InteractionRecord,
    catalog: &PlanCatalog,
    strategy: StrategyKind,
    vector: SemanticVector,
    regime: Regime,
    confidence: f64,
    reasoning: String,
) -> Candidate {
    match catalog.get(&record.plan_type) {
        Some(template) => {
            let mut candidate = template.instantiate(strategy, vector, regime, confidence, reasoning);
            if !record.plan_payload.steps.is_empty() {
                candidate.plan_payload = record.plan_payload.clone();
            }
            candidate
        }
        None => Candidate {
            id: CandidateId::new(),
            strategy_origin: strategy,
            plan_type: record.plan_type.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            confidence: confidence.clamp(0.0, 1.0),
            regime,
            estimated_duration_ms: record.duration_ms.max(1),
            estimated_cost: UNKNOWN_PLAN_COST,
            plan_payload: record.plan_payload.clone(),
            reasoning,
            vector,
            quality: None,
        },
    }
}
