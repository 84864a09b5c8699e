//! State-aware: pick a cheap plan when caches are warm, a load-spreading one
//! otherwise.

use synth_types::{Candidate, StrategyKind, SystemIndicators};
use tracing::{debug, instrument};

use super::StrategyContext;
use crate::catalog::PlanProfile;
use crate::error::GenerationResult;
use crate::generator::GenerationRequest;

#[instrument(skip_all, fields(strategy = "state_aware"))]
pub(crate) async fn propose(
    ctx: &StrategyContext,
    request: &GenerationRequest,
) -> GenerationResult<Vec<Candidate>> {
    let indicators = match request.indicators {
        Some(indicators) => indicators.clamped(),
        None => ctx.indicators.current().await?.clamped(),
    };

    let (wanted, signal) = if indicators.cache_hit_rate >= ctx.config.cache_hit_threshold {
        (PlanProfile::CacheFirst, indicators.cache_hit_rate)
    } else {
        (PlanProfile::LoadDistributing, 1.0 - indicators.load)
    };

    let intent = &request.intent;
    let Some(template) = ctx.catalog.for_profile(intent.category, wanted) else {
        return Ok(Vec::new());
    };

    let confidence = (0.6 + 0.35 * signal) * (0.5 + 0.5 * intent.confidence);
    let mut candidate = template.instantiate(
        StrategyKind::StateAware,
        intent.vector,
        intent.regime,
        confidence,
        format!(
            "cache hit rate {:.2} and load {:.2} favor {:?} plans",
            indicators.cache_hit_rate, indicators.load, wanted
        ),
    );
    candidate.estimated_duration_ms =
        adjusted_duration(template.base_duration_ms, template.profile, &indicators);

    debug!(plan_type = %candidate.plan_type, confidence, "state-aware candidate");
    Ok(vec![candidate])
}

/// Cache-first plans slow down as the hit rate falls; load-distributing
/// plans slow down as load rises.
fn adjusted_duration(base_ms: u64, profile: PlanProfile, indicators: &SystemIndicators) -> u64 {
    let factor = match profile {
        PlanProfile::CacheFirst => 2.0 - indicators.cache_hit_rate,
        PlanProfile::LoadDistributing => 1.0 + indicators.load,
        PlanProfile::Standard => 1.0,
    };
    (base_ms as f64 * factor).round().max(1.0) as u64
}
