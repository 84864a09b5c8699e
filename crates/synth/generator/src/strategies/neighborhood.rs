//! Neighborhood-exploration: sample plan buckets around the intent.
//!
//! Eight variants of the input vector are built: four single-axis stretches,
//! two spherical steps toward a fixed reference point and two small seeded
//! jitters. The jitter RNG is seeded from the vector itself, so the same
//! intent always explores the same neighborhood. A variant whose nearest
//! bucket is already taken falls through to its next-nearest free one.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use synth_types::{Candidate, PlanType, Regime, SemanticVector, StrategyKind};
use tracing::{debug, instrument};

use super::StrategyContext;
use crate::config::GeneratorConfig;
use crate::error::GenerationResult;
use crate::generator::GenerationRequest;

const REFERENCE: [f64; 4] = [0.8, 0.2, 0.2, 0.5];
const SLERP_STEPS: [f64; 2] = [0.2, 0.4];
const JITTER_VARIANTS: usize = 2;

#[instrument(skip_all, fields(strategy = "neighborhood_exploration"))]
pub(crate) async fn propose(
    ctx: &StrategyContext,
    request: &GenerationRequest,
) -> GenerationResult<Vec<Candidate>> {
    let mut buckets: HashSet<PlanType> = HashSet::new();
    let mut candidates = Vec::new();

    for (label, variant) in variants(&request.intent.vector, &ctx.config) {
        let Some(template) = ctx
            .catalog
            .ranked(&variant)
            .into_iter()
            .find(|t| !buckets.contains(&t.plan_type))
        else {
            break;
        };
        buckets.insert(template.plan_type.clone());
        candidates.push(template.instantiate(
            StrategyKind::NeighborhoodExploration,
            variant,
            Regime::Exploration,
            ctx.config.neighborhood_confidence,
            format!("{label} of the intent lands in {}", template.plan_type),
        ));
    }

    debug!(count = candidates.len(), "neighborhood candidates");
    Ok(candidates)
}

/// Labelled unit-length variants of `vector`.
pub(crate) fn variants(
    vector: &SemanticVector,
    config: &GeneratorConfig,
) -> Vec<(String, SemanticVector)> {
    let mut out = Vec::with_capacity(4 + SLERP_STEPS.len() + JITTER_VARIANTS);

    for axis in 0..4 {
        out.push((
            format!("axis {axis} stretch"),
            vector.scaled_component(axis, config.neighborhood_stretch),
        ));
    }

    let reference = SemanticVector::normalized_or(REFERENCE, SemanticVector::NEUTRAL);
    for t in SLERP_STEPS {
        out.push((format!("step {t} toward reference"), vector.slerp(&reference, t)));
    }

    let amplitude = config.neighborhood_jitter.abs();
    let mut rng = StdRng::seed_from_u64(vector.fingerprint());
    for i in 0..JITTER_VARIANTS {
        let delta: [f64; 4] = std::array::from_fn(|_| rng.gen_range(-amplitude..=amplitude));
        out.push((format!("jitter {i}"), vector.offset(delta)));
    }

    out
}
