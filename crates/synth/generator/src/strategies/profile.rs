//! Profile-predictive: propose the plan a user is likely to want next.

use std::collections::BTreeMap;

use synth_types::{Candidate, InteractionRecord, PlanType, StrategyKind};
use tracing::{debug, instrument};

use super::{candidate_from_record, StrategyContext};
use crate::error::GenerationResult;
use crate::generator::GenerationRequest;

/// A predicted plan type and the share of evidence behind it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Prediction {
    pub plan_type: PlanType,
    pub strength: f64,
}

#[instrument(skip_all, fields(strategy = "profile_predictive"))]
pub(crate) async fn propose(
    ctx: &StrategyContext,
    request: &GenerationRequest,
) -> GenerationResult<Vec<Candidate>> {
    let Some(user_id) = &request.user_id else {
        return Ok(Vec::new());
    };
    let Some(profile) = ctx.storage.get_profile(user_id).await? else {
        return Ok(Vec::new());
    };

    let intent = &request.intent;
    let recent = ctx
        .storage
        .recent_for_user(user_id, ctx.config.profile_window)
        .await?;

    let affinity = profile.preference.similarity(&intent.vector).max(0.0);
    let regime = profile.regime_lean().unwrap_or(intent.regime);
    let vector = intent.vector.slerp(&profile.preference, 0.5);

    let prediction = predict_next(&recent);
    let candidate = match prediction
        .as_ref()
        .and_then(|p| recent.iter().find(|r| r.plan_type == p.plan_type).map(|r| (p, r)))
    {
        Some((prediction, record)) => candidate_from_record(
            record,
            &ctx.catalog,
            StrategyKind::ProfilePredictive,
            vector,
            regime,
            affinity * (0.5 + 0.5 * prediction.strength),
            format!(
                "{} usually follows this user's recent activity (pattern strength {:.2})",
                prediction.plan_type, prediction.strength
            ),
        ),
        None => {
            let Some(template) = ctx.catalog.nearest(&profile.preference) else {
                return Ok(Vec::new());
            };
            template.instantiate(
                StrategyKind::ProfilePredictive,
                vector,
                regime,
                affinity * 0.5,
                format!("{} sits closest to this user's preferences", template.plan_type),
            )
        }
    };

    debug!(
        user = %user_id,
        plan_type = %candidate.plan_type,
        affinity,
        "profile candidate"
    );
    Ok(vec![candidate])
}

/// Predict the next plan type from interactions given newest first.
///
/// Counts bigram transitions out of the latest plan type; without any, falls
/// back to the most frequent plan type. Ties resolve to the smallest plan
/// type name.
pub(crate) fn predict_next(recent_newest_first: &[InteractionRecord]) -> Option<Prediction> {
    let chronological: Vec<&PlanType> = recent_newest_first
        .iter()
        .rev()
        .map(|record| &record.plan_type)
        .collect();
    let latest = *chronological.last()?;

    let mut transitions: BTreeMap<&PlanType, u32> = BTreeMap::new();
    let mut from_latest = 0u32;
    for pair in chronological.windows(2) {
        if pair[0] == latest {
            *transitions.entry(pair[1]).or_default() += 1;
            from_latest += 1;
        }
    }
    if let Some((plan_type, count)) = most_common(&transitions) {
        return Some(Prediction {
            plan_type: plan_type.clone(),
            strength: f64::from(count) / f64::from(from_latest),
        });
    }

    let mut frequency: BTreeMap<&PlanType, u32> = BTreeMap::new();
    for plan_type in &chronological {
        *frequency.entry(*plan_type).or_default() += 1;
    }
    let (plan_type, count) = most_common(&frequency)?;
    Some(Prediction {
        plan_type: plan_type.clone(),
        strength: f64::from(count) / chronological.len() as f64,
    })
}

fn most_common<'a>(counts: &BTreeMap<&'a PlanType, u32>) -> Option<(&'a PlanType, u32)> {
    let mut best: Option<(&'a PlanType, u32)> = None;
    for (plan_type, count) in counts {
        match best {
            Some((_, top)) if top >= *count => {}
            _ => best = Some((*plan_type, *count)),
        }
    }
    best
}
