//! History-lookup: reuse plans that worked for similar intents.
//!
//! Until enough similar successes are on record, the free slots go to the
//! catalog templates of the intent's category whose anchors sit closest to
//! the intent, at the success rate their plan type has earned so far.

use std::collections::HashSet;

use synth_types::{Candidate, PlanType, StrategyKind, SUCCESS_PRIOR_RATE};
use tracing::{debug, instrument, warn};

use super::{candidate_from_record, StrategyContext};
use crate::catalog::PlanTemplate;
use crate::error::GenerationResult;
use crate::generator::GenerationRequest;

#[instrument(skip_all, fields(strategy = "history_lookup"))]
pub(crate) async fn propose(
    ctx: &StrategyContext,
    request: &GenerationRequest,
) -> GenerationResult<Vec<Candidate>> {
    let vector = request.intent.vector;
    let records = ctx
        .storage
        .recent_successes(ctx.config.history_window)
        .await?;

    let mut similar: Vec<(f64, _)> = records
        .into_iter()
        .map(|record| (record.intent_vector.similarity(&vector), record))
        .filter(|(similarity, _)| *similarity >= ctx.config.history_min_similarity)
        .collect();
    // Stable sort: among equal similarities the newer record stays first.
    similar.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut seen: HashSet<PlanType> = HashSet::new();
    let mut candidates = Vec::new();
    for (similarity, record) in similar {
        if candidates.len() >= ctx.config.history_top {
            break;
        }
        if !seen.insert(record.plan_type.clone()) {
            continue;
        }

        let success_rate = success_rate(ctx, &record.plan_type).await;
        let confidence = similarity.max(0.0) * success_rate;
        candidates.push(candidate_from_record(
            &record,
            &ctx.catalog,
            StrategyKind::HistoryLookup,
            record.intent_vector,
            request.intent.regime,
            confidence,
            format!(
                "{} succeeded for a similar intent (similarity {:.2}, success rate {:.2})",
                record.plan_type, similarity, success_rate
            ),
        ));
    }

    let recorded = candidates.len();
    if ctx.config.history_catalog_prior && recorded < ctx.config.history_top {
        let mut priors: Vec<(f64, &PlanTemplate)> = ctx
            .catalog
            .serving(request.intent.category)
            .filter(|t| !seen.contains(&t.plan_type))
            .map(|t| (t.anchor.similarity(&vector), t))
            .filter(|(similarity, _)| *similarity >= ctx.config.history_min_similarity)
            .collect();
        priors.sort_by(|a, b| b.0.total_cmp(&a.0));
        priors.truncate(ctx.config.history_top - recorded);

        for (similarity, template) in priors {
            let success_rate = success_rate(ctx, &template.plan_type).await;
            candidates.push(template.instantiate(
                StrategyKind::HistoryLookup,
                template.anchor,
                request.intent.regime,
                similarity.max(0.0) * success_rate,
                format!(
                    "{} is the closest {} plan in the catalog (similarity {:.2}, success rate {:.2})",
                    template.plan_type, template.category, similarity, success_rate
                ),
            ));
        }
    }

    debug!(
        count = candidates.len(),
        from_catalog = candidates.len() - recorded,
        "history candidates"
    );
    Ok(candidates)
}

async fn success_rate(ctx: &StrategyContext, plan_type: &PlanType) -> f64 {
    match ctx.storage.get_plan_stats(plan_type).await {
        Ok(Some(stats)) => stats.smoothed_success_rate(),
        Ok(None) => SUCCESS_PRIOR_RATE,
        Err(e) => {
            warn!(plan_type = %plan_type, error = %e, "plan stats unavailable, using prior");
            SUCCESS_PRIOR_RATE
        }
    }
}
