use synth_types::{Candidate, EncodedIntent, PlanTypeStats, QualityBreakdown, UserProfile};

use crate::config::ScorerConfig;
use crate::dimensions;

/// Scores candidates against the intent they were generated for.
#[derive(Debug, Clone, Default)]
pub struct QualityScorer {
    config: ScorerConfig,
}

impl QualityScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Compute the five-dimension breakdown for `candidate`.
    ///
    /// Missing statistics are treated as a plan type with no history, and a
    /// missing profile drops the preference component of synergy.
    pub fn score(
        &self,
        candidate: &Candidate,
        intent: &EncodedIntent,
        stats: Option<&PlanTypeStats>,
        profile: Option<&UserProfile>,
    ) -> QualityBreakdown {
        let fallback;
        let stats = match stats {
            Some(stats) => stats,
            None => {
                fallback = PlanTypeStats::new(candidate.plan_type.clone());
                &fallback
            }
        };
        let payload = &candidate.plan_payload;

        let correctness = dimensions::correctness(
            candidate.vector.similarity(&intent.vector),
            stats.smoothed_success_rate(),
            intent.confidence,
            payload.step_count(),
            payload.join_count(),
        );

        let performance = dimensions::performance(
            self.expected_duration_ms(candidate, stats),
            candidate.estimated_cost,
            &self.config,
        );

        let reliability = dimensions::reliability(
            stats.error_rate(),
            stats.timeout_rate(),
            payload.external_dependencies,
            payload.edge_cases_covered,
        );

        let synergy = dimensions::synergy(
            candidate.regime,
            intent.regime,
            profile.map(|p| p.preference.similarity(&candidate.vector)),
            payload.dominant_weights(),
        );

        let elegance = dimensions::elegance(payload.complexity(), payload.optimization_count());

        QualityBreakdown::from_scores(correctness, performance, reliability, synergy, elegance)
    }

    /// Candidate estimate, blended with the observed average once the plan
    /// type has history.
    fn expected_duration_ms(&self, candidate: &Candidate, stats: &PlanTypeStats) -> f64 {
        let estimate = candidate.estimated_duration_ms as f64;
        if stats.has_history() {
            let share = self.config.observed_duration_share.clamp(0.0, 1.0);
            estimate * (1.0 - share) + stats.avg_duration_ms * share
        } else {
            estimate
        }
    }
}
