use std::cmp::Ordering;
use std::collections::HashMap;

use synth_types::{Candidate, PlanType, Regime};
use tracing::debug;

use crate::config::SelectorConfig;

/// How many of `n` ranked candidates to keep:
/// `clamp(round(√n · log2(max(n, 2))), min, max)`, never more than `n`.
pub fn cardinality(n: usize, min_results: usize, max_results: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let n_f = n as f64;
    let raw = (n_f.sqrt() * n_f.max(2.0).log2()).round() as usize;
    raw.clamp(min_results, max_results.max(min_results)).min(n)
}

/// Order by unified quality, then strategy confidence, then id.
pub fn rank(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(compare);
    candidates
}

fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    b.unified()
        .total_cmp(&a.unified())
        .then_with(|| b.confidence.total_cmp(&a.confidence))
        .then_with(|| a.id.0.cmp(&b.id.0))
}

/// Keep the best-scoring candidate per plan type, preserving first-seen
/// order of plan types.
pub fn dedupe_by_plan_type(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut slots: HashMap<PlanType, usize> = HashMap::new();
    let mut kept: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match slots.get(&candidate.plan_type) {
            Some(&slot) => {
                if compare(&candidate, &kept[slot]) == Ordering::Less {
                    kept[slot] = candidate;
                }
            }
            None => {
                slots.insert(candidate.plan_type.clone(), kept.len());
                kept.push(candidate);
            }
        }
    }
    kept
}

/// Result of gating, ranking and sizing one pool.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Surfaced candidates, best first.
    pub selected: Vec<Candidate>,
    /// Candidates below their effective threshold.
    pub gated_out: Vec<Candidate>,
    /// Gate survivors dropped by sizing.
    pub trimmed: usize,
}

/// Gates candidates against regime thresholds and sizes the result.
#[derive(Debug, Clone, Default)]
pub struct CandidateSelector {
    config: SelectorConfig,
}

impl CandidateSelector {
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Threshold a candidate must meet: the stricter of its own regime's and
    /// the intent's, lowered by `relaxation` (capped at `max_relaxation`).
    pub fn effective_threshold(
        &self,
        candidate_regime: Regime,
        intent_regime: Regime,
        relaxation: f64,
    ) -> f64 {
        let thresholds = &self.config.thresholds;
        let bar = thresholds
            .for_regime(candidate_regime)
            .max(thresholds.for_regime(intent_regime));
        bar - self.clamp_relaxation(relaxation)
    }

    pub fn clamp_relaxation(&self, relaxation: f64) -> f64 {
        if relaxation.is_finite() {
            relaxation.clamp(0.0, self.config.max_relaxation)
        } else {
            0.0
        }
    }

    /// Split candidates into those meeting their effective threshold and
    /// those that do not. Unscored candidates never pass.
    pub fn gate(
        &self,
        candidates: Vec<Candidate>,
        intent_regime: Regime,
        relaxation: f64,
    ) -> (Vec<Candidate>, Vec<Candidate>) {
        let mut passed = Vec::with_capacity(candidates.len());
        let mut rejected = Vec::new();
        for candidate in candidates {
            let threshold = self.effective_threshold(candidate.regime, intent_regime, relaxation);
            if candidate.quality.is_some() && candidate.unified() >= threshold {
                passed.push(candidate);
            } else {
                debug!(
                    plan_type = %candidate.plan_type,
                    unified = candidate.unified(),
                    threshold,
                    "candidate gated out"
                );
                rejected.push(candidate);
            }
        }
        (passed, rejected)
    }

    pub fn cardinality(&self, n: usize) -> usize {
        cardinality(n, self.config.min_results, self.config.max_results)
    }

    /// Gate, rank and truncate to [`cardinality`] of the survivors.
    pub fn select(
        &self,
        candidates: Vec<Candidate>,
        intent_regime: Regime,
        relaxation: f64,
    ) -> Selection {
        let (passed, gated_out) = self.gate(candidates, intent_regime, relaxation);
        let mut ranked = rank(passed);
        let keep = self.cardinality(ranked.len());
        let trimmed = ranked.len() - keep;
        ranked.truncate(keep);
        Selection {
            selected: ranked,
            gated_out,
            trimmed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use synth_types::{
        CandidateId, PlanPayload, QualityBreakdown, SemanticVector, StrategyKind,
    };

    fn candidate(plan: &str, regime: Regime, scores: [f64; 5]) -> Candidate {
        let plan_type = PlanType::new(plan);
        Candidate {
            id: CandidateId::new(),
            strategy_origin: StrategyKind::StateAware,
            plan_type: plan_type.clone(),
            title: plan.to_string(),
            description: String::new(),
            confidence: 0.7,
            regime,
            estimated_duration_ms: 10,
            estimated_cost: 1.0,
            plan_payload: PlanPayload {
                plan_type,
                steps: Vec::new(),
                external_dependencies: 0,
                edge_cases_covered: 0,
                optimizations: Vec::new(),
            },
            reasoning: String::new(),
            vector: SemanticVector::NEUTRAL,
            quality: Some(QualityBreakdown::from_scores(
                scores[0], scores[1], scores[2], scores[3], scores[4],
            )),
        }
    }

    fn flat(plan: &str, regime: Regime, score: f64) -> Candidate {
        candidate(plan, regime, [score; 5])
    }

    #[test]
    fn test_cardinality_table() {
        assert_eq!(cardinality(0, 2, 4), 0);
        assert_eq!(cardinality(1, 2, 4), 1);
        assert_eq!(cardinality(2, 2, 4), 2);
        assert_eq!(cardinality(3, 2, 4), 3);
        assert_eq!(cardinality(4, 2, 4), 4);
        assert_eq!(cardinality(50, 2, 4), 4);
    }

    #[test]
    fn test_weakest_dimension_decides_rank() {
        let spiky = candidate("spiky", Regime::Exploration, [9.0, 9.0, 9.0, 9.0, 3.0]);
        let even = candidate("even", Regime::Exploration, [7.5; 5]);
        let ranked = rank(vec![spiky, even]);
        assert_eq!(ranked[0].plan_type.as_str(), "even");
        assert!(ranked[1].unified() < 7.0);
    }

    #[test]
    fn test_gate_uses_stricter_regime() {
        let selector = CandidateSelector::default();
        let pool = vec![
            flat("explore", Regime::Exploration, 8.0),
            flat("stable", Regime::Stabilization, 9.2),
            flat("tuned", Regime::Optimization, 8.7),
        ];

        let (passed, rejected) = selector.gate(pool.clone(), Regime::Stabilization, 0.0);
        assert_eq!(passed.len(), 1);
        assert_eq!(passed[0].plan_type.as_str(), "stable");
        assert_eq!(rejected.len(), 2);

        let (passed, _) = selector.gate(pool, Regime::Exploration, 0.0);
        assert_eq!(passed.len(), 3);
    }

    #[test]
    fn test_relaxation_is_capped() {
        let selector = CandidateSelector::default();
        assert_eq!(
            selector.effective_threshold(Regime::Stabilization, Regime::Exploration, 1.0),
            8.0
        );
        assert_eq!(
            selector.effective_threshold(Regime::Stabilization, Regime::Stabilization, 50.0),
            7.0
        );
        assert_eq!(
            selector.effective_threshold(Regime::Exploration, Regime::Exploration, -3.0),
            7.0
        );
    }

    #[test]
    fn test_unscored_candidates_never_pass() {
        let mut unscored = flat("raw", Regime::Exploration, 10.0);
        unscored.quality = None;
        let (passed, rejected) =
            CandidateSelector::default().gate(vec![unscored], Regime::Exploration, 2.0);
        assert!(passed.is_empty());
        assert_eq!(rejected.len(), 1);
    }

    #[test]
    fn test_dedupe_keeps_best_per_plan_type() {
        let pool = vec![
            flat("a", Regime::Exploration, 7.5),
            flat("b", Regime::Exploration, 8.0),
            flat("a", Regime::Exploration, 9.0),
        ];
        let kept = dedupe_by_plan_type(pool);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].plan_type.as_str(), "a");
        assert!((kept[0].unified() - 9.0).abs() < 1e-9);
        assert_eq!(kept[1].plan_type.as_str(), "b");
    }

    #[test]
    fn test_select_sizes_and_orders() {
        let selector = CandidateSelector::default();
        let pool: Vec<Candidate> = (0..6)
            .map(|i| flat(&format!("p{i}"), Regime::Exploration, 7.2 + 0.4 * i as f64))
            .collect();
        let selection = selector.select(pool, Regime::Exploration, 0.0);
        assert_eq!(selection.selected.len(), 4);
        assert_eq!(selection.trimmed, 2);
        assert!(selection.gated_out.is_empty());
        assert_eq!(selection.selected[0].plan_type.as_str(), "p5");
        for pair in selection.selected.windows(2) {
            assert!(pair[0].unified() >= pair[1].unified());
        }
    }

    fn regime_strategy() -> impl Strategy<Value = Regime> {
        prop_oneof![
            Just(Regime::Exploration),
            Just(Regime::Optimization),
            Just(Regime::Stabilization),
        ]
    }

    proptest! {
        #[test]
        fn property_selection_respects_window(scores in proptest::collection::vec(6.0f64..10.0, 2..24)) {
            let selector = CandidateSelector::default();
            let n = scores.len();
            prop_assert!(selector.cardinality(n) >= 2 && selector.cardinality(n) <= 4);
            prop_assert!(selector.cardinality(n) <= n);

            let pool: Vec<Candidate> = scores
                .iter()
                .enumerate()
                .map(|(i, s)| flat(&format!("p{i}"), Regime::Exploration, *s))
                .collect();
            let selection = selector.select(pool, Regime::Exploration, 0.0);
            prop_assert!(selection.selected.len() <= 4);
        }

        #[test]
        fn property_nothing_below_threshold_survives(
            entries in proptest::collection::vec((regime_strategy(), 0.0f64..10.0), 0..16),
            intent_regime in regime_strategy(),
        ) {
            let selector = CandidateSelector::default();
            let pool: Vec<Candidate> = entries
                .iter()
                .enumerate()
                .map(|(i, (regime, score))| flat(&format!("p{i}"), *regime, *score))
                .collect();
            let selection = selector.select(pool, intent_regime, 0.0);
            for candidate in &selection.selected {
                let own = selector.config().thresholds.for_regime(candidate.regime);
                prop_assert!(candidate.unified() >= own);
                prop_assert!(candidate.unified() >= selector.config().thresholds.for_regime(intent_regime));
            }
        }
    }
}
