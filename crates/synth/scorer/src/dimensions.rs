//! Per-dimension score functions.
//!
//! Each function is pure and takes its inputs explicitly. Every dimension is
//! itself a weighted harmonic mean of its components, so a weak component is
//! already penalized before the five dimensions are unified.

use synth_types::{weighted_harmonic_mean, Regime, MAX_SCORE};

use crate::config::ScorerConfig;

/// Golden ratio, the target proportion between the two heaviest plan steps.
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Semantic fit, track record, input clarity and structural simplicity.
pub fn correctness(
    similarity: f64,
    success_rate: f64,
    encoder_confidence: f64,
    steps: usize,
    joins: usize,
) -> f64 {
    let complexity =
        MAX_SCORE / (1.0 + 0.05 * steps.saturating_sub(2) as f64 + 0.15 * joins as f64);
    weighted_harmonic_mean(&[
        (0.40, MAX_SCORE * similarity.max(0.0)),
        (0.25, MAX_SCORE * success_rate.clamp(0.0, 1.0)),
        (0.20, MAX_SCORE * encoder_confidence.clamp(0.0, 1.0)),
        (0.15, complexity),
    ])
}

/// Expected latency and resource cost.
pub fn performance(duration_ms: f64, cost: f64, config: &ScorerConfig) -> f64 {
    weighted_harmonic_mean(&[
        (0.70, time_score(duration_ms, config)),
        (0.30, cost_score(cost, config)),
    ])
}

/// Log-saturating latency score: `fast_ms` or quicker scores 10, `slow_ms`
/// or slower scores 0.
pub fn time_score(duration_ms: f64, config: &ScorerConfig) -> f64 {
    let fast = config.fast_ms.max(1.0);
    let slow = config.slow_ms.max(fast * 2.0);
    let duration = if duration_ms.is_finite() {
        duration_ms.max(fast)
    } else {
        slow
    };
    let fraction = 1.0 - (duration / fast).ln() / (slow / fast).ln();
    MAX_SCORE * fraction.clamp(0.0, 1.0)
}

/// Halves at `cost_half_point`, approaches 0 for very expensive plans.
pub fn cost_score(cost: f64, config: &ScorerConfig) -> f64 {
    let cost = if cost.is_finite() { cost.max(0.0) } else { f64::MAX };
    MAX_SCORE / (1.0 + cost / config.cost_half_point.max(f64::EPSILON))
}

/// Track record of the plan type and its exposure to things going wrong.
pub fn reliability(
    error_rate: f64,
    timeout_rate: f64,
    external_dependencies: u32,
    edge_cases_covered: u32,
) -> f64 {
    let coverage = 0.6 + 0.4 * (edge_cases_covered as f64 / 4.0).min(1.0);
    weighted_harmonic_mean(&[
        (0.35, MAX_SCORE * (1.0 - error_rate.clamp(0.0, 1.0))),
        (0.25, MAX_SCORE * (1.0 - (2.0 * timeout_rate).clamp(0.0, 1.0))),
        (0.20, MAX_SCORE / (1.0 + 0.08 * external_dependencies as f64)),
        (0.20, MAX_SCORE * coverage),
    ])
}

/// Fit with the intent's regime, the user's preferences and internal balance.
///
/// The profile component is left out entirely for users without a profile.
pub fn synergy(
    plan_regime: Regime,
    intent_regime: Regime,
    profile_similarity: Option<f64>,
    dominant_weights: Option<(f64, f64)>,
) -> f64 {
    let mut components = vec![
        (0.45, regime_alignment(plan_regime, intent_regime)),
        (0.20, golden_balance(dominant_weights)),
    ];
    if let Some(similarity) = profile_similarity {
        components.push((0.35, MAX_SCORE * similarity.max(0.0)));
    }
    weighted_harmonic_mean(&components)
}

/// 10 for the same regime, 7.5 for adjacent, 4 for opposite.
pub fn regime_alignment(plan_regime: Regime, intent_regime: Regime) -> f64 {
    match plan_regime.distance(&intent_regime) {
        0 => 10.0,
        1 => 7.5,
        _ => 4.0,
    }
}

/// How close the ratio of the two heaviest steps is to the golden ratio.
/// Single-step plans get a neutral 7.5.
pub fn golden_balance(dominant_weights: Option<(f64, f64)>) -> f64 {
    match dominant_weights {
        None => 7.5,
        Some((major, minor)) if minor <= 0.0 || major <= 0.0 => 5.0,
        Some((major, minor)) => {
            let deviation = ((major / minor) / GOLDEN_RATIO).ln().abs();
            MAX_SCORE * (-0.8 * deviation).exp()
        }
    }
}

/// Inverse structural complexity plus a bonus for sizing and ranking
/// optimizations.
pub fn elegance(complexity: usize, optimizations: usize) -> f64 {
    let structure = MAX_SCORE / (1.0 + 0.06 * complexity.saturating_sub(2) as f64);
    let optimized = MAX_SCORE * (0.7 + 0.1 * optimizations as f64).min(1.0);
    weighted_harmonic_mean(&[(0.60, structure), (0.40, optimized)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correctness_rewards_similarity() {
        let close = correctness(1.0, 0.95, 0.9, 2, 0);
        let far = correctness(0.3, 0.95, 0.9, 2, 0);
        assert!(close > far);
        assert!(close <= MAX_SCORE);
        assert!(correctness(-1.0, 0.95, 0.9, 2, 0) < 0.1);
    }

    #[test]
    fn test_correctness_penalizes_joins() {
        assert!(correctness(1.0, 0.95, 0.9, 3, 1) < correctness(1.0, 0.95, 0.9, 3, 0));
    }

    #[test]
    fn test_time_score_saturates() {
        let config = ScorerConfig::default();
        assert_eq!(time_score(1.0, &config), 10.0);
        assert_eq!(time_score(20.0, &config), 10.0);
        assert_eq!(time_score(10_000.0, &config), 0.0);
        assert_eq!(time_score(60_000.0, &config), 0.0);
        let mid = time_score(450.0, &config);
        assert!(mid > 3.0 && mid < 7.0);
        assert!(time_score(100.0, &config) > time_score(1_000.0, &config));
    }

    #[test]
    fn test_cheap_fast_plan_outperforms_scan() {
        let config = ScorerConfig::default();
        assert!(performance(24.0, 1.0, &config) > performance(900.0, 8.0, &config));
    }

    #[test]
    fn test_reliability_tracks_failures() {
        let clean = reliability(0.0, 0.0, 0, 4);
        let flaky = reliability(0.5, 0.25, 0, 4);
        assert!((clean - 10.0).abs() < 1e-9);
        assert!(flaky < clean);
        assert!(reliability(0.0, 0.0, 3, 1) < clean);
    }

    #[test]
    fn test_regime_alignment_by_distance() {
        assert_eq!(regime_alignment(Regime::Stabilization, Regime::Stabilization), 10.0);
        assert_eq!(regime_alignment(Regime::Optimization, Regime::Stabilization), 7.5);
        assert_eq!(regime_alignment(Regime::Exploration, Regime::Stabilization), 4.0);
    }

    #[test]
    fn test_golden_balance_peaks_at_phi() {
        let golden = golden_balance(Some((0.618, 0.382)));
        let even = golden_balance(Some((0.5, 0.5)));
        let lopsided = golden_balance(Some((0.9, 0.1)));
        assert!(golden > 9.9);
        assert!(golden > even && even > lopsided);
        assert_eq!(golden_balance(None), 7.5);
    }

    #[test]
    fn test_synergy_without_profile_skips_component() {
        let without = synergy(Regime::Exploration, Regime::Exploration, None, Some((0.618, 0.382)));
        assert!(without > 9.9);
        let disliked = synergy(
            Regime::Exploration,
            Regime::Exploration,
            Some(0.1),
            Some((0.618, 0.382)),
        );
        assert!(disliked < without);
    }

    #[test]
    fn test_elegance_prefers_small_optimized_plans() {
        assert!(elegance(2, 3) > elegance(8, 0));
        assert!((elegance(2, 3) - 10.0).abs() < 1e-9);
    }
}
