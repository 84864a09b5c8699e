//! Generator configuration.

use serde::{Deserialize, Serialize};
use synth_types::StrategyKind;

/// Configuration for candidate generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Strategies to run on every call.
    pub enabled: Vec<StrategyKind>,
    /// Budget for a single strategy before it is cancelled (milliseconds).
    pub strategy_timeout_ms: u64,
    /// How many recent successful interactions history-lookup considers.
    pub history_window: usize,
    /// Minimum similarity for a past interaction to be reused.
    pub history_min_similarity: f64,
    /// Maximum number of history candidates.
    pub history_top: usize,
    /// Fill free history slots with the closest catalog templates of the
    /// intent's category, scored at the prior success rate.
    pub history_catalog_prior: bool,
    /// Fixed confidence of neighborhood candidates.
    pub neighborhood_confidence: f64,
    /// Axis stretch factor for neighborhood variants.
    pub neighborhood_stretch: f64,
    /// Maximum per-component jitter for neighborhood variants.
    pub neighborhood_jitter: f64,
    /// Cache hit rate at or above which cache-first plans are proposed.
    pub cache_hit_threshold: f64,
    /// How many of a user's recent interactions pattern detection reads.
    pub profile_window: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: StrategyKind::ALL.to_vec(),
            strategy_timeout_ms: 250,
            history_window: 50,
            history_min_similarity: 0.6,
            history_top: 3,
            history_catalog_prior: true,
            neighborhood_confidence: 0.55,
            neighborhood_stretch: 1.5,
            neighborhood_jitter: 0.08,
            cache_hit_threshold: 0.75,
            profile_window: 20,
        }
    }
}
