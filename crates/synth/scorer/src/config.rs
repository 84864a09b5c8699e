//! Scorer configuration.

use serde::{Deserialize, Serialize};

/// Tunables of the quality scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Duration at or below which the latency score is perfect (milliseconds).
    pub fast_ms: f64,
    /// Duration at or above which the latency score is zero (milliseconds).
    pub slow_ms: f64,
    /// Cost at which the cost score halves.
    pub cost_half_point: f64,
    /// Share of observed average duration mixed into the estimate once a plan
    /// type has history.
    pub observed_duration_share: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            fast_ms: 20.0,
            slow_ms: 10_000.0,
            cost_half_point: 20.0,
            observed_duration_share: 0.5,
        }
    }
}
