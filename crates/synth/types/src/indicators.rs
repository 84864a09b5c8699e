//! Live system indicators consumed by the state-aware strategy.

use serde::{Deserialize, Serialize};

/// Point-in-time system state. Both figures are fractions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemIndicators {
    pub cache_hit_rate: f64,
    pub load: f64,
}

impl SystemIndicators {
    pub fn new(cache_hit_rate: f64, load: f64) -> Self {
        Self {
            cache_hit_rate,
            load,
        }
        .clamped()
    }

    /// Copy with both figures clamped into `[0, 1]`; non-finite becomes 0.
    pub fn clamped(self) -> Self {
        let clamp = |v: f64| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            cache_hit_rate: clamp(self.cache_hit_rate),
            load: clamp(self.load),
        }
    }
}

impl Default for SystemIndicators {
    fn default() -> Self {
        Self {
            cache_hit_rate: 0.5,
            load: 0.3,
        }
    }
}
