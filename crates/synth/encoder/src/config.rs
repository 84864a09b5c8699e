//! Encoder configuration.

use serde::{Deserialize, Serialize};

/// Relative importance of each summary field in the blended vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub action: f64,
    pub entity: f64,
    pub attributes: f64,
    pub certainty: f64,
}

impl FieldWeights {
    pub fn total(&self) -> f64 {
        self.action + self.entity + self.attributes + self.certainty
    }

    /// True when every weight is finite and non-negative, and the action
    /// outweighs the rest in the documented order.
    pub fn is_ordered(&self) -> bool {
        let all = [self.action, self.entity, self.attributes, self.certainty];
        all.iter().all(|w| w.is_finite() && *w >= 0.0)
            && self.action >= self.entity
            && self.entity >= self.attributes
            && self.attributes >= self.certainty
            && self.total() > 0.0
    }
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            action: 0.4,
            entity: 0.3,
            attributes: 0.2,
            certainty: 0.1,
        }
    }
}

/// Configuration for the semantic encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub weights: FieldWeights,
    /// Confidence at or above which a high-certainty summary stabilizes.
    pub stabilization_confidence: f64,
    /// Confidence below which a summary is treated as exploratory.
    pub exploration_confidence: f64,
    /// Confidence reported for a degenerate summary.
    pub degenerate_confidence: f64,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            weights: FieldWeights::default(),
            stabilization_confidence: 0.9,
            exploration_confidence: 0.6,
            degenerate_confidence: 0.1,
        }
    }
}
