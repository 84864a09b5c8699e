//! Per-field clarity signals.

use serde::{Deserialize, Serialize};
use synth_types::{harmonic_mean, Certainty, IntentSummary};

const MISSING: f64 = 0.1;

/// How unambiguous each field of a summary was, each in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClaritySignals {
    pub action: f64,
    pub entity: f64,
    pub attributes: f64,
    pub certainty: f64,
}

impl ClaritySignals {
    pub fn measure(summary: &IntentSummary) -> Self {
        let action = match summary.action_kind() {
            Some(kind) if kind.is_known() => 1.0,
            Some(_) => 0.6,
            None => MISSING,
        };

        let entity = match summary.entity_label() {
            Some(label) if label.split_whitespace().count() == 1 => 1.0,
            Some(_) => 0.7,
            None => MISSING,
        };

        let attributes = match summary.canonical_attributes().len() {
            0 => 0.85,
            1..=3 => 1.0,
            n => (1.0 - 0.1 * (n - 3) as f64).max(0.5),
        };

        let certainty = match summary.certainty {
            Certainty::High => 1.0,
            Certainty::Medium => 0.75,
            Certainty::Low => 0.5,
            Certainty::Hedged => 0.2,
        };

        Self {
            action,
            entity,
            attributes,
            certainty,
        }
    }

    /// Harmonic mean of the four signals.
    pub fn confidence(&self) -> f64 {
        harmonic_mean(&[self.action, self.entity, self.attributes, self.certainty]).clamp(0.0, 1.0)
    }
}
