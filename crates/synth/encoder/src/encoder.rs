//! The encoder itself.

use synth_types::{
    Certainty, EncodedIntent, IntentCategory, IntentSummary, Regime, SemanticVector,
};
use tracing::debug;

use crate::clarity::ClaritySignals;
use crate::config::EncoderConfig;
use crate::seeds::{field_seeds, Field};

/// Deterministic summary-to-vector encoder.
#[derive(Debug, Clone, Default)]
pub struct SemanticEncoder {
    config: EncoderConfig,
}

impl SemanticEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode a summary. Never fails.
    pub fn encode(&self, summary: &IntentSummary) -> EncodedIntent {
        if summary.is_degenerate() {
            debug!("degenerate intent summary, using neutral encoding");
            return EncodedIntent {
                vector: SemanticVector::NEUTRAL,
                regime: Regime::Exploration,
                confidence: self.config.degenerate_confidence,
                category: IntentCategory::General,
                degenerate: true,
            };
        }

        let vector = self.vector_for(summary);
        let clarity = ClaritySignals::measure(summary);
        let confidence = clarity.confidence();
        let regime = self.regime_for(summary.certainty, confidence);
        let category = summary
            .action_kind()
            .map(|kind| kind.category())
            .unwrap_or(IntentCategory::General);

        debug!(
            %regime,
            %category,
            confidence,
            "encoded intent summary"
        );

        EncodedIntent {
            vector,
            regime,
            confidence,
            category,
            degenerate: false,
        }
    }

    /// Weighted sum of per-field seeds, normalized. Missing fields contribute
    /// nothing.
    fn vector_for(&self, summary: &IntentSummary) -> SemanticVector {
        let weights = &self.config.weights;
        let mut contributions: Vec<(f64, [f64; 4])> = Vec::with_capacity(4);

        if let Some(action) = summary.action_label() {
            contributions.push((weights.action, field_seeds(Field::Action, &action)));
        }
        if let Some(entity) = summary.entity_label() {
            contributions.push((weights.entity, field_seeds(Field::Entity, &entity)));
        }
        let attributes = summary.canonical_attributes();
        if !attributes.is_empty() {
            let joined = attributes.join("\u{1f}");
            contributions.push((weights.attributes, field_seeds(Field::Attributes, &joined)));
        }
        contributions.push((
            weights.certainty,
            field_seeds(Field::Certainty, summary.certainty.as_str()),
        ));

        let mut components = [0.0; 4];
        for (weight, seeds) in contributions {
            for (c, s) in components.iter_mut().zip(seeds) {
                *c += weight * s;
            }
        }

        SemanticVector::normalized_or(components, SemanticVector::NEUTRAL)
    }

    fn regime_for(&self, certainty: Certainty, confidence: f64) -> Regime {
        if certainty == Certainty::Hedged || confidence < self.config.exploration_confidence {
            Regime::Exploration
        } else if certainty == Certainty::High
            && confidence >= self.config.stabilization_confidence
        {
            Regime::Stabilization
        } else {
            Regime::Optimization
        }
    }
}
