//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use synth_encoder::EncoderConfig;
use synth_feedback::FeedbackConfig;
use synth_generator::GeneratorConfig;
use synth_scorer::ScorerConfig;
use synth_selector::SelectorConfig;

use crate::error::{EngineError, EngineResult};

/// Configuration of every pipeline stage plus call-level limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub encoder: EncoderConfig,
    pub generator: GeneratorConfig,
    pub scorer: ScorerConfig,
    pub selector: SelectorConfig,
    pub feedback: FeedbackConfig,
    /// Deadline for a whole synthesize call (milliseconds).
    pub call_timeout_ms: u64,
    /// Share of the call deadline strategies may use. The rest is left for
    /// scoring whatever they produced.
    pub generation_share: f64,
    /// How many surfaced candidates stay resolvable for `record_choice`.
    pub candidate_cache_capacity: usize,
}

impl EngineConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Portion of [`Self::call_timeout`] granted to candidate generation.
    pub fn generation_timeout(&self) -> Duration {
        self.call_timeout().mul_f64(self.generation_share.clamp(0.0, 1.0))
    }

    /// Check cross-field constraints of all stages.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.encoder.weights.is_ordered() {
            return Err(EngineError::InvalidConfig(
                "encoder weights must be non-negative and ordered action >= entity >= attributes >= certainty"
                    .into(),
            ));
        }
        if self.generator.strategy_timeout_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "generator.strategy_timeout_ms must be positive".into(),
            ));
        }
        if !(-1.0..=1.0).contains(&self.generator.history_min_similarity) {
            return Err(EngineError::InvalidConfig(
                "generator.history_min_similarity must be within [-1, 1]".into(),
            ));
        }
        self.selector
            .validate()
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        self.feedback
            .validate()
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        if self.call_timeout_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "call_timeout_ms must be positive".into(),
            ));
        }
        if !(self.generation_share > 0.0 && self.generation_share < 1.0) {
            return Err(EngineError::InvalidConfig(
                "generation_share must be within (0, 1)".into(),
            ));
        }
        if self.candidate_cache_capacity == 0 {
            return Err(EngineError::InvalidConfig(
                "candidate_cache_capacity must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            encoder: EncoderConfig::default(),
            generator: GeneratorConfig::default(),
            scorer: ScorerConfig::default(),
            selector: SelectorConfig::default(),
            feedback: FeedbackConfig::default(),
            call_timeout_ms: 800,
            generation_share: 0.75,
            candidate_cache_capacity: 4_096,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synth_selector::RegimeThresholds;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_stage_configs() {
        let mut config = EngineConfig::default();
        config.selector.thresholds = RegimeThresholds {
            exploration: 9.5,
            optimization: 8.5,
            stabilization: 9.0,
        };
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));

        let mut config = EngineConfig::default();
        config.feedback.learning_rate = 0.9;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.encoder.weights.certainty = 0.9;
        assert!(config.validate().is_err());

        let config = EngineConfig {
            call_timeout_ms: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        for share in [0.0, 1.0, f64::NAN] {
            let config = EngineConfig {
                generation_share: share,
                ..EngineConfig::default()
            };
            assert!(config.validate().is_err(), "share {share}");
        }
    }

    #[test]
    fn test_generation_leaves_room_for_scoring() {
        let config = EngineConfig {
            call_timeout_ms: 200,
            ..EngineConfig::default()
        };
        assert_eq!(config.generation_timeout(), Duration::from_millis(150));
        assert!(config.generation_timeout() < config.call_timeout());
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"call_timeout_ms": 500, "selector": {"max_results": 3}}"#)
                .unwrap();
        assert_eq!(config.call_timeout_ms, 500);
        assert_eq!(config.selector.max_results, 3);
        assert_eq!(config.selector.min_results, 2);
        assert_eq!(config.feedback.learning_rate, 0.1);
    }
}
