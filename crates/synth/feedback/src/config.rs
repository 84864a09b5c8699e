//! Feedback recorder configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FeedbackError, FeedbackResult};

/// Tunables of the feedback recorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Blend factor pulling a profile toward the chosen candidate.
    pub learning_rate: f64,
    /// Executions at least this long count as timed out.
    pub timeout_after_ms: u64,
    /// Write attempts before an entry is queued.
    pub max_attempts: u32,
    /// Backoff unit between attempts; attempt `n` waits `n` units.
    pub retry_backoff_ms: u64,
    /// Maximum queued entries; the oldest is dropped beyond this.
    pub pending_capacity: usize,
}

impl FeedbackConfig {
    pub fn timeout_after(&self) -> Duration {
        Duration::from_millis(self.timeout_after_ms)
    }

    pub fn validate(&self) -> FeedbackResult<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 0.5) {
            return Err(FeedbackError::InvalidConfig(format!(
                "learning_rate must be in (0, 0.5], got {}",
                self.learning_rate
            )));
        }
        if self.max_attempts == 0 {
            return Err(FeedbackError::InvalidConfig(
                "max_attempts must be at least 1".into(),
            ));
        }
        if self.pending_capacity == 0 {
            return Err(FeedbackError::InvalidConfig(
                "pending_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            timeout_after_ms: 30_000,
            max_attempts: 3,
            retry_backoff_ms: 50,
            pending_capacity: 1_024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = FeedbackConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout_after(), Duration::from_secs(30));
    }

    #[test]
    fn test_learning_rate_bounds() {
        for rate in [0.0, -0.1, 0.51, f64::NAN] {
            let config = FeedbackConfig {
                learning_rate: rate,
                ..FeedbackConfig::default()
            };
            assert!(config.validate().is_err(), "rate {rate} accepted");
        }
        let config = FeedbackConfig {
            learning_rate: 0.5,
            ..FeedbackConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
