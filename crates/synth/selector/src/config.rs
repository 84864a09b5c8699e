//! Selector configuration.

use serde::{Deserialize, Serialize};
use synth_types::{Regime, MAX_SCORE};
use thiserror::Error;

/// Invalid selector settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectorConfigError {
    #[error("thresholds must satisfy exploration < optimization < stabilization, got {0:?}")]
    UnorderedThresholds(RegimeThresholds),

    #[error("threshold {0} outside [0, 10]")]
    ThresholdOutOfRange(f64),

    #[error("min_results ({min}) must be at least 1 and at most max_results ({max})")]
    InvalidResultWindow { min: usize, max: usize },

    #[error("max_relaxation {0} outside [0, 10]")]
    InvalidRelaxation(f64),
}

/// Minimum unified quality per regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeThresholds {
    pub exploration: f64,
    pub optimization: f64,
    pub stabilization: f64,
}

impl RegimeThresholds {
    pub fn for_regime(&self, regime: Regime) -> f64 {
        match regime {
            Regime::Exploration => self.exploration,
            Regime::Optimization => self.optimization,
            Regime::Stabilization => self.stabilization,
        }
    }

    pub fn validate(&self) -> Result<(), SelectorConfigError> {
        for value in [self.exploration, self.optimization, self.stabilization] {
            if !value.is_finite() || !(0.0..=MAX_SCORE).contains(&value) {
                return Err(SelectorConfigError::ThresholdOutOfRange(value));
            }
        }
        if self.exploration < self.optimization && self.optimization < self.stabilization {
            Ok(())
        } else {
            Err(SelectorConfigError::UnorderedThresholds(*self))
        }
    }
}

impl Default for RegimeThresholds {
    fn default() -> Self {
        Self {
            exploration: 7.0,
            optimization: 8.5,
            stabilization: 9.0,
        }
    }
}

/// Configuration of gating and sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub thresholds: RegimeThresholds,
    /// Lower bound of the result window (`MIN_RESULTS`).
    pub min_results: usize,
    /// Upper bound of the result window (`MAX_RESULTS`).
    pub max_results: usize,
    /// Largest threshold relaxation a caller may request.
    pub max_relaxation: f64,
}

impl SelectorConfig {
    pub fn validate(&self) -> Result<(), SelectorConfigError> {
        self.thresholds.validate()?;
        if self.min_results == 0 || self.min_results > self.max_results {
            return Err(SelectorConfigError::InvalidResultWindow {
                min: self.min_results,
                max: self.max_results,
            });
        }
        if !self.max_relaxation.is_finite() || !(0.0..=MAX_SCORE).contains(&self.max_relaxation) {
            return Err(SelectorConfigError::InvalidRelaxation(self.max_relaxation));
        }
        Ok(())
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            thresholds: RegimeThresholds::default(),
            min_results: 2,
            max_results: 4,
            max_relaxation: 2.0,
        }
    }
}
