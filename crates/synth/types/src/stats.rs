//! Rolling per-plan-type statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::PlanType;

/// Prior success rate assumed for a plan type with little history.
pub const SUCCESS_PRIOR_RATE: f64 = 0.95;

/// Number of pseudo-observations the prior is worth.
pub const SUCCESS_PRIOR_WEIGHT: f64 = 4.0;

/// Outcome of one execution of a chosen plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub success: bool,
    pub timed_out: bool,
    pub duration_ms: u64,
    /// Unified quality the plan was scored with when it was offered.
    pub quality: Option<f64>,
}

/// Counters and cumulative averages for one plan type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTypeStats {
    pub plan_type: PlanType,
    pub execution_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub timeout_count: u64,
    pub avg_duration_ms: f64,
    pub avg_quality: f64,
    /// Number of outcomes that carried a quality value.
    pub quality_samples: u64,
    pub updated_at: DateTime<Utc>,
}

impl PlanTypeStats {
    pub fn new(plan_type: PlanType) -> Self {
        Self {
            plan_type,
            execution_count: 0,
            success_count: 0,
            failure_count: 0,
            timeout_count: 0,
            avg_duration_ms: 0.0,
            avg_quality: 0.0,
            quality_samples: 0,
            updated_at: Utc::now(),
        }
    }

    /// Fold one outcome into the counters.
    ///
    /// Averages are cumulative, so each update moves them by `1/n` of the
    /// difference and they never oscillate.
    pub fn apply(&mut self, outcome: &PlanOutcome) {
        self.execution_count += 1;
        if outcome.success && !outcome.timed_out {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
        }
        if outcome.timed_out {
            self.timeout_count += 1;
        }

        let n = self.execution_count as f64;
        self.avg_duration_ms += (outcome.duration_ms as f64 - self.avg_duration_ms) / n;

        if let Some(quality) = outcome.quality.filter(|q| q.is_finite()) {
            self.quality_samples += 1;
            let m = self.quality_samples as f64;
            self.avg_quality += (quality - self.avg_quality) / m;
        }

        self.updated_at = Utc::now();
    }

    pub fn has_history(&self) -> bool {
        self.execution_count > 0
    }

    /// Success rate shrunk toward [`SUCCESS_PRIOR_RATE`].
    pub fn smoothed_success_rate(&self) -> f64 {
        (self.success_count as f64 + SUCCESS_PRIOR_RATE * SUCCESS_PRIOR_WEIGHT)
            / (self.execution_count as f64 + SUCCESS_PRIOR_WEIGHT)
    }

    /// Failure share with the prior's weight in the denominator.
    pub fn error_rate(&self) -> f64 {
        self.failure_count as f64 / (self.execution_count as f64 + SUCCESS_PRIOR_WEIGHT)
    }

    pub fn timeout_rate(&self) -> f64 {
        self.timeout_count as f64 / (self.execution_count as f64 + SUCCESS_PRIOR_WEIGHT)
    }
}
