//! Per-user preference accumulator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Regime, SemanticVector, UserId};

/// How many interactions of each regime a user has completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeCounts {
    pub exploration: u64,
    pub optimization: u64,
    pub stabilization: u64,
}

impl RegimeCounts {
    pub fn increment(&mut self, regime: Regime) {
        match regime {
            Regime::Exploration => self.exploration += 1,
            Regime::Optimization => self.optimization += 1,
            Regime::Stabilization => self.stabilization += 1,
        }
    }

    pub fn get(&self, regime: Regime) -> u64 {
        match regime {
            Regime::Exploration => self.exploration,
            Regime::Optimization => self.optimization,
            Regime::Stabilization => self.stabilization,
        }
    }

    pub fn total(&self) -> u64 {
        self.exploration + self.optimization + self.stabilization
    }

    /// The regime with a strictly greatest count, if any.
    pub fn dominant(&self) -> Option<Regime> {
        let max = Regime::ALL.iter().map(|r| self.get(*r)).max()?;
        if max == 0 {
            return None;
        }
        let mut leaders = Regime::ALL.into_iter().filter(|r| self.get(*r) == max);
        let leader = leaders.next()?;
        if leaders.next().is_some() {
            None
        } else {
            Some(leader)
        }
    }
}

/// One feedback-driven profile change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub vector: SemanticVector,
    /// Blend factor `α`, clamped to `[0, 1]` when applied.
    pub learning_rate: f64,
    pub regime: Regime,
    pub success: bool,
}

/// Preference vector plus usage counters for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub preference: SemanticVector,
    pub interactions: u64,
    pub successes: u64,
    pub regime_counts: RegimeCounts,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl UserProfile {
    /// A fresh profile sitting at the neutral vector.
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            preference: SemanticVector::NEUTRAL,
            interactions: 0,
            successes: 0,
            regime_counts: RegimeCounts::default(),
            created_at: now,
            last_seen: now,
        }
    }

    /// Move the preference toward `update.vector` and bump the counters.
    ///
    /// `preference' = normalize(preference·(1−α) + vector·α)`.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        let alpha = if update.learning_rate.is_finite() {
            update.learning_rate.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.preference = self.preference.blend(&update.vector, alpha);
        self.interactions += 1;
        if update.success {
            self.successes += 1;
        }
        self.regime_counts.increment(update.regime);
        self.last_seen = Utc::now();
    }

    /// Regime this user has historically landed in most, if unambiguous.
    pub fn regime_lean(&self) -> Option<Regime> {
        self.regime_counts.dominant()
    }
}
