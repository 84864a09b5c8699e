//! Five-dimension quality breakdown.

use serde::{Deserialize, Serialize};

use crate::math::harmonic_mean;

/// Upper bound of every quality score.
pub const MAX_SCORE: f64 = 10.0;

/// The independent quality dimensions a candidate is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityDimension {
    Correctness,
    Performance,
    Reliability,
    Synergy,
    Elegance,
}

impl QualityDimension {
    pub const ALL: [QualityDimension; 5] = [
        QualityDimension::Correctness,
        QualityDimension::Performance,
        QualityDimension::Reliability,
        QualityDimension::Synergy,
        QualityDimension::Elegance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityDimension::Correctness => "correctness",
            QualityDimension::Performance => "performance",
            QualityDimension::Reliability => "reliability",
            QualityDimension::Synergy => "synergy",
            QualityDimension::Elegance => "elegance",
        }
    }
}

/// Per-dimension scores on `[0, 10]` and their harmonic-mean unification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityBreakdown {
    pub correctness: f64,
    pub performance: f64,
    pub reliability: f64,
    pub synergy: f64,
    pub elegance: f64,
    /// `harmonic_mean` of the five sub-scores.
    pub unified: f64,
}

impl QualityBreakdown {
    /// Build a breakdown from raw sub-scores, clamping each to `[0, 10]`.
    pub fn from_scores(
        correctness: f64,
        performance: f64,
        reliability: f64,
        synergy: f64,
        elegance: f64,
    ) -> Self {
        let mut breakdown = Self {
            correctness: clamp_score(correctness),
            performance: clamp_score(performance),
            reliability: clamp_score(reliability),
            synergy: clamp_score(synergy),
            elegance: clamp_score(elegance),
            unified: 0.0,
        };
        breakdown.unified = harmonic_mean(&breakdown.scores());
        breakdown
    }

    pub fn scores(&self) -> [f64; 5] {
        [
            self.correctness,
            self.performance,
            self.reliability,
            self.synergy,
            self.elegance,
        ]
    }

    pub fn get(&self, dimension: QualityDimension) -> f64 {
        match dimension {
            QualityDimension::Correctness => self.correctness,
            QualityDimension::Performance => self.performance,
            QualityDimension::Reliability => self.reliability,
            QualityDimension::Synergy => self.synergy,
            QualityDimension::Elegance => self.elegance,
        }
    }

    /// The lowest-scoring dimension.
    pub fn weakest(&self) -> QualityDimension {
        QualityDimension::ALL
            .into_iter()
            .min_by(|a, b| self.get(*a).total_cmp(&self.get(*b)))
            .unwrap_or(QualityDimension::Correctness)
    }
}

fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, MAX_SCORE)
    } else {
        0.0
    }
}
