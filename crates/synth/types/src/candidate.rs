//! Candidate execution plans.

use serde::{Deserialize, Serialize};

use crate::{CandidateId, QualityBreakdown, Regime, SemanticVector};

/// Plan-type key, e.g. `lookup.indexed`. Statistics are kept per plan type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlanType(pub String);

impl PlanType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The generation strategy a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    HistoryLookup,
    NeighborhoodExploration,
    StateAware,
    ProfilePredictive,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::HistoryLookup,
        StrategyKind::NeighborhoodExploration,
        StrategyKind::StateAware,
        StrategyKind::ProfilePredictive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::HistoryLookup => "history_lookup",
            StrategyKind::NeighborhoodExploration => "neighborhood_exploration",
            StrategyKind::StateAware => "state_aware",
            StrategyKind::ProfilePredictive => "profile_predictive",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of work a plan step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Read,
    Filter,
    Join,
    Aggregate,
    Write,
    Cache,
    Fanout,
}

/// One structural component of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub name: String,
    pub kind: StepKind,
    /// Relative share of the plan's work (weights of a plan sum to ~1).
    pub weight: f64,
}

impl PlanStep {
    pub fn new(name: impl Into<String>, kind: StepKind, weight: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            weight,
        }
    }
}

/// Sizing and ranking optimizations a plan makes measurable use of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Optimization {
    /// Reads through an index instead of scanning.
    Indexed,
    /// Serves from a cache or materialization.
    Cached,
    /// Bounds its result size.
    Bounded,
    /// Ranks results before truncation.
    Ranked,
}

/// Structured body of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanPayload {
    pub plan_type: PlanType,
    pub steps: Vec<PlanStep>,
    pub external_dependencies: u32,
    pub edge_cases_covered: u32,
    pub optimizations: Vec<Optimization>,
}

impl PlanPayload {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn join_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.kind == StepKind::Join)
            .count()
    }

    /// Cyclomatic-style complexity: steps, joins twice, plus dependencies.
    pub fn complexity(&self) -> usize {
        self.step_count() + 2 * self.join_count() + self.external_dependencies as usize
    }

    /// Number of distinct optimizations used.
    pub fn optimization_count(&self) -> usize {
        let mut seen: Vec<Optimization> = Vec::with_capacity(self.optimizations.len());
        for opt in &self.optimizations {
            if !seen.contains(opt) {
                seen.push(*opt);
            }
        }
        seen.len()
    }

    /// Weights of the two heaviest steps, largest first.
    pub fn dominant_weights(&self) -> Option<(f64, f64)> {
        let mut weights: Vec<f64> = self.steps.iter().map(|s| s.weight).collect();
        weights.sort_by(|a, b| b.total_cmp(a));
        match weights.as_slice() {
            [first, second, ..] => Some((*first, *second)),
            _ => None,
        }
    }
}

/// A proposed way to satisfy an intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub strategy_origin: StrategyKind,
    pub plan_type: PlanType,
    pub title: String,
    pub description: String,
    /// Strategy confidence in `[0, 1]`.
    pub confidence: f64,
    pub regime: Regime,
    pub estimated_duration_ms: u64,
    pub estimated_cost: f64,
    pub plan_payload: PlanPayload,
    pub reasoning: String,
    /// Semantic position of the plan.
    pub vector: SemanticVector,
    /// Attached by the scorer; `None` until then.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityBreakdown>,
}

impl Candidate {
    /// Unified quality or `0.0` for an unscored candidate.
    pub fn unified(&self) -> f64 {
        self.quality.as_ref().map(|q| q.unified).unwrap_or(0.0)
    }

    pub fn with_quality(mut self, quality: QualityBreakdown) -> Self {
        self.quality = Some(quality);
        self
    }
}
