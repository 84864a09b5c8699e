//! Request and response types of the engine's public operations.

use serde::{Deserialize, Serialize};
use synth_generator::GenerationReport;
use synth_types::{
    Candidate, CandidateId, IntentSummary, Regime, SystemIndicators, UserId,
};

/// Input of one synthesize call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub summary: IntentSummary,
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Caller-observed indicators; the engine's source is used when absent.
    #[serde(default)]
    pub indicators: Option<SystemIndicators>,
    /// Lowers every threshold by this much, capped by the selector.
    #[serde(default)]
    pub threshold_relaxation: f64,
}

impl SynthesisRequest {
    pub fn new(summary: IntentSummary) -> Self {
        Self {
            summary,
            ..Self::default()
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_indicators(mut self, indicators: SystemIndicators) -> Self {
        self.indicators = Some(indicators);
        self
    }

    pub fn with_relaxation(mut self, relaxation: f64) -> Self {
        self.threshold_relaxation = relaxation;
        self
    }
}

/// How a synthesize call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisOutcome {
    /// At least one candidate passed its gate.
    Ranked,
    /// Nothing was generated for the intent.
    NoMatch,
    /// Candidates were generated but none met its threshold.
    BelowThreshold,
}

/// Candidate counts through the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSummary {
    pub generated: usize,
    pub scored: usize,
    /// Left after keeping the best candidate per plan type.
    pub distinct: usize,
    pub gated_out: usize,
    pub trimmed: usize,
}

/// Output of one synthesize call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisResponse {
    pub outcome: SynthesisOutcome,
    /// Surfaced candidates, best first, each carrying its quality breakdown.
    pub candidates: Vec<Candidate>,
    pub regime: Regime,
    /// Encoder confidence for the intent.
    pub confidence: f64,
    /// Threshold the intent's own regime imposed, after relaxation.
    pub threshold: f64,
    /// Hint for the caller when nothing was surfaced.
    pub suggestion: Option<String>,
    /// The call deadline cut generation or scoring short.
    pub timed_out: bool,
    pub elapsed_ms: u64,
    pub pool: PoolSummary,
    pub report: GenerationReport,
}

impl SynthesisResponse {
    pub fn is_ranked(&self) -> bool {
        self.outcome == SynthesisOutcome::Ranked
    }

    pub fn average_confidence(&self) -> Option<f64> {
        if self.candidates.is_empty() {
            return None;
        }
        let sum: f64 = self.candidates.iter().map(|c| c.confidence).sum();
        Some(sum / self.candidates.len() as f64)
    }
}

/// Caller report of which candidate was executed and how it went.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceReport {
    pub candidate_id: CandidateId,
    pub success: bool,
    pub duration_ms: u64,
    /// Defaults to the user of the synthesize call that surfaced the candidate.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Re-encoded when given; otherwise the original intent is used.
    #[serde(default)]
    pub intent: Option<IntentSummary>,
}

impl ChoiceReport {
    pub fn new(candidate_id: CandidateId, success: bool, duration_ms: u64) -> Self {
        Self {
            candidate_id,
            success,
            duration_ms,
            user_id: None,
            intent: None,
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }
}
