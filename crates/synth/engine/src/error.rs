use synth_feedback::FeedbackError;
use synth_store::StoreError;
use synth_types::CandidateId;
use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The id was never surfaced, or has aged out of the candidate cache.
    #[error("unknown candidate: {0}")]
    UnknownCandidate(CandidateId),

    #[error(transparent)]
    Feedback(#[from] FeedbackError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
