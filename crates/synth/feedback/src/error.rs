use synth_store::StoreError;
use thiserror::Error;

pub type FeedbackResult<T> = Result<T, FeedbackError>;

#[derive(Debug, Error)]
pub enum FeedbackError {
    /// The store refused the write for a reason retrying cannot fix.
    #[error("feedback rejected by store: {0}")]
    Rejected(StoreError),

    #[error("invalid feedback configuration: {0}")]
    InvalidConfig(String),
}
