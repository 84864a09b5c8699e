use synth_store::StoreError;
use thiserror::Error;

/// Result type for a single strategy run.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Errors a strategy can fail with. None of them abort a generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("indicator source unavailable: {0}")]
    Indicators(String),
}
