use thiserror::Error;

/// Failure taxonomy shared by every stage of the pipeline.
///
/// Startup-only variants (`IndexUnavailable`, `InvalidConfig`) abort
/// construction of the recommender. `TrainingDataUnavailable` is recovered
/// by degrading to an empty association index, and `RecordNotFound` only ever
/// drops a single candidate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Vector index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Training data unavailable: {0}")]
    TrainingDataUnavailable(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True for errors caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidRequest(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
