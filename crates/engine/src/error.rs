use pvmetrics_core::error::CoreError;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A failed read or write against the backing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid stored data: {0}")]
    InvalidData(#[from] CoreError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors that stop a metric run before or outside partition processing.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        EngineError::InvalidConfiguration(err.to_string())
    }
}
