use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// An operation was rejected before any state changed. The message is
    /// shown to the user verbatim.
    #[error("{0}")]
    Precondition(String),

    #[error(transparent)]
    Storage(#[from] storage::error::StorageError),
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub fn precondition(reason: impl Into<String>) -> Self {
        EngineError::Precondition(reason.into())
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, EngineError::Precondition(_))
    }
}
