//! Persistence layer errors

use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Zero rows where at least one was required
    #[error("not found: {0}")]
    NotFound(String),

    /// The engine rejected the statement or the file could not be opened
    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),

    /// A row did not fit the record it was read into
    #[error("mapping error: {0}")]
    Mapping(#[from] serde_json::Error),

    #[error("record does not serialize to an object")]
    NotARecord,

    /// The write would break a uniqueness rule such as one user per email
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid table name: {0}")]
    InvalidTable(String),

    #[error("timestamp formatting: {0}")]
    Timestamp(#[from] time::error::Format),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
