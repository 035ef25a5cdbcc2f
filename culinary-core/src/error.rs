//! Errors raised below the request layer.
//!
//! Backends report every connectivity or driver failure as
//! [`DocumentStoreError::StorageUnavailable`] so callers can tell a broken store
//! apart from a bad document.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// A payload could not be converted to a BSON document.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The backend could not be constructed (bad connection string, client setup).
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// A stored document lacks its `_id`, or a filter is malformed.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// No usable store connection, or the store rejected the operation.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl DocumentStoreError {
    /// Returns `true` when the failure comes from the store rather than from the document.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DocumentStoreError::StorageUnavailable(_) | DocumentStoreError::Initialization(_)
        )
    }
}

pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<bson::error::Error> for DocumentStoreError {
    fn from(err: bson::error::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
