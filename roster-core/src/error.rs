//! Error types and result types for document store operations.
//!
//! Backends convert their driver-specific failures into [`StoreError`] so the
//! layers above can tell a missing connection apart from a rejected document.
//! Use [`StoreResult<T>`] as the return type for fallible store operations.

use bson::error::Error as BsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when talking to a document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached (no server selected, connection refused or dropped).
    #[error("Not connected: {0}")]
    NotConnected(String),
    /// Error during store initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// Serialization/deserialization error when converting to or from BSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The document or filter handed to the store has an invalid structure.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// An error reported by the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns true when the failure happened before the store could be reached.
    pub fn is_connection(&self) -> bool {
        matches!(self, StoreError::NotConnected(_) | StoreError::Initialization(_))
    }
}

/// A specialized `Result` type for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<BsonError> for StoreError {
    fn from(err: BsonError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
