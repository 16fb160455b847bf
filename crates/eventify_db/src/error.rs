//! Error types for the storage layer

use eventify_common::EventifyError;
use thiserror::Error;

/// Errors that can occur when reading or writing a stored collection
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store reports it cannot be used in this environment
    #[error("Storage is unavailable")]
    Unavailable,

    /// The stored value is not valid JSON for the expected shape
    #[error("Corrupted store '{key}': {message}")]
    Corrupted { key: String, message: String },

    /// The envelope was written by a newer schema than this build understands
    #[error("Unsupported schema version {version} in store '{key}'")]
    UnsupportedSchema { key: String, version: u32 },

    /// The serialized value is larger than the configured quota
    #[error("Quota exceeded for '{key}': {size} bytes > {quota} bytes")]
    QuotaExceeded { key: String, size: u64, quota: u64 },

    /// Another writer committed since the collection was read
    #[error("Stale revision for '{key}': expected {expected}, found {found}")]
    StaleRevision { key: String, expected: u64, found: u64 },

    /// A value could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error from the file backend
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding the in-memory backend was poisoned
    #[error("Store lock poisoned")]
    Poisoned,
}

impl From<StoreError> for EventifyError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable => EventifyError::StorageUnavailable,
            StoreError::Corrupted { key, message } => EventifyError::CorruptedStore { key, message },
            StoreError::UnsupportedSchema { key, version } => {
                EventifyError::UnsupportedSchema { key, version }
            }
            StoreError::QuotaExceeded { key, size, quota } => {
                EventifyError::QuotaExceeded { key, size, quota }
            }
            StoreError::StaleRevision {
                key,
                expected,
                found,
            } => EventifyError::ConcurrentModification {
                key,
                expected,
                found,
            },
            StoreError::Serialization(message) => EventifyError::ParseError(message),
            StoreError::Io(err) => EventifyError::InternalError(err.to_string()),
            StoreError::Poisoned => EventifyError::InternalError("store lock poisoned".to_string()),
        }
    }
}
