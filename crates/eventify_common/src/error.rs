// --- File: crates/eventify_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The base error type for all Eventify errors.
///
/// Ordinary empty results (unknown id, empty category) are never errors;
/// only environment-level failures and rejected form input end up here.
#[derive(Error, Debug)]
pub enum EventifyError {
    /// The key/value store cannot be reached in this environment
    #[error("Storage unavailable")]
    StorageUnavailable,

    /// A stored collection could not be decoded
    #[error("Corrupted store '{key}': {message}")]
    CorruptedStore { key: String, message: String },

    /// The stored collection was written by a newer schema
    #[error("Unsupported schema version {version} in store '{key}'")]
    UnsupportedSchema { key: String, version: u32 },

    /// The write would exceed the storage quota
    #[error("Storage quota exceeded for '{key}': {size} bytes > {quota} bytes")]
    QuotaExceeded { key: String, size: u64, quota: u64 },

    /// Another writer committed since this one read the collection
    #[error("Concurrent modification of '{key}': expected revision {expected}, found {found}")]
    ConcurrentModification { key: String, expected: u64, found: u64 },

    /// Form input failed validation
    #[error("Validation error: {}", join_fields(.0))]
    ValidationError(Vec<FieldError>),

    /// A referenced resource does not exist
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl EventifyError {
    /// Whether the failure comes from the storage environment rather than the caller's input.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            EventifyError::StorageUnavailable
                | EventifyError::CorruptedStore { .. }
                | EventifyError::UnsupportedSchema { .. }
                | EventifyError::QuotaExceeded { .. }
                | EventifyError::ConcurrentModification { .. }
        )
    }

    /// The rejected fields, if this is a validation error.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            EventifyError::ValidationError(errors) => errors,
            _ => &[],
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, EventifyError>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, EventifyError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| EventifyError::InternalError(format!("{}: {}", context, error)))
    }
}

impl From<serde_json::Error> for EventifyError {
    fn from(err: serde_json::Error) -> Self {
        EventifyError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for EventifyError {
    fn from(err: std::io::Error) -> Self {
        EventifyError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> EventifyError {
    EventifyError::ConfigError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> EventifyError {
    EventifyError::NotFoundError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_field() {
        let err = EventifyError::ValidationError(vec![
            FieldError::new("name", "too short"),
            FieldError::new("date", "in the past"),
        ]);

        assert_eq!(
            err.to_string(),
            "Validation error: name: too short; date: in the past"
        );
        assert_eq!(err.field_errors().len(), 2);
        assert!(!err.is_storage_failure());
    }

    #[test]
    fn test_storage_failures_are_classified() {
        assert!(EventifyError::StorageUnavailable.is_storage_failure());
        assert!(EventifyError::CorruptedStore {
            key: "k".into(),
            message: "eof".into()
        }
        .is_storage_failure());
        assert!(!not_found("event 9").is_storage_failure());
    }

    #[test]
    fn test_context_wraps_foreign_errors() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"));
        let err = result.context("writing catalog").unwrap_err();

        assert_eq!(err.to_string(), "Internal error: writing catalog: disk gone");
    }
}
