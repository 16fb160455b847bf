// --- File: crates/eventify_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod logging; // Logging utilities
pub mod models; // Shared data structures

// Re-export error types and utilities for easier access
pub use error::{config_error, not_found, Context, EventifyError, FieldError};

// Re-export the models used by every other crate
pub use models::{Attendee, Event, EventCategory, Registration, UnknownCategory};

// Re-export logging utilities for easier access
pub use logging::{init, init_from_config, init_with_level, log_result};
