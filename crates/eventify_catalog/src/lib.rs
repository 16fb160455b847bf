//! Catalog layer for Eventify
//!
//! Sits on top of the storage services in `eventify-db`:
//!
//! - [`query`]: the filter/search/sort pipeline and pagination
//! - [`validation`]: the event creation and registration forms
//! - [`service`]: the [`Eventify`] facade the pages call into

pub mod collation;
pub mod query;
pub mod service;
pub mod validation;

#[cfg(test)]
mod query_proptest;

pub use query::{apply_query, paginate, CatalogQuery, CategoryFilter, Page, Pager, SortBy};
pub use service::{Eventify, RegistrationOutcome};
pub use validation::{
    generate_event_id, validate_event_draft, validate_registration_form, EventDraft,
    RegistrationForm,
};
