//! Storage layer for Eventify
//!
//! This crate provides the key/value store contract, its backends, and the
//! three services persisted through it:
//!
//! - [`EventRepository`]: the event catalog, seeded on first read
//! - [`FavoritesRepository`]: favorited event ids, with toggle semantics
//! - [`RegistrationRepository`]: the append-only registration log
//!
//! Every collection is stored under its own key inside a versioned
//! envelope (see [`envelope`]). Services are plain values constructed with
//! an injected [`StoreHandle`]; there is no global state.
//!
//! # Example
//!
//! ```rust
//! use eventify_config::ConcurrencyMode;
//! use eventify_db::{EventRepository, FavoritesRepository, MemoryStore};
//!
//! # fn main() -> Result<(), eventify_db::StoreError> {
//! let store = MemoryStore::shared();
//! let events = EventRepository::new(store.clone(), "eventify-events", ConcurrencyMode::Optimistic);
//! let favorites = FavoritesRepository::new(store, "eventify-favorites", ConcurrencyMode::Optimistic);
//!
//! assert_eq!(events.get_all()?.len(), 8);
//! assert!(favorites.toggle("1")?);
//! # Ok(())
//! # }
//! ```

pub mod envelope;
pub mod error;
pub mod factory;
pub mod file_store;
pub mod repositories;
pub mod seed;
pub mod store;

#[cfg(test)]
mod repositories_proptest;

// Re-export the store contract, factory and repositories for ease of use
pub use error::StoreError;
pub use factory::{Repositories, StoreFactory};
pub use file_store::FileStore;
pub use repositories::{EventRepository, FavoritesRepository, RegistrationRepository};
pub use store::{KeyValueStore, MemoryStore, StoreHandle, UnavailableStore};
