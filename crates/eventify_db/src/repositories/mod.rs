//! Repository modules for the three stored collections
//!
//! Each repository exclusively owns one key of the store; none of them
//! reads another's key.

pub mod events;
pub mod favorites;
pub mod registrations;

// Re-export the repositories for ease of use
pub use events::EventRepository;
pub use favorites::FavoritesRepository;
pub use registrations::RegistrationRepository;
