//! Factory for creating stores and the repositories over them
//!
//! Turns the `[storage]` configuration section into a [`StoreHandle`] and
//! builds the three repositories sharing it.

use crate::error::StoreError;
use crate::file_store::FileStore;
use crate::repositories::{EventRepository, FavoritesRepository, RegistrationRepository};
use crate::store::{MemoryStore, StoreHandle, UnavailableStore};
use eventify_config::{AppConfig, StorageBackend, StorageConfig};
use std::sync::Arc;
use tracing::{debug, info};

/// Factory for creating key/value stores
#[derive(Debug, Clone, Default)]
pub struct StoreFactory;

impl StoreFactory {
    pub fn new() -> Self {
        Self
    }

    /// Create the store described by the application configuration.
    pub fn from_app_config(&self, config: &AppConfig) -> Result<StoreHandle, StoreError> {
        self.from_storage_config(&config.storage)
    }

    /// Create the store described by a storage configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file backend's directory cannot be created.
    pub fn from_storage_config(&self, config: &StorageConfig) -> Result<StoreHandle, StoreError> {
        debug!("Creating {:?} store", config.backend);
        let store: StoreHandle = match config.backend {
            StorageBackend::Memory => match config.quota_bytes {
                Some(quota) => Arc::new(MemoryStore::with_quota(quota)),
                None => Arc::new(MemoryStore::new()),
            },
            StorageBackend::File => Arc::new(
                FileStore::open(config.data_dir.clone())?.with_quota(config.quota_bytes),
            ),
            StorageBackend::Unavailable => {
                info!("Storage disabled by configuration; operations will report it unavailable");
                Arc::new(UnavailableStore)
            }
        };
        Ok(store)
    }
}

/// The three repositories over one shared store.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub events: EventRepository,
    pub favorites: FavoritesRepository,
    pub registrations: RegistrationRepository,
}

impl Repositories {
    pub fn new(store: StoreHandle, config: &StorageConfig) -> Self {
        Self {
            events: EventRepository::from_config(store.clone(), config),
            favorites: FavoritesRepository::from_config(store.clone(), config),
            registrations: RegistrationRepository::from_config(store, config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyValueStore;

    #[test]
    fn test_memory_backend() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            ..StorageConfig::default()
        };
        let store = StoreFactory::new().from_storage_config(&config).unwrap();
        assert!(store.is_available());
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_file_backend_uses_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::File,
            data_dir: dir.path().join("nested"),
            ..StorageConfig::default()
        };
        let store = StoreFactory::new().from_storage_config(&config).unwrap();
        store.set("k", "v").unwrap();

        assert!(dir.path().join("nested").join("k.json").exists());
    }

    #[test]
    fn test_unavailable_backend() {
        let config = StorageConfig {
            backend: StorageBackend::Unavailable,
            ..StorageConfig::default()
        };
        let store = StoreFactory::new().from_storage_config(&config).unwrap();
        assert!(!store.is_available());
    }

    #[test]
    fn test_repositories_use_configured_keys() {
        let mut config = StorageConfig {
            backend: StorageBackend::Memory,
            ..StorageConfig::default()
        };
        config.keys.favorites = "custom-favorites".to_string();
        let store = StoreFactory::new().from_storage_config(&config).unwrap();
        let repos = Repositories::new(store.clone(), &config);

        repos.favorites.toggle("1").unwrap();
        assert!(store.get("custom-favorites").unwrap().is_some());
        assert_eq!(repos.events.key(), "eventify-events");
        assert_eq!(repos.registrations.key(), "eventify-registrations");
    }
}
