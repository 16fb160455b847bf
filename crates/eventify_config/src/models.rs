// --- File: crates/eventify_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// --- Storage Config ---
/// Which key/value backend the services persist into.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-local map, lost on exit.
    Memory,
    /// One JSON document per key under `data_dir`.
    #[default]
    File,
    /// No storage at all (pre-rendering mode): reads are empty, writes dropped.
    Unavailable,
}

/// How concurrent writers to the same collection are reconciled.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyMode {
    /// Whoever writes last replaces the whole collection.
    LastWriteWins,
    /// Writes carrying an outdated revision are rejected.
    #[default]
    Optimistic,
}

/// The fixed key names of the three collections.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StorageKeys {
    pub events: String,
    pub favorites: String,
    pub registrations: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            events: "eventify-events".to_string(),
            favorites: "eventify-favorites".to_string(),
            registrations: "eventify-registrations".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf, // only read by the file backend
    pub quota_bytes: Option<u64>, // per stored value, None = unlimited
    pub concurrency: ConcurrencyMode,
    pub keys: StorageKeys,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: PathBuf::from("./data"),
            quota_bytes: None,
            concurrency: ConcurrencyMode::default(),
            keys: StorageKeys::default(),
        }
    }
}

// --- Catalog Config ---
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    pub page_size: usize,
    pub placeholder_image: String,
}

pub const DEFAULT_PAGE_SIZE: usize = 6;
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=300&width=400";

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

// --- Logging Config ---
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String, // trace | debug | info | warn | error
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// --- Unified App Configuration ---
/// Every section is optional in the sources; missing sections fall back to defaults.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
