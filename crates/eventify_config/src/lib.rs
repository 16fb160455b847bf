//! Layered configuration for Eventify.
//!
//! Sources, lowest priority first:
//!
//! 1. built-in defaults (see [`models`])
//! 2. `config/default.{toml,yaml,json}`
//! 3. `config/{RUN_ENV}.{toml,yaml,json}`
//! 4. `EVENTIFY__SECTION__FIELD` environment variables (after `.env` is loaded)

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::path::Path;
use tracing::debug;

pub mod env_vars;
pub mod models;

pub use models::*;

/// Directory searched by [`load_config`], relative to the working directory.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Loads the configuration from [`DEFAULT_CONFIG_DIR`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(DEFAULT_CONFIG_DIR)
}

/// Loads the configuration, reading the optional files from `dir`.
pub fn load_config_from(dir: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let dir = dir.as_ref();
    let run_env = env_vars::get_run_env();
    let prefix = env_vars::get_config_prefix();

    let default_path = dir.join("default");
    let env_path = dir.join(&run_env);

    debug!(
        "Loading config: default={}, env={}, prefix={}",
        default_path.display(),
        env_path.display(),
        prefix
    );

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let config: AppConfig = builder.build()?.try_deserialize()?;
    if config.catalog.page_size == 0 {
        return Err(ConfigError::Message(
            "catalog.page_size must be at least 1".to_string(),
        ));
    }
    Ok(config)
}

/// Parses a configuration document held in memory (JSON).
pub fn config_from_json(json: &str) -> Result<AppConfig, ConfigError> {
    serde_json::from_str(json)
        .map_err(|err| ConfigError::Message(format!("failed to parse config: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment, once per process.
///
/// The file defaults to `.env` and can be redirected with `DOTENV_OVERRIDE`.
/// A missing file is not an error. Returns the path that was tried.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = std::env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_any_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path()).unwrap();

        assert_eq!(config.catalog.page_size, 6);
        assert_eq!(config.storage.keys.events, "eventify-events");
        assert_eq!(config.storage.concurrency, ConcurrencyMode::Optimistic);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_default_file_overrides_builtins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[storage]\nbackend = \"memory\"\nquota_bytes = 4096\n\n[catalog]\npage_size = 12\n",
        )
        .unwrap();

        let config = load_config_from(dir.path()).unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.quota_bytes, Some(4096));
        assert_eq!(config.catalog.page_size, 12);
        // untouched sections keep their defaults
        assert_eq!(config.storage.keys.favorites, "eventify-favorites");
        assert_eq!(
            config.catalog.placeholder_image,
            "/placeholder.svg?height=300&width=400"
        );
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[catalog]\npage_size = 0\n").unwrap();

        assert!(load_config_from(dir.path()).is_err());
    }

    #[test]
    fn test_config_from_json() {
        let config =
            config_from_json(r#"{"storage":{"backend":"unavailable","concurrency":"last_write_wins"}}"#)
                .unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Unavailable);
        assert_eq!(config.storage.concurrency, ConcurrencyMode::LastWriteWins);
        assert_eq!(config.catalog, CatalogConfig::default());

        assert!(config_from_json("{not json").is_err());
    }
}
