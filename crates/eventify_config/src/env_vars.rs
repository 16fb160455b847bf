//! Environment variable naming for the Eventify configuration.
//!
//! Configuration values can be overridden with variables of the form
//! `EVENTIFY__STORAGE__DATA_DIR`. The prefix can itself be changed through
//! the `PREFIX` variable.

use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "EVENTIFY";

/// The separator between the prefix and the nested keys
pub const CONFIG_SEPARATOR: &str = "__";

/// Name of the variable selecting the environment-specific config file
pub const RUN_ENV_VAR: &str = "RUN_ENV";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Get the run environment (`debug` unless `RUN_ENV` says otherwise)
pub fn get_run_env() -> String {
    env::var(RUN_ENV_VAR)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "debug".to_string())
}

/// Convert a configuration path to an environment variable name
///
/// # Arguments
///
/// * `path` - The configuration path (e.g., "storage.data_dir")
///
/// # Returns
///
/// The environment variable name (e.g., "EVENTIFY__STORAGE__DATA_DIR")
pub fn config_path_to_env_var(path: &str) -> String {
    config_path_to_env_var_with_prefix(&get_config_prefix(), path)
}

/// Same as [`config_path_to_env_var`] with an explicit prefix.
pub fn config_path_to_env_var_with_prefix(prefix: &str, path: &str) -> String {
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Get an environment variable for a configuration path
///
/// # Returns
///
/// The environment variable value, if set and non-empty
pub fn get_config_env_var(path: &str) -> Option<String> {
    let env_var = config_path_to_env_var(path);
    env::var(&env_var).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_to_env_var_with_prefix() {
        assert_eq!(
            config_path_to_env_var_with_prefix("EVENTIFY", "storage.data_dir"),
            "EVENTIFY__STORAGE__DATA_DIR"
        );
        assert_eq!(
            config_path_to_env_var_with_prefix("eventify", "catalog.page_size"),
            "EVENTIFY__CATALOG__PAGE_SIZE"
        );
    }

    #[test]
    fn test_nested_keys_keep_their_underscores() {
        assert_eq!(
            config_path_to_env_var_with_prefix("APP", "storage.keys.registrations"),
            "APP__STORAGE__KEYS__REGISTRATIONS"
        );
    }
}
