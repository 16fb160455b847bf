//! Logging utilities for Eventify.
//!
//! Call sites use the `tracing` macros directly; this module only installs
//! the subscriber and offers a couple of helpers for logging outcomes.

use eventify_config::LoggingConfig;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO.
///
/// # Examples
///
/// ```
/// use eventify_common::logging;
///
/// logging::init();
/// // a second call is harmless
/// logging::init_with_level(tracing::Level::DEBUG);
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` directives are honoured and the level applies to the
/// `eventify` crates. Output goes to stderr. If a global subscriber is
/// already installed this is a no-op.
pub fn init_with_level(level: Level) {
    let mut filter = EnvFilter::from_default_env();
    for target in ["eventify", "eventify_common", "eventify_db", "eventify_catalog", "eventify_backend"] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Initialize logging from the `[logging]` configuration section.
///
/// Unknown level names fall back to INFO with a warning.
pub fn init_from_config(config: &LoggingConfig) {
    match parse_level(&config.level) {
        Some(level) => init_with_level(level),
        None => {
            init_with_level(Level::INFO);
            warn!("Unknown log level '{}', using info", config.level);
        }
    }
}

/// Parses a level name (`trace`..`error`), case-insensitively.
pub fn parse_level(name: &str) -> Option<Level> {
    name.trim().parse::<Level>().ok()
}

/// Log a result, with different messages for success and error cases.
///
/// Returns the original result so the call can sit inside a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => error!("{}: {}", error_context, e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(Level::DEBUG));
        assert_eq!(parse_level(" WARN "), Some(Level::WARN));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_log_result_passes_value_through() {
        let ok: Result<u8, String> = Ok(3);
        assert_eq!(log_result(ok, "done", "failed"), Ok(3));

        let err: Result<u8, String> = Err("boom".to_string());
        assert_eq!(log_result(err, "done", "failed"), Err("boom".to_string()));
    }
}
