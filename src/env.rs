//! Environment variable names read by
//! [`AdapterConfig::from_env`](crate::config::AdapterConfig::from_env).
//!
//! These are purely helpers; adapters can always be configured with an
//! explicitly built config instead.

/// Adapter name used to prefix diagnostics.
pub const LOG_REPORT_NAME_ENV: &str = "LOG_REPORT_NAME";

/// Destination identifier, e.g. `https://key@errors.example.com/42`.
pub const LOG_REPORT_DSN_ENV: &str = "LOG_REPORT_DSN";

/// Logger name passed to the reporting client.
pub const LOG_REPORT_LOGGER_ENV: &str = "LOG_REPORT_LOGGER";

/// Environment name, e.g. `production`.
pub const LOG_REPORT_ENVIRONMENT_ENV: &str = "LOG_REPORT_ENVIRONMENT";

/// Release identifier, e.g. a version or commit hash.
pub const LOG_REPORT_RELEASE_ENV: &str = "LOG_REPORT_RELEASE";

/// Tag templates: `name=url-encoded-pattern` pairs joined by `&`.
pub const LOG_REPORT_TAGS_ENV: &str = "LOG_REPORT_TAGS";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read an environment variable, treating unset and blank values alike.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
