use crate::env::{
    env_opt, env_or, LOG_REPORT_DSN_ENV, LOG_REPORT_ENVIRONMENT_ENV, LOG_REPORT_LOGGER_ENV,
    LOG_REPORT_NAME_ENV, LOG_REPORT_RELEASE_ENV, LOG_REPORT_TAGS_ENV,
};

/// Name used for an adapter when none is configured.
pub const DEFAULT_ADAPTER_NAME: &str = "report-adapter";

/// Adapter configuration, consumed once when the adapter is first used.
///
/// **Fields**
/// - `name`: prefix for the adapter's own diagnostics.
/// - `dsn`: destination identifier; empty means no destination.
/// - `logger`, `environment`, `release`: passed to the reporting client.
///   `environment` is also attached to every report as `env-extra`.
/// - `tags`: tag templates, `name=url-encoded-pattern` pairs joined by `&`.
#[derive(Clone, Debug, PartialEq)]
pub struct AdapterConfig {
    pub name: String,
    pub dsn: String,
    pub logger: Option<String>,
    pub environment: Option<String>,
    pub release: Option<String>,
    pub tags: Option<String>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_ADAPTER_NAME.to_string(),
            dsn: String::new(),
            logger: None,
            environment: None,
            release: None,
            tags: None,
        }
    }
}

impl AdapterConfig {
    pub fn new(dsn: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            ..Self::default()
        }
    }

    /// Build a config from the `LOG_REPORT_*` environment variables.
    /// Blank values count as unset.
    pub fn from_env() -> Self {
        Self {
            name: env_opt(LOG_REPORT_NAME_ENV).unwrap_or_else(|| DEFAULT_ADAPTER_NAME.to_string()),
            dsn: env_or(LOG_REPORT_DSN_ENV, ""),
            logger: env_opt(LOG_REPORT_LOGGER_ENV),
            environment: env_opt(LOG_REPORT_ENVIRONMENT_ENV),
            release: env_opt(LOG_REPORT_RELEASE_ENV),
            tags: env_opt(LOG_REPORT_TAGS_ENV),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_logger(mut self, logger: impl Into<String>) -> Self {
        self.logger = Some(logger.into());
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into()).filter(|e: &String| !e.trim().is_empty());
        self
    }

    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.release = Some(release.into()).filter(|r: &String| !r.trim().is_empty());
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let config = AdapterConfig::new("https://key@host/1")
            .with_name("billing")
            .with_logger("billing-service")
            .with_environment("prod")
            .with_release("1.4.2")
            .with_tags("region=us-east");

        assert_eq!(config.name, "billing");
        assert_eq!(config.dsn, "https://key@host/1");
        assert_eq!(config.logger.as_deref(), Some("billing-service"));
        assert_eq!(config.environment.as_deref(), Some("prod"));
        assert_eq!(config.release.as_deref(), Some("1.4.2"));
        assert_eq!(config.tags.as_deref(), Some("region=us-east"));
    }

    // the only test touching LOG_REPORT_* variables, so it cannot race others
    #[test]
    fn from_env_reads_variables_and_ignores_blanks() {
        std::env::set_var(LOG_REPORT_NAME_ENV, "checkout");
        std::env::set_var(LOG_REPORT_DSN_ENV, "https://key@errors.example.com/3");
        std::env::set_var(LOG_REPORT_LOGGER_ENV, "checkout-svc");
        std::env::set_var(LOG_REPORT_ENVIRONMENT_ENV, "   ");
        std::env::set_var(LOG_REPORT_RELEASE_ENV, "");
        std::env::set_var(LOG_REPORT_TAGS_ENV, "region=eu-west");

        let config = AdapterConfig::from_env();
        assert_eq!(config.name, "checkout");
        assert_eq!(config.dsn, "https://key@errors.example.com/3");
        assert_eq!(config.logger.as_deref(), Some("checkout-svc"));
        assert_eq!(config.environment, None);
        assert_eq!(config.release, None);
        assert_eq!(config.tags.as_deref(), Some("region=eu-west"));

        for key in [
            LOG_REPORT_NAME_ENV,
            LOG_REPORT_DSN_ENV,
            LOG_REPORT_LOGGER_ENV,
            LOG_REPORT_ENVIRONMENT_ENV,
            LOG_REPORT_RELEASE_ENV,
            LOG_REPORT_TAGS_ENV,
        ] {
            std::env::remove_var(key);
        }

        assert_eq!(AdapterConfig::from_env(), AdapterConfig::default());
    }

    #[test]
    fn blank_environment_is_unset() {
        let config = AdapterConfig::default().with_environment("  ").with_release("");
        assert_eq!(config.environment, None);
        assert_eq!(config.release, None);
        assert_eq!(config.name, DEFAULT_ADAPTER_NAME);
    }
}
