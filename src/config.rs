//! Runtime configuration.
//!
//! Settings that are not part of a conversion request: log filtering and
//! banner output. Read once from the environment at start-up.

use tracing_subscriber::EnvFilter;

/// Default `tracing` filter directive.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Runtime configuration for the command-line tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `tracing` filter directive for diagnostics on stderr.
    pub log_filter: String,

    /// Print the product banner before opening the source.
    pub banner: bool,
}

impl AppConfig {
    /// Creates a new AppConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an AppConfig from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `SACD_LOG` - `tracing` filter directive (e.g. `debug`, `odio_sacd=trace`)
    /// - `SACD_NO_BANNER` - `1` or `true` suppresses the banner
    ///
    /// Falls back to defaults for unset or empty variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(filter) = lookup("SACD_LOG") {
            let filter = filter.trim();
            if !filter.is_empty() {
                config.log_filter = filter.to_string();
            }
        }

        if let Some(flag) = lookup("SACD_NO_BANNER") {
            if matches!(flag.trim().to_lowercase().as_str(), "1" | "true" | "yes") {
                config.banner = false;
            }
        }

        config
    }

    /// Builds the `EnvFilter` for the configured directive.
    ///
    /// Falls back to [`DEFAULT_LOG_FILTER`] when the directive is malformed.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails, None otherwise.
    pub fn validate(&self) -> Option<String> {
        match EnvFilter::try_new(&self.log_filter) {
            Ok(_) => None,
            Err(e) => Some(format!("invalid SACD_LOG directive {:?}: {}", self.log_filter, e)),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            banner: true,
        }
    }
}
