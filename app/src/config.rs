//! Configuration management for BeansHub
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with BEANSHUB_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Hosted backend (auth + document store) project settings
    pub backend: BackendConfig,

    /// Roasting policy defaults
    pub roasting: RoastingConfig,

    /// Financial reporting estimates
    pub reporting: ReportingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// Backend project identifier
    pub project_id: String,

    /// API key issued for this app
    pub api_key: String,

    /// Auth domain for the identity provider
    pub auth_domain: String,

    /// Storage bucket for media uploads
    pub storage_bucket: String,

    /// Registered application id
    pub app_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RoastingConfig {
    /// Default yield in percent of green input when no explicit yield is
    /// supplied for a session (the assumed weight loss is the remainder)
    pub default_yield_percent: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportingConfig {
    /// Flat estimated operating cost per roasting session, in rupiah
    pub operating_cost_per_session: i64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment =
            std::env::var("BEANSHUB_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("backend.project_id", "beanshub-dev")?
            .set_default("backend.api_key", "")?
            .set_default("backend.auth_domain", "beanshub-dev.firebaseapp.com")?
            .set_default("backend.storage_bucket", "beanshub-dev.appspot.com")?
            .set_default("backend.app_id", "")?
            .set_default("roasting.default_yield_percent", 80)?
            .set_default("reporting.operating_cost_per_session", 30_000)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (BEANSHUB_ prefix)
            .add_source(
                Environment::with_prefix("BEANSHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for RoastingConfig {
    fn default() -> Self {
        Self {
            default_yield_percent: 80,
        }
    }
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            operating_cost_per_session: 30_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load_without_files() {
        let config = Config::load().expect("defaults should satisfy the schema");
        assert_eq!(config.roasting.default_yield_percent, 80);
        assert_eq!(config.reporting.operating_cost_per_session, 30_000);
    }
}
