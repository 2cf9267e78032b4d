//! Configuration management module.
//!
//! Supports loading configuration from:
//! - TOML files (config/default.toml, config/{profile}.toml)
//! - Environment variables with `STORECODE__<SECTION>__<KEY>` pattern

mod storage;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::GeneratorConfig;
use crate::service::DEFAULT_MAX_ATTEMPTS;

pub use storage::{FileStorageConfig, StorageBackend, StorageConfig};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Store-code generator configuration.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Save/retry configuration.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Storage backend configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. `config/default.toml`
    /// 2. `config/{STORECODE_PROFILE}.toml` (if `STORECODE_PROFILE` is set)
    /// 3. Environment variables with `STORECODE__` prefix
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let profile =
            std::env::var("STORECODE_PROFILE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{profile}")).required(false))
            .add_source(env_source())
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the generator settings or retry bound are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generator
            .validate()
            .map_err(|e| ConfigError::Message(format!("generator: {}", e.0)))?;

        if self.persistence.max_attempts == 0 {
            return Err(ConfigError::Message(
                "persistence.max_attempts cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Environment source: `STORECODE__GENERATOR__SEED=42` -> `generator.seed = 42`.
///
/// Values stay strings; numeric fields are converted on deserialization, so
/// charsets made only of digits keep their leading zeros.
fn env_source() -> Environment {
    Environment::with_prefix("STORECODE")
        .prefix_separator("__")
        .separator("__")
}

/// Save/retry configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
    /// How many store codes to try before giving up on a save.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

const fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "text" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}
