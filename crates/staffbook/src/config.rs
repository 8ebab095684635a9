//! Configuration management for staffbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::form::{Validator, DEFAULT_EMAIL_PATTERN, DEFAULT_PHONE_PATTERN};
use crate::logging::LogFormat;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "staffbook";

/// Default database file name.
pub const DATABASE_FILE_NAME: &str = "employee_database.db";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "STAFFBOOK_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `STAFFBOOK_`, `__` between sections)
/// 2. TOML config file at `~/.config/staffbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Form validation configuration.
    pub validation: ValidationConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/staffbook/employee_database.db`
    pub database_path: Option<PathBuf>,
}

/// Patterns the add and edit forms check input against.
///
/// Both are matched against the whole trimmed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Accepted email addresses.
    pub email_pattern: String,
    /// Accepted phone numbers.
    pub phone_pattern: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            email_pattern: DEFAULT_EMAIL_PATTERN.to_string(),
            phone_pattern: DEFAULT_PHONE_PATTERN.to_string(),
        }
    }
}

/// Logging-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Output format of the fmt layer.
    pub format: LogFormat,
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file at `config_path`, or the default path (if exists)
    /// 3. Environment variables (prefixed with `STAFFBOOK_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either validation pattern fails to compile.
    pub fn validate(&self) -> Result<()> {
        self.validator().map(|_| ())
    }

    /// Build the form validator from the configured patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if either pattern fails to compile.
    pub fn validator(&self) -> Result<Validator> {
        Validator::new(
            &self.validation.email_pattern,
            &self.validation.phone_pattern,
        )
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "staffbook_config_{}_{name}.toml",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.validation.email_pattern, DEFAULT_EMAIL_PATTERN);
        assert_eq!(config.validation.phone_pattern, DEFAULT_PHONE_PATTERN);
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_email_pattern() {
        let mut config = Config::default();
        config.validation.email_pattern = "[invalid".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("email_pattern"));
    }

    #[test]
    fn test_validate_invalid_phone_pattern() {
        let mut config = Config::default();
        config.validation.phone_pattern = "(unclosed".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("phone_pattern"));
    }

    #[test]
    fn test_validator_uses_configured_patterns() {
        let mut config = Config::default();
        config.validation.phone_pattern = r"\d{3}-\d{4}".to_string();

        let validator = config.validator().unwrap();
        assert!(validator.is_phone("555-0100"));
        assert!(!validator.is_phone("+15551234567"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        let path = config.database_path();

        assert!(path.ends_with("staffbook/employee_database.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("staffbook"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_default_data_dir() {
        let path = Config::default_data_dir();
        assert!(path.ends_with("staffbook"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());

        let config = result.unwrap();
        assert_eq!(config.validation, ValidationConfig::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = write_temp_config(
            "valid",
            r#"
[storage]
database_path = "/srv/staffbook/people.db"

[logging]
format = "full"
"#,
        );

        let config = Config::load_from(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(
            config.database_path(),
            PathBuf::from("/srv/staffbook/people.db")
        );
        assert_eq!(config.logging.format, LogFormat::Full);
        assert_eq!(config.validation, ValidationConfig::default());
    }

    #[test]
    fn test_load_rejects_invalid_pattern_in_file() {
        let path = write_temp_config(
            "bad_pattern",
            r#"
[validation]
email_pattern = "[oops"
"#,
        );

        let result = Config::load_from(Some(path.clone()));
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }

    #[test]
    fn test_load_rejects_unknown_log_format() {
        let path = write_temp_config(
            "bad_format",
            r#"
[logging]
format = "pretty-please"
"#,
        );

        let result = Config::load_from(Some(path.clone()));
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("email_pattern"));
        assert!(json.contains("\"format\":\"compact\""));
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"database_path": "/tmp/x.db"}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.database_path, Some(PathBuf::from("/tmp/x.db")));
    }
}
