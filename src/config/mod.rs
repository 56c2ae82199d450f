//! Configuration loading and validation.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Club-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubConfig {
    /// Shared admin PIN (4 to 8 digits)
    #[serde(default = "default_pin")]
    pub pin: String,

    /// Timezone used to bucket matches into calendar days
    #[serde(default = "default_timezone")]
    pub timezone: Tz,

    /// How many recent match days the attendance view shows
    #[serde(default = "default_attendance_window")]
    pub attendance_window: usize,
}

fn default_pin() -> String {
    "121212".to_string()
}

fn default_timezone() -> Tz {
    chrono_tz::Asia::Seoul
}

fn default_attendance_window() -> usize {
    10
}

impl Default for ClubConfig {
    fn default() -> Self {
        Self {
            pin: default_pin(),
            timezone: default_timezone(),
            attendance_window: default_attendance_window(),
        }
    }
}

/// Commentary backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentaryConfig {
    /// Backend type: "ollama" or "anthropic"
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Base URL for the local backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_backend() -> String {
    "ollama".to_string()
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            base_url: default_base_url(),
            model: default_model(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub club: ClubConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub commentary: CommentaryConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            club: ClubConfig::default(),
            server: ServerConfig::default(),
            commentary: CommentaryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pin = &self.club.pin;
        if pin.len() < 4 || pin.len() > 8 || !pin.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::ValidationError(
                "club PIN must be 4 to 8 digits".to_string(),
            ));
        }

        if self.club.attendance_window == 0 {
            return Err(ConfigError::ValidationError(
                "attendance window must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.commentary.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Commentary timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.club.timezone, chrono_tz::Asia::Seoul);
        assert_eq!(config.club.attendance_window, 10);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.commentary.backend, "ollama");
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_pin() {
        let mut config = AppConfig::default();
        config.club.pin = "12".to_string();
        assert!(config.validate().is_err());

        config.club.pin = "12a456".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_window() {
        let mut config = AppConfig::default();
        config.club.attendance_window = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timezone_parses_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [club]
            pin = "4321"
            timezone = "Europe/London"
            "#,
        )
        .unwrap();

        assert_eq!(config.club.pin, "4321");
        assert_eq!(config.club.timezone, chrono_tz::Europe::London);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.club.timezone, parsed.club.timezone);
    }
}
