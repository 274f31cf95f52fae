//! Configuration loading and validation for reachable-monitor

use reachable::{CheckerConfig, Target};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use validator::{Validate, ValidationError};

const CONFIG_FILE_NAME: &str = "reachable-monitor.yaml";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Hosts to watch, `host` or `host:port`
    #[validate(length(min = 1), custom = "validate_hosts")]
    pub hosts: Vec<String>,

    #[serde(default)]
    pub checker: CheckerSettings,

    /// Optional status line driven by the process-wide checker
    #[serde(default)]
    pub report: Option<ReportSettings>,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Poll settings applied as process-wide defaults
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CheckerSettings {
    #[serde(with = "humantime_serde")]
    #[validate(custom = "validate_interval")]
    pub interval: Duration,

    #[serde(with = "humantime_serde")]
    #[validate(custom = "validate_timeout")]
    pub timeout: Duration,
}

/// Periodic status report settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReportSettings {
    #[validate(custom = "validate_host")]
    pub host: String,

    #[serde(default = "default_report_interval", with = "humantime_serde")]
    #[validate(custom = "validate_interval")]
    pub interval: Duration,
}

/// Logging settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

// Default implementations

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts: vec!["google.com".to_string()],
            checker: CheckerSettings::default(),
            report: None,
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for CheckerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: reachable::defaults::DEFAULT_TIMEOUT,
        }
    }
}

fn default_report_interval() -> Duration {
    Duration::from_secs(1)
}

// Custom validators

fn validate_host(host: &str) -> Result<(), ValidationError> {
    host.parse::<Target>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("host_invalid"))
}

fn validate_hosts(hosts: &[String]) -> Result<(), ValidationError> {
    hosts.iter().try_for_each(|h| validate_host(h))
}

fn validate_interval(interval: &Duration) -> Result<(), ValidationError> {
    let millis = interval.as_millis();
    if millis < 10 || millis > 3_600_000 {
        return Err(ValidationError::new("interval_out_of_range"));
    }
    Ok(())
}

fn validate_timeout(timeout: &Duration) -> Result<(), ValidationError> {
    let millis = timeout.as_millis();
    if millis < 1 || millis > 60_000 {
        return Err(ValidationError::new("timeout_out_of_range"));
    }
    Ok(())
}

// Configuration loading implementation

impl Config {
    /// Validate the whole tree, including nested sections.
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()?;
        self.checker.validate()?;
        if let Some(report) = &self.report {
            report.validate()?;
        }
        Ok(())
    }

    /// Load configuration from an explicit path, or the default search paths
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }

        match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/reachable").join(CONFIG_FILE_NAME)];

        if let Some(home_path) = Self::home_config_path() {
            paths.push(home_path);
        }

        paths.push(PathBuf::from(".").join(CONFIG_FILE_NAME));

        paths.into_iter().find(|p| p.is_file())
    }

    /// Get home directory config path
    fn home_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/reachable").join(CONFIG_FILE_NAME))
    }

    /// Per-host checker configurations.
    ///
    /// Interval and timeout are left unset so the process-wide defaults
    /// (seeded from `checker`) apply.
    pub fn checker_configs(&self) -> common::Result<Vec<CheckerConfig>> {
        self.hosts
            .iter()
            .map(|h| h.parse().map(CheckerConfig::new))
            .collect()
    }

    /// Default log level when RUST_LOG is unset
    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or("info")
    }
}
