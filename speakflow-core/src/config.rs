//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/speakflow/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/speakflow/` (~/.config/speakflow/)
//! - Data: `$XDG_DATA_HOME/speakflow/` (~/.local/share/speakflow/)
//! - State/Logs: `$XDG_STATE_HOME/speakflow/` (~/.local/state/speakflow/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Analysis backend configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Local document store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Progress dashboard configuration
    #[serde(default)]
    pub progress: ProgressConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analysis backend configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the analysis backend (e.g., `http://127.0.0.1:8000`)
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// HTTP request timeout in seconds. Video analysis runs synchronously on
    /// the backend, so this is generous.
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_secs: default_api_timeout(),
        }
    }
}

impl ApiConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(Error::Config("api.base_url must not be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "api.base_url must start with http:// or https://, got {}",
                url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "api.timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_api_timeout() -> u64 {
    300
}

/// Local document store configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct StoreConfig {
    /// Override for the store root (defaults to `<data dir>/documents`)
    pub root: Option<PathBuf>,
}

impl StoreConfig {
    /// Effective store root
    pub fn root_path(&self) -> PathBuf {
        self.root
            .clone()
            .unwrap_or_else(|| Config::data_dir().join("documents"))
    }
}

/// Progress dashboard configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ProgressConfig {
    /// Number of most recent presentations folded into skill progress
    #[serde(default = "default_progress_window")]
    pub window: usize,

    /// Maximum number of presentations loaded for dashboard statistics
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            window: default_progress_window(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_progress_window() -> usize {
    10
}

fn default_history_limit() -> usize {
    100
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,

    /// Least severe level echoed to stderr ("off" to disable)
    #[serde(default = "default_stderr_level")]
    pub stderr_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
            stderr_level: default_stderr_level(),
        }
    }
}

fn default_stderr_level() -> String {
    "warn".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        if config.progress.window == 0 {
            return Err(Error::Config(
                "progress.window must be greater than 0".to_string(),
            ));
        }

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/speakflow/config.toml` (~/.config/speakflow/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("speakflow").join("config.toml")
    }

    /// Returns the data directory path (for the document store)
    ///
    /// `$XDG_DATA_HOME/speakflow/` (~/.local/share/speakflow/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("speakflow")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/speakflow/` (~/.local/state/speakflow/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("speakflow")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/speakflow/speakflow.log` (~/.local/state/speakflow/speakflow.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("speakflow.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.api.timeout_secs, 300);
        assert_eq!(config.progress.window, 10);
        assert_eq!(config.progress.history_limit, 100);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.stderr_level, "warn");
        assert!(config.store.root.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[api]
base_url = "https://coach.example.com"
timeout_secs = 60

[store]
root = "/srv/speakflow"

[progress]
window = 5

[logging]
level = "debug"
stderr_level = "off"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.api.base_url, "https://coach.example.com");
        assert_eq!(config.api.timeout_secs, 60);
        assert_eq!(config.store.root_path(), PathBuf::from("/srv/speakflow"));
        assert_eq!(config.progress.window, 5);
        assert_eq!(config.progress.history_limit, 100);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.stderr_level, "off");
    }

    #[test]
    fn test_api_config_validation() {
        assert!(ApiConfig::default().validate().is_ok());

        let config = ApiConfig {
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ApiConfig {
            base_url: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ApiConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_rejects_zero_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[progress]\nwindow = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("progress.window"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
