//! Configuration management for campaign-contribute
//!
//! Config file location:
//! - Linux: ~/.config/campaign-contribute/config.toml
//! - macOS: ~/Library/Application Support/org.crowdfund.campaign-contribute/config.toml
//! - Windows: %APPDATA%/crowdfund/campaign-contribute/config/config.toml
//!
//! You can override the config location by setting `CONTRIBUTE_CONFIG_PATH`.
//!
//! The target chain and the platform fee rate are not configurable: they are
//! fixed by the campaign contracts.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Contribution backend
    #[serde(default)]
    pub api: ApiConfig,

    /// Simulated wallet used by the CLI and terminal UI
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Offline backend used when no API URL is configured
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Presentation settings
    #[serde(default)]
    pub ui: UiConfig,

    /// Log filtering
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or create default, then apply env overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

            toml::from_str(&content).with_context(|| {
                format!("Failed to parse config from {}", config_path.display())
            })?
        } else {
            Self::default()
        };

        config.api.apply_env();
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, toml)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("CONTRIBUTE_CONFIG_PATH") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Create default config file if it doesn't exist
    pub fn init() -> Result<Self> {
        let config = Self::load()?;

        let config_path = Self::config_path()?;
        if !config_path.exists() {
            config.save()?;
        }

        Ok(config)
    }
}

/// Directory for the terminal UI log file.
pub fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("org", "crowdfund", "campaign-contribute")
        .context("Could not determine project directories")
}

/// Contribution backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend base URL; empty means use the simulated backend
    #[serde(default)]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Whether to verify SSL certificates
    #[serde(default = "default_true")]
    pub verify_ssl: bool,
}

impl ApiConfig {
    pub fn is_remote(&self) -> bool {
        !self.base_url.trim().is_empty()
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("CONTRIBUTE_API_URL") {
            if !url.trim().is_empty() {
                self.base_url = url.trim().to_string();
            }
        }
        if let Some(timeout) = std::env::var("CONTRIBUTE_API_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
        {
            self.timeout_seconds = timeout;
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_seconds: default_timeout(),
            verify_ssl: default_true(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

/// Simulated wallet configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Account the wallet reports once connected
    #[serde(default = "default_account")]
    pub account: String,

    /// Chain the wallet starts on after connecting
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// Simulated time for a connect request to complete
    #[serde(default = "default_wallet_delay_ms")]
    pub connect_delay_ms: u64,

    /// Simulated time for a network switch to complete
    #[serde(default = "default_wallet_delay_ms")]
    pub switch_delay_ms: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            account: default_account(),
            chain_id: default_chain_id(),
            connect_delay_ms: default_wallet_delay_ms(),
            switch_delay_ms: default_wallet_delay_ms(),
        }
    }
}

fn default_account() -> String {
    "0x52908400098527886E0F7030069857D2E4169EE7".to_string()
}

fn default_chain_id() -> u64 {
    1 // mainnet, so a fresh wallet has to switch
}

fn default_wallet_delay_ms() -> u64 {
    400
}

/// Offline backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Time a simulated contribution takes to settle
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    /// Make every simulated contribution fail
    #[serde(default)]
    pub fail: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
            fail: false,
        }
    }
}

fn default_latency_ms() -> u64 {
    1200
}

/// Presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Message shown when a contribution fails; backend detail is never displayed
    #[serde(default = "default_failure_message")]
    pub failure_message: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            failure_message: default_failure_message(),
        }
    }
}

fn default_failure_message() -> String {
    "transaction failed".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Get configuration file path for display purposes
pub fn get_config_path() -> Result<String> {
    let path = Config::config_path()?;
    Ok(path.display().to_string())
}
