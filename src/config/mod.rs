//! Configuration management
//!
//! This module provides YAML-based configuration management with support for:
//! - Environment variable overrides
//! - Multiple configuration file locations
//! - Default values for all settings
//! - Optional live data sources (Azure or an offline snapshot)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::utils::validation::{parse_subscription_list, validate_subscription_id};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Azure Resource Graph and Microsoft Graph access
    #[serde(default)]
    pub azure: Option<AzureConfig>,
    /// Offline snapshot directory (takes precedence over `azure`)
    #[serde(default)]
    pub snapshot: Option<SnapshotConfig>,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub rates: RatesConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins (empty allows any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5060
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Azure access configuration
///
/// Tokens are acquired outside this service and passed in as-is.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureConfig {
    /// Azure Resource Manager base URL
    #[serde(default = "default_management_url")]
    pub management_url: String,
    /// Microsoft Graph base URL
    #[serde(default = "default_graph_url")]
    pub graph_url: String,
    /// Bearer token for Resource Manager / Resource Graph
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
    /// Bearer token for Microsoft Graph (license SKUs)
    #[serde(default, skip_serializing)]
    pub graph_token: Option<String>,
    /// Subscriptions to scope queries to (discovered when empty)
    #[serde(default)]
    pub subscriptions: Vec<String>,
    /// Timeout in seconds (supports both timeout_secs and timeout field names)
    #[serde(default = "default_timeout", alias = "timeout")]
    pub timeout_secs: u64,
}

fn default_management_url() -> String {
    "https://management.azure.com".to_string()
}

fn default_graph_url() -> String {
    "https://graph.microsoft.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            management_url: default_management_url(),
            graph_url: default_graph_url(),
            access_token: None,
            graph_token: None,
            subscriptions: Vec::new(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Offline snapshot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnapshotConfig {
    /// Directory holding machines.json, extensions.json, assignments.json, ...
    pub dir: PathBuf,
}

/// Static fallback catalog configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_enabled")]
    pub enabled: bool,
    /// Catalog file (bundled catalog when unset)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_catalog_enabled() -> bool {
    true
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            enabled: default_catalog_enabled(),
            path: None,
        }
    }
}

/// Unit rate overrides
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RatesConfig {
    /// Rate per capability, keyed by benefit id (`arc-001`) or rule id
    ///
    /// Values stay raw so a bad entry is warned about when the rate table is
    /// built instead of failing the whole configuration.
    #[serde(default)]
    pub overrides: BTreeMap<String, serde_json::Value>,
    /// JSON override file applied after `overrides`
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Benefit view cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Enable/disable caching
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// TTL for the computed benefit view in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl() -> u64 {
    300 // 5 minutes
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    /// Log output target (console or file)
    #[serde(default = "default_log_target")]
    pub target: LogTarget,
    /// Directory for log files (used when target is "file")
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Log file name prefix (default: "arc-benefits")
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,
    /// Enable daily log rotation
    #[serde(default = "default_log_rotation")]
    pub daily_rotation: bool,
    /// Maximum number of log files to keep (0 = unlimited)
    #[serde(default = "default_max_log_files")]
    pub max_log_files: usize,
}

/// Log output target
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// Log to console (stdout/stderr) - default for development
    #[default]
    Console,
    /// Log to file with optional rotation - recommended for production
    File,
    /// Log to both console and file
    Both,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_log_target() -> LogTarget {
    LogTarget::Console
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("/var/log/arc-benefits")
}

fn default_log_prefix() -> String {
    "arc-benefits".to_string()
}

fn default_log_rotation() -> bool {
    true
}

fn default_max_log_files() -> usize {
    30 // Keep 30 days of logs by default
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            target: default_log_target(),
            log_dir: default_log_dir(),
            log_prefix: default_log_prefix(),
            daily_rotation: default_log_rotation(),
            max_log_files: default_max_log_files(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            azure: None,
            snapshot: None,
            catalog: CatalogConfig::default(),
            rates: RatesConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values
    /// 2. Configuration file (YAML)
    /// 3. Environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        // Check for config path override from environment
        let config_path = std::env::var("ARC_BENEFITS_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(Self::find_config_file);

        let mut config = match config_path {
            Some(ref path) if path.exists() => {
                eprintln!("[CONFIG] Loading configuration from: {:?}", path);
                Self::from_file(path)?
            }
            Some(ref path) => {
                eprintln!("[CONFIG] Config file not found: {:?}, using defaults", path);
                AppConfig::default()
            }
            None => {
                eprintln!("[CONFIG] No config file found, using defaults");
                AppConfig::default()
            }
        };

        // Apply environment variable overrides
        config.apply_env_overrides();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Parse a configuration file without applying overrides
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_norway::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Find the configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            // Current directory
            PathBuf::from("config.yaml"),
            PathBuf::from("config/config.yaml"),
            // System config directory
            PathBuf::from("/etc/arc-benefits/config.yaml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("arc-benefits/config.yaml"))
                .unwrap_or_default(),
        ];

        paths.into_iter().find(|p| p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(host) = var("ARC_BENEFITS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("ARC_BENEFITS_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Logging overrides
        if let Some(level) = var("RUST_LOG") {
            self.logging.level = level;
        }
        if let Some(format) = var("ARC_BENEFITS_LOG_FORMAT") {
            self.logging.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "compact" => LogFormat::Compact,
                _ => LogFormat::Pretty,
            };
        }
        if let Some(target) = var("ARC_BENEFITS_LOG_TARGET") {
            self.logging.target = match target.to_lowercase().as_str() {
                "file" => LogTarget::File,
                "both" => LogTarget::Both,
                _ => LogTarget::Console,
            };
        }
        if let Some(dir) = var("ARC_BENEFITS_LOG_DIR") {
            self.logging.log_dir = PathBuf::from(dir);
        }

        // Azure overrides
        if let Some(token) = var("AZURE_ACCESS_TOKEN") {
            let azure = self.azure.get_or_insert_with(AzureConfig::default);
            azure.access_token = Some(token);
        }
        if let Some(token) = var("AZURE_GRAPH_TOKEN") {
            let azure = self.azure.get_or_insert_with(AzureConfig::default);
            azure.graph_token = Some(token);
        }
        if let Some(subscriptions) = var("AZURE_SUBSCRIPTIONS") {
            let azure = self.azure.get_or_insert_with(AzureConfig::default);
            azure.subscriptions = parse_subscription_list(&subscriptions);
        }

        // Snapshot, catalog and rates overrides
        if let Some(dir) = var("ARC_BENEFITS_SNAPSHOT_DIR") {
            self.snapshot = Some(SnapshotConfig {
                dir: PathBuf::from(dir),
            });
        }
        if let Some(path) = var("ARC_BENEFITS_CATALOG") {
            self.catalog.path = Some(PathBuf::from(path));
        }
        if let Some(path) = var("ARC_BENEFITS_RATES_FILE") {
            self.rates.file = Some(PathBuf::from(path));
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        // Validate port
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if let Some(ref azure) = self.azure {
            if azure.timeout_secs == 0 {
                anyhow::bail!("Azure timeout must be greater than 0");
            }
            if let Some(bad) = azure
                .subscriptions
                .iter()
                .find(|s| !validate_subscription_id(s))
            {
                anyhow::bail!("Invalid subscription id: {}", bad);
            }
        }

        if self.cache.enabled && self.cache.ttl_secs == 0 {
            tracing::warn!("Cache enabled with a zero TTL; every request recomputes");
        }

        Ok(())
    }
}
