//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub storage: StorageConfig,
    pub redis: RedisConfig,
    pub remote: RemoteConfig,
    pub inventory: InventoryConfig,
    pub bot: BotConfig,
    pub logging: LoggingConfig,
}

/// Which key-value backend holds the collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Memory,
    File,
    Redis,
}

/// Local storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: String,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
}

/// What a sync cycle does when one of the remote fetches fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailurePolicy {
    /// Abandon the whole cycle and keep local state
    Skip,
    /// Use an empty collection in place of the failed one
    SubstituteEmpty,
}

/// Remote mirror configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub sync_interval_seconds: u64,
    pub status_interval_seconds: u64,
    pub on_fetch_failure: FetchFailurePolicy,
}

/// How placing an order changes the product quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Always decrement, quantity may go negative
    Backorder,
    /// Decrement but never below zero
    Clamp,
    /// Refuse orders for products with no stock left
    Reject,
}

/// Inventory rules
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InventoryConfig {
    pub stock_policy: StockPolicy,
    pub low_stock_threshold: i64,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: Option<String>,
    pub admin_ids: Vec<i64>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load settings layered over the defaults from the named file
    pub fn load_from(file_name: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name(file_name).required(false))
            .add_source(
                config::Environment::with_prefix("SHOPDESK")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("bot.admin_ids")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::ShopDeskError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::File,
                data_dir: "bot_data".to_string(),
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "shopdesk:".to_string(),
            },
            remote: RemoteConfig {
                base_url: "https://raw.githubusercontent.com/Mirfayziev/mahsulot-tizimi/main/bot_data"
                    .to_string(),
                timeout_seconds: 15,
                sync_interval_seconds: 30,
                status_interval_seconds: 5,
                on_fetch_failure: FetchFailurePolicy::Skip,
            },
            inventory: InventoryConfig {
                stock_policy: StockPolicy::Backorder,
                low_stock_threshold: 5,
            },
            bot: BotConfig {
                token: None,
                admin_ids: vec![],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
            },
        }
    }
}
