//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{ShopDeskError, Result};
use super::{Settings, StorageBackend};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_storage_config(&settings.storage)?;
    if settings.storage.backend == StorageBackend::Redis {
        validate_redis_config(&settings.redis)?;
    }
    validate_remote_config(&settings.remote)?;
    validate_inventory_config(&settings.inventory)?;
    validate_bot_config(&settings.bot)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.backend == StorageBackend::File && config.data_dir.trim().is_empty() {
        return Err(ShopDeskError::Config(
            "Data directory is required for the file backend".to_string()
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(ShopDeskError::Config(
            "Redis URL is required".to_string()
        ));
    }

    Ok(())
}

/// Validate remote mirror configuration
fn validate_remote_config(config: &super::RemoteConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(ShopDeskError::Config(
            "Remote base URL is required".to_string()
        ));
    }

    url::Url::parse(&config.base_url)
        .map_err(|e| ShopDeskError::Config(format!("Invalid remote base URL: {}", e)))?;

    if config.timeout_seconds == 0 {
        return Err(ShopDeskError::Config(
            "Remote timeout must be greater than 0".to_string()
        ));
    }

    if config.sync_interval_seconds == 0 || config.status_interval_seconds == 0 {
        return Err(ShopDeskError::Config(
            "Sync and status intervals must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate inventory configuration
fn validate_inventory_config(config: &super::InventoryConfig) -> Result<()> {
    if config.low_stock_threshold < 0 {
        return Err(ShopDeskError::Config(
            "Low stock threshold cannot be negative".to_string()
        ));
    }

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if let Some(token) = &config.token {
        if token.trim().is_empty() {
            return Err(ShopDeskError::Config(
                "Bot token must not be blank when set".to_string()
            ));
        }
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(ShopDeskError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(ShopDeskError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
