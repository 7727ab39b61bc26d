//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the ShopDesk application.

use tracing::{info, warn, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{ShopDeskError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer and must live as long as the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "shopdesk.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(file_layer)
        .try_init()
        .map_err(|e| ShopDeskError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a persisted store mutation
pub fn log_store_mutation(collection: &str, action: &str, entity_id: Option<i64>, size: usize) {
    debug!(
        collection = collection,
        action = action,
        entity_id = entity_id,
        collection_size = size,
        "Store mutation persisted"
    );
}

/// Log the result of one sync cycle
pub fn log_sync_cycle(outcome: &str, products: usize, categories: usize, orders: usize) {
    info!(
        outcome = outcome,
        products = products,
        categories = categories,
        orders = orders,
        "Sync cycle finished"
    );
}

/// Log a failed remote fetch
pub fn log_fetch_failure(resource: &str, error: &str) {
    warn!(
        resource = resource,
        error = error,
        "Remote fetch failed"
    );
}

/// Log an unreadable stored collection
pub fn log_corrupt_collection(key: &str, error: &str) {
    warn!(
        key = key,
        error = error,
        "Stored collection is unreadable, treating it as empty"
    );
}
