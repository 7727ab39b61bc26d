//! File exports and imports
//!
//! Everything the admin panel used to offer as downloads, written to disk:
//! the full export document, the per-collection files the bot reads from
//! the remote mirror, the orders CSV and timestamped backups. Store reads
//! and writes go through `LocalStore::run_blocking`.

pub mod csv;

pub use self::csv::orders_csv;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::store::{ExportDocument, LocalStore};
use crate::sync::remote::{CATEGORIES_FILE, ORDERS_FILE, PRODUCTS_FILE};
use crate::utils::errors::{Result, ShopDeskError};

/// File name of the export document inside a backup directory
pub const BACKUP_FILE: &str = "shopdesk_data.json";

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, body).await?;
    Ok(())
}

/// Write the full export document to `path`
pub async fn write_export_document(store: &Arc<LocalStore>, path: &Path, at: DateTime<Utc>) -> Result<ExportDocument> {
    let data = LocalStore::run_blocking(store, |store| store.export_data()).await?;
    let document = ExportDocument::new(data, at);
    write_json(path, &document).await?;

    info!(path = %path.display(), "Export document written");
    Ok(document)
}

/// Write the three mirrored collections as separate files into `dir`,
/// ready to be committed to the remote source
pub async fn write_bot_sync_files(store: &Arc<LocalStore>, dir: &Path) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir).await?;
    let data = LocalStore::run_blocking(store, |store| store.export_data()).await?;

    let products = dir.join(PRODUCTS_FILE);
    let categories = dir.join(CATEGORIES_FILE);
    let orders = dir.join(ORDERS_FILE);

    write_json(&products, &data.products).await?;
    write_json(&categories, &data.categories).await?;
    write_json(&orders, &data.orders).await?;

    info!(dir = %dir.display(), "Bot sync files written");
    Ok(vec![products, categories, orders])
}

/// Write the orders CSV to `path`
pub async fn write_orders_csv(store: &Arc<LocalStore>, path: &Path) -> Result<usize> {
    let (orders, products) = LocalStore::run_blocking(store, |store| (store.get_orders(), store.get_products())).await?;
    let body = orders_csv(&orders, &products);
    tokio::fs::write(path, body).await?;

    info!(path = %path.display(), orders = orders.len(), "Orders CSV written");
    Ok(orders.len())
}

/// Snapshot the store into a fresh `backup_YYYYmmdd_HHMMSS` directory
/// under `root`
pub async fn create_backup(store: &Arc<LocalStore>, root: &Path, at: DateTime<Utc>) -> Result<PathBuf> {
    let dir = root.join(format!("backup_{}", at.format("%Y%m%d_%H%M%S")));
    if tokio::fs::try_exists(&dir).await? {
        return Err(ShopDeskError::InvalidInput(format!("Backup directory already exists: {}", dir.display())));
    }
    tokio::fs::create_dir_all(&dir).await?;

    write_export_document(store, &dir.join(BACKUP_FILE), at).await?;

    info!(dir = %dir.display(), "Backup created");
    Ok(dir)
}

/// Merge an export or partial import document from disk into the store
pub async fn import_file(store: &Arc<LocalStore>, path: &Path) -> Result<()> {
    let document = tokio::fs::read_to_string(path).await?;
    LocalStore::run_blocking(store, move |store| store.import_json(&document)).await??;

    info!(path = %path.display(), "Import file applied");
    Ok(())
}
