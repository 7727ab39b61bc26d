//! Simple test infrastructure
//!
//! Logging setup plus stores over throwaway backends.

use std::sync::{Arc, Once};
use ShopDesk::config::{InventoryConfig, Settings, StockPolicy};
use ShopDesk::storage::{FileStore, KeyValueStore, MemoryStore};
use ShopDesk::store::LocalStore;

static INIT: Once = Once::new();

/// Initialize test environment
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

pub fn inventory(stock_policy: StockPolicy) -> InventoryConfig {
    InventoryConfig {
        stock_policy,
        ..Settings::default().inventory
    }
}

/// An initialized store over the given backend
pub fn store_over(backend: Arc<dyn KeyValueStore>, stock_policy: StockPolicy) -> Arc<LocalStore> {
    let store = LocalStore::new(backend, inventory(stock_policy));
    store.init().expect("Failed to initialize store");
    Arc::new(store)
}

pub fn memory_store() -> Arc<LocalStore> {
    store_over(Arc::new(MemoryStore::new()), StockPolicy::Backorder)
}

/// Test context owning a temporary data directory
pub struct SimpleTestContext {
    pub temp_dir: tempfile::TempDir,
}

impl SimpleTestContext {
    pub fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        init_test_env();
        Ok(Self { temp_dir: tempfile::tempdir()? })
    }

    pub fn temp_path(&self) -> &std::path::Path {
        self.temp_dir.path()
    }

    /// A file backend rooted in the temp directory; reopening sees the same data
    pub fn file_backend(&self) -> Arc<FileStore> {
        Arc::new(FileStore::new(self.temp_path().join("bot_data")).expect("Failed to open file store"))
    }

    pub fn file_store(&self) -> Arc<LocalStore> {
        store_over(self.file_backend(), StockPolicy::Backorder)
    }
}
