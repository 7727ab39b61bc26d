//! Key-value storage backends
//!
//! The local store keeps every collection as one JSON string under a fixed
//! key. This module provides the backends that hold those strings.

pub mod file;
pub mod memory;
pub mod redis;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use self::redis::RedisStore;

use std::sync::Arc;
use tracing::info;
use crate::config::{Settings, StorageBackend};
use crate::utils::errors::Result;

/// String storage addressed by key
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Open the backend selected in the settings
pub fn open_backend(settings: &Settings) -> Result<Arc<dyn KeyValueStore>> {
    let backend: Arc<dyn KeyValueStore> = match settings.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::new(&settings.storage.data_dir)?),
        StorageBackend::Redis => {
            let store = RedisStore::new(settings.redis.clone())?;
            store.test_connection()?;
            Arc::new(store)
        }
    };

    info!(backend = backend.backend_name(), "Storage backend opened");
    Ok(backend)
}
