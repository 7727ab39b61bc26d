//! Backend wrapper that records writes and can refuse them

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use ShopDesk::storage::{KeyValueStore, MemoryStore};
use ShopDesk::{Result, ShopDeskError};

#[derive(Debug, Default)]
pub struct CountingStore {
    inner: MemoryStore,
    sets: AtomicUsize,
    written_keys: Mutex<Vec<String>>,
    fail_writes: AtomicBool,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn written_keys(&self) -> Vec<String> {
        self.written_keys.lock().unwrap().clone()
    }

    /// Make every following `set` fail until switched back off
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.sets.store(0, Ordering::SeqCst);
        self.written_keys.lock().unwrap().clear();
    }
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ShopDeskError::Storage(format!("write to {} refused", key)));
        }
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.written_keys.lock().unwrap().push(key.to_string());
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }

    fn backend_name(&self) -> &'static str {
        "counting"
    }
}
