//! Remote sync module
//!
//! Mirrors products, categories and orders from a static JSON host into
//! the local store and keeps the dashboard status fresh.

pub mod coordinator;
pub mod remote;
pub mod scheduler;
pub mod status;

pub use coordinator::{SyncCoordinator, SyncEvent, SyncOutcome};
pub use remote::{FetchOutcome, RemoteSource};
pub use scheduler::SyncScheduler;
pub use status::SyncStatus;

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::RemoteConfig;
use crate::store::LocalStore;
use crate::utils::errors::Result;

/// A running sync pipeline: the coordinator plus its background loops
#[derive(Debug)]
pub struct SyncService {
    coordinator: Arc<SyncCoordinator>,
    scheduler: SyncScheduler,
}

impl SyncService {
    /// Build the coordinator, run the initial load and sync, then start
    /// the periodic loops
    pub async fn start(store: Arc<LocalStore>, config: &RemoteConfig) -> Result<Self> {
        let remote = RemoteSource::new(config)?;
        info!(base_url = %remote.base_url(), "Starting sync service");

        let coordinator = Arc::new(SyncCoordinator::new(store, remote, config.on_fetch_failure));
        let outcome = coordinator.initialize().await;
        info!(outcome = ?outcome, "Initial sync finished");

        let scheduler = SyncScheduler::start(
            Arc::clone(&coordinator),
            Duration::from_secs(config.sync_interval_seconds),
            Duration::from_secs(config.status_interval_seconds),
        ).await;

        Ok(Self { coordinator, scheduler })
    }

    pub fn coordinator(&self) -> &Arc<SyncCoordinator> {
        &self.coordinator
    }

    pub fn scheduler(&self) -> &SyncScheduler {
        &self.scheduler
    }

    /// Request an immediate sync
    pub fn trigger(&self) -> bool {
        self.scheduler.trigger()
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }
}
