//! Sync scheduler
//!
//! Owns the two background loops: the periodic remote sync (which also
//! serves manual refresh requests) and the status refresh. Both stop when
//! the scheduler is stopped or dropped.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::coordinator::SyncCoordinator;
use super::status::SyncStatus;

#[derive(Debug)]
pub struct SyncScheduler {
    trigger_tx: mpsc::Sender<()>,
    status_rx: watch::Receiver<SyncStatus>,
    sync_handle: Option<JoinHandle<()>>,
    status_handle: Option<JoinHandle<()>>,
}

impl SyncScheduler {
    /// Spawn the sync and status loops.
    ///
    /// The first periodic sync runs one full `sync_interval` after start;
    /// the initial sync belongs to `SyncCoordinator::initialize`.
    pub async fn start(
        coordinator: Arc<SyncCoordinator>,
        sync_interval: Duration,
        status_interval: Duration,
    ) -> Self {
        let (trigger_tx, mut trigger_rx) = mpsc::channel::<()>(1);
        let (status_tx, status_rx) = watch::channel(coordinator.status().await);

        let sync_coordinator = Arc::clone(&coordinator);
        let sync_handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sync_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        debug!("Periodic sync due");
                    }
                    request = trigger_rx.recv() => {
                        if request.is_none() {
                            break;
                        }
                        info!("Manual sync requested");
                    }
                }

                let outcome = sync_coordinator.sync_from_remote().await;
                debug!(outcome = ?outcome, "Scheduled sync finished");
            }
        });

        let status_handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(status_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let status = coordinator.status().await;
                status_tx.send_replace(status);
            }
        });

        info!(
            sync_interval = ?sync_interval,
            status_interval = ?status_interval,
            "Sync scheduler started"
        );

        Self {
            trigger_tx,
            status_rx,
            sync_handle: Some(sync_handle),
            status_handle: Some(status_handle),
        }
    }

    /// Ask for a sync now. Returns false if one is already queued or the
    /// scheduler has stopped.
    pub fn trigger(&self) -> bool {
        match self.trigger_tx.try_send(()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(())) => {
                debug!("Manual sync already queued");
                false
            }
            Err(mpsc::error::TrySendError::Closed(())) => {
                warn!("Manual sync requested after scheduler stopped");
                false
            }
        }
    }

    /// Latest status, refreshed on the status interval
    pub fn status_updates(&self) -> watch::Receiver<SyncStatus> {
        self.status_rx.clone()
    }

    pub fn is_running(&self) -> bool {
        self.sync_handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop both loops
    pub fn stop(&mut self) {
        let mut stopped = false;
        if let Some(handle) = self.sync_handle.take() {
            handle.abort();
            stopped = true;
        }
        if let Some(handle) = self.status_handle.take() {
            handle.abort();
            stopped = true;
        }
        if stopped {
            info!("Sync scheduler stopped");
        }
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
