//! Sync coordinator
//!
//! Reconciles the local store with the remote mirror: the three mirrored
//! collections are fetched together and compared with what the store holds
//! right now. When any of them differs, all three are written back and one
//! update event is announced. Local edits made between cycles are therefore
//! overwritten by the next cycle that finds the remote different.

use std::sync::Arc;
use chrono::{DateTime, Utc};
use futures::future::join3;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{error, info, warn};

use crate::config::FetchFailurePolicy;
use crate::models::{Category, Order, Product, ShopSettings};
use crate::store::LocalStore;
use crate::utils::errors::{ShopDeskError, Result};
use crate::utils::helpers::now_timestamp;
use crate::utils::logging::log_sync_cycle;
use super::remote::{RemoteSource, CATEGORIES_FILE, ORDERS_FILE, PRODUCTS_FILE};
use super::status::SyncStatus;

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// What one sync cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Remote data differed; all three collections were replaced
    Updated,
    /// Remote data matched the store
    Unchanged,
    /// A fetch failed and the cycle was abandoned
    Skipped { failed: Vec<&'static str> },
    /// Remote data differed but writing it to the store failed; the next
    /// cycle tries again
    PersistFailed { error: String },
}

/// Notification for dashboard refreshes and toasts
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Updated {
        at: DateTime<Utc>,
        products: usize,
        categories: usize,
        orders: usize,
    },
}

/// The mirrored collections as the store holds them
struct Collections {
    products: Vec<Product>,
    categories: Vec<Category>,
    orders: Vec<Order>,
}

pub struct SyncCoordinator {
    store: Arc<LocalStore>,
    remote: RemoteSource,
    failure_policy: FetchFailurePolicy,
    last_update: RwLock<Option<DateTime<Utc>>>,
    cycle_lock: Mutex<()>,
    events: broadcast::Sender<SyncEvent>,
}

impl SyncCoordinator {
    pub fn new(store: Arc<LocalStore>, remote: RemoteSource, failure_policy: FetchFailurePolicy) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            remote,
            failure_policy,
            last_update: RwLock::new(None),
            cycle_lock: Mutex::new(()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    pub fn store(&self) -> &Arc<LocalStore> {
        &self.store
    }

    /// Load local data, then run the first sync.
    ///
    /// The coordinator is ready once this returns.
    pub async fn initialize(&self) -> SyncOutcome {
        self.load_from_local_store().await;
        self.sync_from_remote().await
    }

    /// Check the local collections before the first cycle; an empty
    /// category list is reseeded
    pub async fn load_from_local_store(&self) {
        let loaded = LocalStore::run_blocking(&self.store, |store| {
            let reseeded = store.seed_categories_if_empty()?;
            Ok::<_, ShopDeskError>((reseeded, store.stats()))
        }).await;

        match loaded {
            Ok(Ok((reseeded, stats))) => info!(
                products = stats.total_products,
                categories = stats.categories,
                orders = stats.total_orders,
                reseeded_categories = reseeded,
                "Local store loaded"
            ),
            Ok(Err(e)) | Err(e) => error!(error = %e, "Failed to load local store"),
        }
    }

    /// Run one fetch-compare-replace cycle
    pub async fn sync_from_remote(&self) -> SyncOutcome {
        let _cycle = self.cycle_lock.lock().await;

        let (products, categories, orders) = join3(
            self.remote.fetch_collection::<Vec<Product>>(PRODUCTS_FILE),
            self.remote.fetch_collection::<Vec<Category>>(CATEGORIES_FILE),
            self.remote.fetch_collection::<Vec<Order>>(ORDERS_FILE),
        ).await;

        let failed: Vec<&'static str> = [
            (PRODUCTS_FILE, products.is_failed()),
            (CATEGORIES_FILE, categories.is_failed()),
            (ORDERS_FILE, orders.is_failed()),
        ]
        .into_iter()
        .filter_map(|(name, failed)| failed.then_some(name))
        .collect();

        if !failed.is_empty() && self.failure_policy == FetchFailurePolicy::Skip {
            warn!(failed = ?failed, "Skipping sync cycle, keeping local data");
            return SyncOutcome::Skipped { failed };
        }

        let remote = Collections {
            products: products.unwrap_or_empty(),
            categories: categories.unwrap_or_empty(),
            orders: orders.unwrap_or_empty(),
        };

        let local = match self.read_collections().await {
            Ok(local) => local,
            Err(e) => {
                error!(error = %e, "Failed to read local collections");
                return SyncOutcome::PersistFailed { error: e.to_string() };
            }
        };

        let has_changes = local.products != remote.products
            || local.categories != remote.categories
            || local.orders != remote.orders;

        if !has_changes {
            log_sync_cycle("unchanged", remote.products.len(), remote.categories.len(), remote.orders.len());
            return SyncOutcome::Unchanged;
        }

        if !failed.is_empty() {
            warn!(failed = ?failed, "Replacing collections with empty fallbacks for failed fetches");
        }

        let (products_count, categories_count, orders_count) =
            (remote.products.len(), remote.categories.len(), remote.orders.len());

        let written = LocalStore::run_blocking(&self.store, move |store| {
            store.replace_collections(&remote.products, &remote.categories, &remote.orders)
        }).await;

        if let Err(e) = written.and_then(|result| result) {
            error!(error = %e, "Failed to persist synced collections, retrying next cycle");
            return SyncOutcome::PersistFailed { error: e.to_string() };
        }

        let at = now_timestamp();
        *self.last_update.write().await = Some(at);
        log_sync_cycle("updated", products_count, categories_count, orders_count);

        let event = SyncEvent::Updated {
            at,
            products: products_count,
            categories: categories_count,
            orders: orders_count,
        };
        if self.events.send(event).is_err() {
            info!("Collections updated from remote, no listeners attached");
        }

        SyncOutcome::Updated
    }

    /// Counts come from the store, so local edits show up immediately
    pub async fn status(&self) -> SyncStatus {
        let last_update = *self.last_update.read().await;
        let (products_count, categories_count, orders_count) = match self.read_collections().await {
            Ok(local) => (local.products.len(), local.categories.len(), local.orders.len()),
            Err(e) => {
                warn!(error = %e, "Failed to read local collections for status");
                (0, 0, 0)
            }
        };

        SyncStatus {
            last_update,
            is_synced: last_update.is_some(),
            products_count,
            categories_count,
            orders_count,
        }
    }

    pub async fn products(&self) -> Vec<Product> {
        LocalStore::run_blocking(&self.store, |store| store.get_products()).await.unwrap_or_default()
    }

    pub async fn categories(&self) -> Vec<Category> {
        LocalStore::run_blocking(&self.store, |store| store.get_categories()).await.unwrap_or_default()
    }

    pub async fn orders(&self) -> Vec<Order> {
        LocalStore::run_blocking(&self.store, |store| store.get_orders()).await.unwrap_or_default()
    }

    pub async fn settings(&self) -> ShopSettings {
        LocalStore::run_blocking(&self.store, |store| store.get_settings()).await.unwrap_or_default()
    }

    async fn read_collections(&self) -> Result<Collections> {
        LocalStore::run_blocking(&self.store, |store| Collections {
            products: store.get_products(),
            categories: store.get_categories(),
            orders: store.get_orders(),
        }).await
    }
}

impl std::fmt::Debug for SyncCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncCoordinator")
            .field("remote", &self.remote.base_url().as_str())
            .field("failure_policy", &self.failure_policy)
            .finish_non_exhaustive()
    }
}
