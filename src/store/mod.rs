//! Local store
//!
//! Typed collections (products, categories, orders, settings) over a
//! key-value backend. Every mutation re-serializes and writes the whole
//! affected collection. Reads never fail: unreadable entries are logged and
//! read as empty.

pub mod ids;
pub mod lookup;
pub mod seed;
pub mod snapshot;

pub use ids::IdGenerator;
pub use seed::SeedProvider;
pub use snapshot::{DataSnapshot, ExportDocument, ImportPayload, EXPORT_VERSION};

use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::{InventoryConfig, StockPolicy};
use crate::models::*;
use crate::storage::KeyValueStore;
use crate::utils::errors::{ShopDeskError, Result};
use crate::utils::helpers::now_timestamp;
use crate::utils::logging::{log_corrupt_collection, log_store_mutation};

pub const PRODUCTS_KEY: &str = "products";
pub const CATEGORIES_KEY: &str = "categories";
pub const ORDERS_KEY: &str = "orders";
pub const SETTINGS_KEY: &str = "settings";
pub const ADMINS_KEY: &str = "admin_ids";

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A record kept in one of the list collections
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Storage key of the collection
    const KEY: &'static str;

    fn id(&self) -> i64;
}

impl Record for Product {
    const KEY: &'static str = PRODUCTS_KEY;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Category {
    const KEY: &'static str = CATEGORIES_KEY;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Order {
    const KEY: &'static str = ORDERS_KEY;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Side effects of store mutations that other components react to
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// A new order was stored; `product` is the product after the stock change
    OrderPlaced { order: Order, product: Option<Product> },
    /// An order left the product at or below the low stock threshold
    LowStock { product: Product, threshold: i64 },
}

/// Admin statistics over the current collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total_products: usize,
    pub available_products: usize,
    pub categories: usize,
    pub total_orders: usize,
    pub pending_orders: usize,
}

pub struct LocalStore {
    backend: Arc<dyn KeyValueStore>,
    seeds: SeedProvider,
    ids: IdGenerator,
    inventory: InventoryConfig,
    events: broadcast::Sender<StoreEvent>,
}

impl LocalStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, inventory: InventoryConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            backend,
            seeds: SeedProvider::new(),
            ids: IdGenerator::new(),
            inventory,
            events,
        }
    }

    pub fn seeds(&self) -> &SeedProvider {
        &self.seeds
    }

    pub fn inventory(&self) -> &InventoryConfig {
        &self.inventory
    }

    /// Receive order and low stock events
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Run store work on the blocking pool.
    ///
    /// Backends do synchronous I/O, so async code goes through here instead
    /// of calling the store on a runtime worker.
    pub async fn run_blocking<T, F>(store: &Arc<LocalStore>, work: F) -> Result<T>
    where
        F: FnOnce(&LocalStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(store);
        tokio::task::spawn_blocking(move || work(&store))
            .await
            .map_err(|e| ShopDeskError::Storage(format!("store task failed: {}", e)))
    }

    /// Write defaults for every collection that is not stored yet
    pub fn init(&self) -> Result<()> {
        if self.backend.get(PRODUCTS_KEY)?.is_none() {
            self.write_collection::<Product>(&[])?;
        }
        if self.backend.get(CATEGORIES_KEY)?.is_none() {
            self.write_collection(&self.seeds.default_categories(now_timestamp()))?;
        }
        if self.backend.get(ORDERS_KEY)?.is_none() {
            self.write_collection::<Order>(&[])?;
        }
        if self.backend.get(SETTINGS_KEY)?.is_none() {
            self.write_settings(&self.seeds.default_settings())?;
        }

        info!(backend = self.backend.backend_name(), "Local store initialized");
        Ok(())
    }

    // ---- products ----

    pub fn get_products(&self) -> Vec<Product> {
        self.read_collection()
    }

    pub fn get_product(&self, id: i64) -> Option<Product> {
        self.find(id)
    }

    pub fn add_product(&self, request: CreateProductRequest) -> Result<Product> {
        validate_price(request.price)?;
        self.insert(|id, created_at| Product::from_request(id, created_at, request))
    }

    pub fn update_product(&self, id: i64, update: UpdateProductRequest) -> Result<Option<Product>> {
        if let Some(price) = update.price {
            validate_price(price)?;
        }
        self.modify(id, |product: &mut Product| product.apply(update))
    }

    pub fn delete_product(&self, id: i64) -> Result<()> {
        self.remove::<Product>(id)
    }

    /// Products of a category that still have stock, as the bot lists them
    pub fn available_products_in_category(&self, category_id: i64) -> Vec<Product> {
        self.get_products()
            .into_iter()
            .filter(|p| p.category_id == category_id && p.is_available())
            .collect()
    }

    // ---- categories ----

    pub fn get_categories(&self) -> Vec<Category> {
        self.read_collection()
    }

    pub fn get_category(&self, id: i64) -> Option<Category> {
        self.find(id)
    }

    pub fn add_category(&self, request: CreateCategoryRequest) -> Result<Category> {
        self.insert(|id, created_at| Category::from_request(id, created_at, request))
    }

    pub fn update_category(&self, id: i64, update: UpdateCategoryRequest) -> Result<Option<Category>> {
        self.modify(id, |category: &mut Category| category.apply(update))
    }

    /// Delete a category unless a product still points at it
    pub fn delete_category(&self, id: i64) -> Result<()> {
        let product_count = self.get_products()
            .iter()
            .filter(|p| p.category_id == id)
            .count();

        if product_count > 0 {
            warn!(category_id = id, product_count = product_count, "Refusing to delete category in use");
            return Err(ShopDeskError::CategoryInUse { category_id: id, product_count });
        }

        self.remove::<Category>(id)
    }

    // ---- orders ----

    pub fn get_orders(&self) -> Vec<Order> {
        self.read_collection()
    }

    pub fn get_order(&self, id: i64) -> Option<Order> {
        self.find(id)
    }

    /// Store a pending order and apply the stock policy to its product
    pub fn add_order(&self, request: CreateOrderRequest) -> Result<Order> {
        let product = self.get_product(request.product_id);

        if let Some(product) = &product {
            if self.inventory.stock_policy == StockPolicy::Reject && product.quantity <= 0 {
                return Err(ShopDeskError::OutOfStock {
                    product_id: product.id,
                    quantity: product.quantity,
                });
            }
        }

        let order = self.insert(|id, created_at| Order::from_request(id, created_at, request))?;

        let product = match product {
            Some(product) => {
                let quantity = next_quantity(product.quantity, self.inventory.stock_policy);
                self.update_product(product.id, UpdateProductRequest {
                    quantity: Some(quantity),
                    ..Default::default()
                })?
            }
            None => {
                warn!(order_id = order.id, product_id = order.product_id, "Order references unknown product");
                None
            }
        };

        self.publish(StoreEvent::OrderPlaced { order: order.clone(), product: product.clone() });

        if let Some(product) = product {
            if product.quantity <= self.inventory.low_stock_threshold {
                self.publish(StoreEvent::LowStock {
                    product,
                    threshold: self.inventory.low_stock_threshold,
                });
            }
        }

        Ok(order)
    }

    pub fn update_order(&self, id: i64, update: UpdateOrderRequest) -> Result<Option<Order>> {
        self.modify(id, |order: &mut Order| order.apply(update))
    }

    pub fn delete_order(&self, id: i64) -> Result<()> {
        self.remove::<Order>(id)
    }

    /// The latest `limit` orders of one Telegram user, newest first
    pub fn orders_for_user(&self, telegram_id: i64, limit: usize) -> Vec<Order> {
        let orders: Vec<Order> = self.get_orders()
            .into_iter()
            .filter(|o| o.telegram_id == telegram_id)
            .collect();

        orders.into_iter().rev().take(limit).collect()
    }

    // ---- settings ----

    pub fn get_settings(&self) -> ShopSettings {
        match self.backend.get(SETTINGS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log_corrupt_collection(SETTINGS_KEY, &e.to_string());
                ShopSettings::default()
            }),
            Ok(None) => ShopSettings::default(),
            Err(e) => {
                log_corrupt_collection(SETTINGS_KEY, &e.to_string());
                ShopSettings::default()
            }
        }
    }

    pub fn update_settings(&self, update: UpdateSettingsRequest) -> Result<ShopSettings> {
        let mut settings = self.get_settings();
        settings.apply(update);
        self.write_settings(&settings)?;
        Ok(settings)
    }

    // ---- whole store ----

    pub fn export_data(&self) -> DataSnapshot {
        DataSnapshot {
            products: self.get_products(),
            categories: self.get_categories(),
            orders: self.get_orders(),
            settings: self.get_settings(),
        }
    }

    /// Overwrite only the collections present in the payload
    pub fn import_data(&self, payload: ImportPayload) -> Result<()> {
        let keys = payload.present_keys();

        if let Some(products) = payload.products {
            self.write_collection(&products)?;
        }
        if let Some(categories) = payload.categories {
            self.write_collection(&categories)?;
        }
        if let Some(orders) = payload.orders {
            self.write_collection(&orders)?;
        }
        if let Some(settings) = payload.settings {
            self.write_settings(&settings)?;
        }

        info!(collections = ?keys, "Data imported");
        Ok(())
    }

    /// Parse an import document completely before writing anything
    pub fn import_json(&self, document: &str) -> Result<()> {
        let payload: ImportPayload = serde_json::from_str(document)
            .map_err(|e| ShopDeskError::Import(e.to_string()))?;

        if payload.is_empty() {
            warn!("Import document contains no known collections");
        }

        self.import_data(payload)
    }

    /// Replace the three mirrored collections in one go
    pub fn replace_collections(&self, products: &[Product], categories: &[Category], orders: &[Order]) -> Result<()> {
        self.write_collection(products)?;
        self.write_collection(categories)?;
        self.write_collection(orders)?;
        Ok(())
    }

    /// Write the default categories when the stored list is empty
    pub fn seed_categories_if_empty(&self) -> Result<bool> {
        if !self.get_categories().is_empty() {
            return Ok(false);
        }
        self.write_collection(&self.seeds.default_categories(now_timestamp()))?;
        info!("Empty category list reseeded");
        Ok(true)
    }

    // ---- admins ----

    /// Admin chat ids added through the bot
    pub fn get_admin_ids(&self) -> Vec<i64> {
        match self.backend.get(ADMINS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log_corrupt_collection(ADMINS_KEY, &e.to_string());
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log_corrupt_collection(ADMINS_KEY, &e.to_string());
                Vec::new()
            }
        }
    }

    /// Remember a new admin; returns false when the id is already stored
    pub fn add_admin_id(&self, admin_id: i64) -> Result<bool> {
        let mut admin_ids = self.get_admin_ids();
        if admin_ids.contains(&admin_id) {
            return Ok(false);
        }
        admin_ids.push(admin_id);
        self.backend.set(ADMINS_KEY, &serde_json::to_string(&admin_ids)?)?;
        log_store_mutation(ADMINS_KEY, "add", Some(admin_id), admin_ids.len());
        Ok(true)
    }

    /// Drop products, categories and orders and reseed; settings are kept
    pub fn clear_all(&self) -> Result<()> {
        self.backend.remove(PRODUCTS_KEY)?;
        self.backend.remove(CATEGORIES_KEY)?;
        self.backend.remove(ORDERS_KEY)?;

        info!("Collections cleared");
        self.init()
    }

    pub fn stats(&self) -> StoreStats {
        let products = self.get_products();
        let orders = self.get_orders();

        StoreStats {
            total_products: products.len(),
            available_products: products.iter().filter(|p| p.is_available()).count(),
            categories: self.get_categories().len(),
            total_orders: orders.len(),
            pending_orders: orders.iter().filter(|o| o.status == OrderStatus::Pending).count(),
        }
    }

    // ---- internals ----

    fn read_collection<T: Record>(&self) -> Vec<T> {
        match self.backend.get(T::KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log_corrupt_collection(T::KEY, &e.to_string());
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log_corrupt_collection(T::KEY, &e.to_string());
                Vec::new()
            }
        }
    }

    fn write_collection<T: Record>(&self, items: &[T]) -> Result<()> {
        let serialized = serde_json::to_string(items)?;
        self.backend.set(T::KEY, &serialized)
    }

    fn write_settings(&self, settings: &ShopSettings) -> Result<()> {
        let serialized = serde_json::to_string(settings)?;
        self.backend.set(SETTINGS_KEY, &serialized)
    }

    fn find<T: Record>(&self, id: i64) -> Option<T> {
        self.read_collection::<T>().into_iter().find(|item| item.id() == id)
    }

    fn insert<T: Record>(&self, build: impl FnOnce(i64, DateTime<Utc>) -> T) -> Result<T> {
        let mut items = self.read_collection::<T>();
        if let Some(max_id) = items.iter().map(Record::id).max() {
            self.ids.observe(max_id);
        }

        let record = build(self.ids.next_id(), now_timestamp());
        items.push(record.clone());
        self.write_collection(&items)?;

        log_store_mutation(T::KEY, "add", Some(record.id()), items.len());
        Ok(record)
    }

    fn modify<T: Record>(&self, id: i64, change: impl FnOnce(&mut T)) -> Result<Option<T>> {
        let mut items = self.read_collection::<T>();
        let Some(item) = items.iter_mut().find(|item| item.id() == id) else {
            debug!(collection = T::KEY, entity_id = id, "Update target not found");
            return Ok(None);
        };

        change(item);
        let updated = item.clone();
        self.write_collection(&items)?;

        log_store_mutation(T::KEY, "update", Some(id), items.len());
        Ok(Some(updated))
    }

    fn remove<T: Record>(&self, id: i64) -> Result<()> {
        let items: Vec<T> = self.read_collection::<T>()
            .into_iter()
            .filter(|item| item.id() != id)
            .collect();
        self.write_collection(&items)?;

        log_store_mutation(T::KEY, "delete", Some(id), items.len());
        Ok(())
    }

    fn publish(&self, event: StoreEvent) {
        if self.events.send(event).is_err() {
            debug!("No store event subscribers");
        }
    }
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("backend", &self.backend.backend_name())
            .field("inventory", &self.inventory)
            .finish_non_exhaustive()
    }
}

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(ShopDeskError::InvalidInput(format!("Price must be a non-negative number, got {}", price)));
    }
    Ok(())
}

/// Quantity after one unit is ordered
fn next_quantity(quantity: i64, policy: StockPolicy) -> i64 {
    match policy {
        StockPolicy::Backorder | StockPolicy::Reject => quantity - 1,
        StockPolicy::Clamp => (quantity - 1).max(0),
    }
}
