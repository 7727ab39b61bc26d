//! Whole-store snapshots for export and import

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use crate::models::{Category, Order, Product, ShopSettings};

/// Version tag written into export documents
pub const EXPORT_VERSION: &str = "1.0";

/// All four collections at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSnapshot {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub orders: Vec<Order>,
    pub settings: ShopSettings,
}

/// An import document; only the keys that are present get written
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<Order>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<ShopSettings>,
}

impl ImportPayload {
    pub fn is_empty(&self) -> bool {
        self.products.is_none()
            && self.categories.is_none()
            && self.orders.is_none()
            && self.settings.is_none()
    }

    /// Names of the collections this payload will overwrite
    pub fn present_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.products.is_some() {
            keys.push("products");
        }
        if self.categories.is_some() {
            keys.push("categories");
        }
        if self.orders.is_some() {
            keys.push("orders");
        }
        if self.settings.is_some() {
            keys.push("settings");
        }
        keys
    }
}

impl From<DataSnapshot> for ImportPayload {
    fn from(snapshot: DataSnapshot) -> Self {
        Self {
            products: Some(snapshot.products),
            categories: Some(snapshot.categories),
            orders: Some(snapshot.orders),
            settings: Some(snapshot.settings),
        }
    }
}

/// The downloadable export file: a snapshot plus date and version tag
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    #[serde(flatten)]
    pub data: DataSnapshot,
    pub export_date: String,
    pub version: String,
}

impl ExportDocument {
    pub fn new(data: DataSnapshot, exported_at: DateTime<Utc>) -> Self {
        Self {
            data,
            export_date: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            version: EXPORT_VERSION.to_string(),
        }
    }
}
