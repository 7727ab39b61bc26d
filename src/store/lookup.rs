//! Display lookups across collections
//!
//! References between collections are not enforced, so every lookup has a
//! fallback label for dangling ids.

use crate::models::{Category, Product};

pub const UNKNOWN_PRODUCT: &str = "Noma'lum mahsulot";
pub const UNCATEGORIZED: &str = "Kategoriyasiz";

pub fn product_name(products: &[Product], product_id: i64) -> String {
    products
        .iter()
        .find(|p| p.id == product_id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string())
}

pub fn category_name(categories: &[Category], category_id: i64) -> String {
    categories
        .iter()
        .find(|c| c.id == category_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNCATEGORIZED.to_string())
}
