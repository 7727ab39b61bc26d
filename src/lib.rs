//! ShopDesk
//!
//! Data core of a small shop: a local CRUD store for products, categories,
//! orders and shop settings over pluggable key-value storage, a coordinator
//! that mirrors the collections from a static JSON host, a Telegram bot for
//! customers with alerts for admins, and file exports.

#![allow(non_snake_case)]

pub mod config;
pub mod export;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod store;
pub mod sync;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ShopDeskError, Result};

// Re-export main components for easy access
pub use store::{LocalStore, StoreEvent};
pub use sync::{SyncCoordinator, SyncScheduler, SyncService};
pub use services::NotificationService;
pub use handlers::ShopContext;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
