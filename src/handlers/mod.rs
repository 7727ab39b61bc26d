//! Bot handlers module
//!
//! Customer side of the shop bot, organized by update type:
//! - Command handlers for bot commands
//! - Callback handlers for the inline catalog keyboards
//! - Message handlers for menu buttons and order reasons

pub mod callbacks;
pub mod commands;
pub mod keyboards;
pub mod messages;

pub use callbacks::{handle_callback_query, CallbackAction};
pub use commands::{handle_command, Command};
pub use messages::handle_message;

use std::sync::Arc;

use crate::state::OrderDrafts;
use crate::store::LocalStore;
use crate::utils::errors::Result;

pub const NOT_ADMIN: &str = "Sizda admin huquqi yo'q.";

/// Shared state handed to every handler through the dispatcher
#[derive(Debug, Clone)]
pub struct ShopContext {
    pub store: Arc<LocalStore>,
    pub drafts: OrderDrafts,
    configured_admins: Arc<Vec<i64>>,
}

impl ShopContext {
    pub fn new(store: Arc<LocalStore>, configured_admins: Vec<i64>) -> Self {
        Self {
            store,
            drafts: OrderDrafts::new(),
            configured_admins: Arc::new(configured_admins),
        }
    }

    /// Run store work off the async workers
    pub async fn with_store<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&LocalStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        LocalStore::run_blocking(&self.store, work).await
    }

    /// Configured admins and admins added with `/add_admin`
    pub async fn is_admin(&self, user_id: i64) -> Result<bool> {
        if self.configured_admins.contains(&user_id) {
            return Ok(true);
        }
        let stored = self.with_store(|store| store.get_admin_ids()).await?;
        Ok(stored.contains(&user_id))
    }
}
