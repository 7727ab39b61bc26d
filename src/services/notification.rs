//! Notification service implementation
//!
//! Turns store events into admin messages: a summary for every new order
//! and a warning when an order leaves a product running low. Messages are
//! built from named templates with `{placeholder}` substitution and sent
//! through teloxide to each configured admin.

use std::collections::HashMap;
use std::sync::Arc;
use teloxide::{
    Bot,
    types::{ChatId, Message, ParseMode},
    requests::Requester,
    prelude::Request,
    payloads::SendMessageSetters,
    utils::html,
};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn, error, debug};

use crate::models::{Order, Product};
use crate::store::{lookup, LocalStore, StoreEvent};
use crate::utils::errors::{ShopDeskError, Result};
use crate::utils::helpers::format_price;

pub const NEW_ORDER_TEMPLATE: &str = "new_order";
pub const LOW_STOCK_TEMPLATE: &str = "low_stock";

/// Message template structure
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    pub key: String,
    pub content: String,
    pub parse_mode: Option<ParseMode>,
}

/// Notification statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationStats {
    pub total_sent: u64,
    pub total_failed: u64,
    pub skipped: u64,
    pub sent_by_template: HashMap<String, u64>,
}

/// Sends order and stock notifications to shop admins
pub struct NotificationService {
    bot: Bot,
    admin_ids: Vec<i64>,
    store: Arc<LocalStore>,
    templates: HashMap<String, MessageTemplate>,
    stats: NotificationStats,
}

impl NotificationService {
    pub fn new(bot: Bot, admin_ids: Vec<i64>, store: Arc<LocalStore>) -> Self {
        Self {
            bot,
            admin_ids,
            store,
            templates: Self::load_default_templates(),
            stats: NotificationStats::default(),
        }
    }

    /// Consume store events until the store goes away.
    ///
    /// Lagging behind the channel drops the missed events with a warning.
    pub fn spawn_listener(mut self) -> JoinHandle<NotificationStats> {
        let mut events = self.store.subscribe();
        info!(admins = self.admin_ids.len(), "Notification listener started");

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if let Err(e) = self.handle_event(&event).await {
                            error!(error = %e, "Failed to handle store event");
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        warn!(missed, "Notification listener lagged, events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            info!(
                sent = self.stats.total_sent,
                failed = self.stats.total_failed,
                "Notification listener stopped"
            );
            self.stats
        })
    }

    /// Notify admins about one store event, honoring the shop's settings
    pub async fn handle_event(&mut self, event: &StoreEvent) -> Result<Vec<Result<Message>>> {
        let settings = LocalStore::run_blocking(&self.store, |store| store.get_settings()).await?;

        match event {
            StoreEvent::OrderPlaced { order, product } => {
                if !settings.notify_new_order {
                    debug!(order_id = order.id, "New order notifications disabled");
                    self.stats.skipped += 1;
                    return Ok(vec![]);
                }
                let parameters = self.order_parameters(order, product.as_ref());
                self.send_admin_notification(NEW_ORDER_TEMPLATE, &parameters).await
            }
            StoreEvent::LowStock { product, threshold } => {
                if !settings.notify_low_stock {
                    debug!(product_id = product.id, "Low stock notifications disabled");
                    self.stats.skipped += 1;
                    return Ok(vec![]);
                }
                let parameters = HashMap::from([
                    ("product_name".to_string(), html::escape(&product.name)),
                    ("quantity".to_string(), product.quantity.to_string()),
                    ("threshold".to_string(), threshold.to_string()),
                ]);
                self.send_admin_notification(LOW_STOCK_TEMPLATE, &parameters).await
            }
        }
    }

    /// Send one templated message to every admin.
    ///
    /// A failed send is logged and recorded; the remaining admins are still
    /// tried.
    pub async fn send_admin_notification(
        &mut self,
        template_key: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<Vec<Result<Message>>> {
        let admin_ids = self.recipients().await?;
        if admin_ids.is_empty() {
            warn!(template_key, "No admin IDs configured for admin notifications");
            return Ok(vec![]);
        }

        let text = self.format_message(template_key, parameters)?;
        let parse_mode = self.templates.get(template_key).and_then(|t| t.parse_mode);
        let mut results = Vec::with_capacity(admin_ids.len());

        for admin_id in admin_ids {
            let chat_id = ChatId(admin_id);
            let mut request = self.bot.send_message(chat_id, text.clone());
            if let Some(parse_mode) = parse_mode {
                request = request.parse_mode(parse_mode);
            }

            match request.send().await {
                Ok(message) => {
                    self.stats.total_sent += 1;
                    *self.stats.sent_by_template.entry(template_key.to_string()).or_insert(0) += 1;
                    debug!(chat_id = ?chat_id, template_key, "Admin notification sent");
                    results.push(Ok(message));
                }
                Err(e) => {
                    self.stats.total_failed += 1;
                    warn!(chat_id = ?chat_id, template_key, error = %e, "Failed to send admin notification");
                    results.push(Err(ShopDeskError::Telegram(e)));
                }
            }
        }

        Ok(results)
    }

    /// Format message using template and parameters
    pub fn format_message(&self, template_key: &str, parameters: &HashMap<String, String>) -> Result<String> {
        let template = self.templates.get(template_key)
            .ok_or_else(|| ShopDeskError::InvalidInput(format!("Template not found: {}", template_key)))?;

        let mut formatted = template.content.clone();
        for (key, value) in parameters {
            let placeholder = format!("{{{}}}", key);
            formatted = formatted.replace(&placeholder, value);
        }

        Ok(formatted)
    }

    fn order_parameters(&self, order: &Order, product: Option<&Product>) -> HashMap<String, String> {
        let (product_name, price, quantity) = match product {
            Some(product) => (
                product.name.clone(),
                format_price(product.price),
                product.quantity.to_string(),
            ),
            None => (lookup::UNKNOWN_PRODUCT.to_string(), "-".to_string(), "-".to_string()),
        };

        let reason = if order.reason.trim().is_empty() { "-" } else { order.reason.as_str() };

        HashMap::from([
            ("order_id".to_string(), order.id.to_string()),
            ("product_name".to_string(), html::escape(&product_name)),
            ("price".to_string(), price),
            ("user_name".to_string(), html::escape(&order.user_name)),
            ("telegram_id".to_string(), order.telegram_id.to_string()),
            ("reason".to_string(), html::escape(reason)),
            ("quantity".to_string(), quantity),
        ])
    }

    /// Configured admins first, then the ones added through the bot
    async fn recipients(&self) -> Result<Vec<i64>> {
        let stored = LocalStore::run_blocking(&self.store, |store| store.get_admin_ids()).await?;
        let mut admin_ids = self.admin_ids.clone();
        for admin_id in stored {
            if !admin_ids.contains(&admin_id) {
                admin_ids.push(admin_id);
            }
        }
        Ok(admin_ids)
    }

    pub fn get_stats(&self) -> &NotificationStats {
        &self.stats
    }

    fn load_default_templates() -> HashMap<String, MessageTemplate> {
        let mut templates = HashMap::new();

        templates.insert(NEW_ORDER_TEMPLATE.to_string(), MessageTemplate {
            key: NEW_ORDER_TEMPLATE.to_string(),
            content: "🔔 <b>Yangi buyurtma!</b>\n\n\
                Buyurtma ID: #{order_id}\n\
                Mahsulot: {product_name}\n\
                Narx: {price} so'm\n\
                Foydalanuvchi: {user_name}\n\
                Telegram ID: {telegram_id}\n\
                Sabab: {reason}\n\
                Qolgan miqdor: {quantity} dona"
                .to_string(),
            parse_mode: Some(ParseMode::Html),
        });

        templates.insert(LOW_STOCK_TEMPLATE.to_string(), MessageTemplate {
            key: LOW_STOCK_TEMPLATE.to_string(),
            content: "⚠️ Diqqat! <b>{product_name}</b> mahsuloti kamayib bormoqda!\n\
                Qolgan miqdor: {quantity} dona"
                .to_string(),
            parse_mode: Some(ParseMode::Html),
        });

        templates
    }
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("admin_ids", &self.admin_ids)
            .field("templates", &self.templates.keys().collect::<Vec<_>>())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
