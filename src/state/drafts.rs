//! Pending order drafts
//!
//! A draft is opened when a customer taps the order button and is closed
//! when their next text message (the order reason) arrives or they go back
//! to the product. Drafts are kept in memory and expire after
//! `DRAFT_TTL_MINUTES`.

use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::utils::helpers::now_timestamp;

pub const DRAFT_TTL_MINUTES: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderDraft {
    pub product_id: i64,
    pub started_at: DateTime<Utc>,
}

impl OrderDraft {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.started_at > Duration::minutes(DRAFT_TTL_MINUTES)
    }
}

/// Open drafts keyed by Telegram user id
#[derive(Debug, Clone, Default)]
pub struct OrderDrafts {
    drafts: Arc<Mutex<HashMap<i64, OrderDraft>>>,
}

impl OrderDrafts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a draft, replacing any earlier one of the same user
    pub async fn start(&self, user_id: i64, product_id: i64) {
        self.insert(user_id, OrderDraft { product_id, started_at: now_timestamp() }).await;
    }

    /// Close and return the user's draft unless it has expired
    pub async fn take(&self, user_id: i64) -> Option<OrderDraft> {
        self.take_at(user_id, now_timestamp()).await
    }

    pub async fn take_at(&self, user_id: i64, now: DateTime<Utc>) -> Option<OrderDraft> {
        let draft = self.drafts.lock().await.remove(&user_id)?;
        if draft.is_expired(now) {
            debug!(user_id, product_id = draft.product_id, "Order draft expired");
            return None;
        }
        Some(draft)
    }

    /// Drop the user's draft; returns whether one was open
    pub async fn cancel(&self, user_id: i64) -> bool {
        let cancelled = self.drafts.lock().await.remove(&user_id).is_some();
        if cancelled {
            debug!(user_id, "Order draft cancelled");
        }
        cancelled
    }

    pub async fn len(&self) -> usize {
        self.drafts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.drafts.lock().await.is_empty()
    }

    async fn insert(&self, user_id: i64, draft: OrderDraft) {
        debug!(user_id, product_id = draft.product_id, "Order draft opened");
        self.drafts.lock().await.insert(user_id, draft);
    }
}
