//! Order model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    #[serde(default)]
    pub product_id: i64,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub telegram_id: i64,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, with = "super::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Localized status text used in exports and bot messages
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Kutilmoqda",
            OrderStatus::Completed => "Bajarildi",
            OrderStatus::Cancelled => "Bekor qilindi",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "⏳",
            OrderStatus::Completed => "✅",
            OrderStatus::Cancelled => "❌",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub product_id: i64,
    pub user_name: String,
    pub telegram_id: i64,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub product_id: Option<i64>,
    pub user_name: Option<String>,
    pub telegram_id: Option<i64>,
    pub reason: Option<String>,
    pub status: Option<OrderStatus>,
}

impl Order {
    /// New orders always start out pending
    pub fn from_request(id: i64, created_at: DateTime<Utc>, request: CreateOrderRequest) -> Self {
        Self {
            id,
            product_id: request.product_id,
            user_name: request.user_name,
            telegram_id: request.telegram_id,
            reason: request.reason,
            status: OrderStatus::Pending,
            created_at: Some(created_at),
        }
    }

    pub fn apply(&mut self, update: UpdateOrderRequest) {
        if let Some(product_id) = update.product_id {
            self.product_id = product_id;
        }
        if let Some(user_name) = update.user_name {
            self.user_name = user_name;
        }
        if let Some(telegram_id) = update.telegram_id {
            self.telegram_id = telegram_id;
        }
        if let Some(reason) = update.reason {
            self.reason = reason;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&OrderStatus::Cancelled).unwrap(), "\"cancelled\"");
        let status: OrderStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, OrderStatus::Completed);
        assert_eq!(status.label(), "Bajarildi");
    }

    #[test]
    fn test_missing_status_defaults_to_pending() {
        let order: Order = serde_json::from_str(
            r#"{"id":5,"productId":1,"userName":"Ali","telegramId":42,"reason":"sovg'a","createdAt":"2024-03-07T14:05:00.123456"}"#,
        ).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.created_at.is_some());
    }
}
