//! Data models module
//!
//! This module contains all data structures used throughout the application.
//! Field names follow the camelCase layout of the mirrored JSON files.

pub mod product;
pub mod category;
pub mod order;
pub mod settings;

// Re-export commonly used models
pub use product::{Product, CreateProductRequest, UpdateProductRequest};
pub use category::{Category, CreateCategoryRequest, UpdateCategoryRequest};
pub use order::{Order, OrderStatus, CreateOrderRequest, UpdateOrderRequest};
pub use settings::{ShopSettings, MenuItem, UpdateSettingsRequest};

/// Serde adapter for `createdAt` values.
///
/// Accepts RFC 3339 as well as naive ISO timestamps (read as UTC) and writes
/// RFC 3339 with millisecond precision.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(text) if text.trim().is_empty() => Ok(None),
            Some(text) => parse(&text).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!("unrecognised timestamp: {}", text))
            }),
        }
    }

    pub fn parse(text: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::timestamp;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parses_browser_and_bot_timestamps() {
        let browser = timestamp::parse("2024-03-07T09:05:00.123Z").unwrap();
        assert_eq!(browser.hour(), 9);

        let bot = timestamp::parse("2024-03-07T14:05:00.123456").unwrap();
        assert_eq!(bot.day(), 7);
        assert_eq!(bot.hour(), 14);

        assert!(timestamp::parse("yesterday").is_none());
    }
}
