//! Helper functions and utilities
//!
//! This module contains common formatting helpers shared by exports,
//! notifications and the sync status view.

use chrono::{DateTime, Duration, SubsecRound, Utc};

/// Format a price with space separated thousands, dropping the fraction
pub fn format_price(price: f64) -> String {
    let whole = price.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    if whole < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a timestamp the way order lists show it
pub fn format_order_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%d.%m.%Y %H:%M").to_string()
}

/// Describe how long ago the last sync happened
pub fn format_sync_age(last_update: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(last_update);

    if diff < Duration::minutes(1) {
        "Hozir".to_string()
    } else {
        format!("{} daqiqa avval", diff.num_minutes())
    }
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Current wall clock time in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current time at the millisecond precision timestamps are stored with
pub fn now_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "0");
        assert_eq!(format_price(999.0), "999");
        assert_eq!(format_price(1000.0), "1 000");
        assert_eq!(format_price(1234567.89), "1 234 567");
        assert_eq!(format_price(-25000.0), "-25 000");
    }

    #[test]
    fn test_format_order_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(format_order_timestamp(ts), "07.03.2024 09:05");
    }

    #[test]
    fn test_format_sync_age() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(format_sync_age(now - Duration::seconds(20), now), "Hozir");
        assert_eq!(format_sync_age(now - Duration::seconds(150), now), "2 daqiqa avval");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("Elektronika mahsulotlari", 10), "Elektro...");
    }
}
