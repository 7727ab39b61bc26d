//! Sync status view

use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::utils::helpers::format_sync_age;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub last_update: Option<DateTime<Utc>>,
    pub is_synced: bool,
    pub products_count: usize,
    pub categories_count: usize,
    pub orders_count: usize,
}

impl SyncStatus {
    /// Status line for the dashboard header
    pub fn describe(&self, now: DateTime<Utc>) -> String {
        match self.last_update {
            Some(last_update) if self.is_synced => {
                format!("{} yangilandi", format_sync_age(last_update, now))
            }
            _ => "Sinxronlanmoqda...".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_describe() {
        let now = Utc::now();
        let mut status = SyncStatus {
            last_update: None,
            is_synced: false,
            products_count: 0,
            categories_count: 4,
            orders_count: 0,
        };
        assert_eq!(status.describe(now), "Sinxronlanmoqda...");

        status.last_update = Some(now - Duration::minutes(3));
        status.is_synced = true;
        assert_eq!(status.describe(now), "3 daqiqa avval yangilandi");
    }
}
