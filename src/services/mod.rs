//! Services module
//!
//! Outbound integrations driven by store events

pub mod notification;

pub use notification::{NotificationService, MessageTemplate, NotificationStats};

use teloxide::Bot;
use tracing::info;

use crate::config::Settings;
use crate::store::LocalStore;

/// Pick the bot token: the configured one wins over the token saved in the
/// shop settings
pub fn resolve_bot_token(settings: &Settings, store: &LocalStore) -> Option<String> {
    settings.bot.token.clone()
        .filter(|token| !token.trim().is_empty())
        .or_else(|| {
            let shop = store.get_settings();
            shop.has_bot_token().then_some(shop.bot_token)
        })
}

/// Build the shop bot when a token is available; it serves customers and
/// sends the admin notifications
pub fn shop_bot(settings: &Settings, store: &LocalStore) -> Option<Bot> {
    let Some(token) = resolve_bot_token(settings, store) else {
        info!("No bot token configured, shop bot and admin notifications disabled");
        return None;
    };

    Some(Bot::new(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::models::UpdateSettingsRequest;
    use crate::storage::MemoryStore;

    fn store() -> Arc<LocalStore> {
        let store = LocalStore::new(Arc::new(MemoryStore::new()), Settings::default().inventory);
        store.init().unwrap();
        Arc::new(store)
    }

    #[test]
    fn test_resolve_bot_token() {
        let mut settings = Settings::default();
        let store = store();
        assert_eq!(resolve_bot_token(&settings, &store), None);

        store.update_settings(UpdateSettingsRequest {
            bot_token: Some("from-store".to_string()),
            ..Default::default()
        }).unwrap();
        assert_eq!(resolve_bot_token(&settings, &store).as_deref(), Some("from-store"));

        settings.bot.token = Some("from-config".to_string());
        assert_eq!(resolve_bot_token(&settings, &store).as_deref(), Some("from-config"));
    }

    #[test]
    fn test_shop_bot_requires_token() {
        let mut settings = Settings::default();
        assert!(shop_bot(&settings, &store()).is_none());

        settings.bot.token = Some("12345:test_token".to_string());
        assert!(shop_bot(&settings, &store()).is_some());
    }
}
