//! Shop settings model
//!
//! Settings are a loose bag: the known keys are typed, anything else the
//! admin panel stores is carried through untouched in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSettings {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default = "default_true")]
    pub notify_new_order: bool,
    #[serde(default = "default_true")]
    pub notify_low_stock: bool,
    #[serde(default)]
    pub menu_items: Vec<MenuItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub text: String,
    pub command: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub bot_token: Option<String>,
    pub notify_new_order: Option<bool>,
    pub notify_low_stock: Option<bool>,
    pub menu_items: Option<Vec<MenuItem>>,
    pub welcome_message: Option<String>,
    pub contact_info: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ShopSettings {
    /// The empty record: what an unreadable settings entry degrades to
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            notify_new_order: true,
            notify_low_stock: true,
            menu_items: Vec::new(),
            welcome_message: None,
            contact_info: None,
            extra: Map::new(),
        }
    }
}

impl ShopSettings {
    pub fn apply(&mut self, update: UpdateSettingsRequest) {
        if let Some(bot_token) = update.bot_token {
            self.bot_token = bot_token;
        }
        if let Some(notify_new_order) = update.notify_new_order {
            self.notify_new_order = notify_new_order;
        }
        if let Some(notify_low_stock) = update.notify_low_stock {
            self.notify_low_stock = notify_low_stock;
        }
        if let Some(menu_items) = update.menu_items {
            self.menu_items = menu_items;
        }
        if let Some(welcome_message) = update.welcome_message {
            self.welcome_message = Some(welcome_message);
        }
        if let Some(contact_info) = update.contact_info {
            self.contact_info = Some(contact_info);
        }
        for (key, value) in update.extra {
            self.extra.insert(key, value);
        }
    }

    pub fn has_bot_token(&self) -> bool {
        !self.bot_token.trim().is_empty()
    }
}

impl std::fmt::Display for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.text, self.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let settings: ShopSettings = serde_json::from_value(json!({
            "botToken": "123:abc",
            "notifyNewOrder": false,
            "themeColor": "#667eea"
        })).unwrap();

        assert_eq!(settings.bot_token, "123:abc");
        assert!(!settings.notify_new_order);
        assert!(settings.notify_low_stock);
        assert_eq!(settings.extra.get("themeColor"), Some(&json!("#667eea")));

        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["themeColor"], json!("#667eea"));
    }

    #[test]
    fn test_apply_merges_extra_keys() {
        let mut settings = ShopSettings::default();
        settings.extra.insert("currency".to_string(), json!("UZS"));

        let update: UpdateSettingsRequest = serde_json::from_value(json!({
            "notifyLowStock": false,
            "footer": "Rahmat!"
        })).unwrap();
        settings.apply(update);

        assert!(!settings.notify_low_stock);
        assert!(settings.notify_new_order);
        assert_eq!(settings.extra.get("currency"), Some(&json!("UZS")));
        assert_eq!(settings.extra.get("footer"), Some(&json!("Rahmat!")));
    }
}
