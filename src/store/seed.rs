//! Default data for a fresh store
//!
//! Both the local store and the sync coordinator seed from here so the
//! defaults cannot drift apart.

use chrono::{DateTime, Utc};
use crate::models::{Category, MenuItem, ShopSettings};

#[derive(Debug, Clone, Default)]
pub struct SeedProvider;

impl SeedProvider {
    pub fn new() -> Self {
        Self
    }

    /// The four starter categories, stamped with `created_at`
    pub fn default_categories(&self, created_at: DateTime<Utc>) -> Vec<Category> {
        [
            (1, "Elektronika", "Elektronik mahsulotlar", "💻"),
            (2, "Kiyimlar", "Kiyim-kechak", "👕"),
            (3, "Oziq-ovqat", "Oziq-ovqat mahsulotlari", "🍕"),
            (4, "Kitoblar", "Kitoblar va nashrlar", "📚"),
        ]
        .into_iter()
        .map(|(id, name, description, icon)| Category {
            id,
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            created_at: Some(created_at),
        })
        .collect()
    }

    /// Settings written on first start
    pub fn default_settings(&self) -> ShopSettings {
        ShopSettings {
            bot_token: String::new(),
            notify_new_order: true,
            notify_low_stock: true,
            menu_items: vec![
                MenuItem { id: 1, text: "🛍 Mahsulotlar".to_string(), command: "/products".to_string() },
                MenuItem { id: 2, text: "📋 Mening buyurtmalarim".to_string(), command: "/my_orders".to_string() },
                MenuItem { id: 3, text: "ℹ️ Ma'lumot".to_string(), command: "/info".to_string() },
                MenuItem { id: 4, text: "☎️ Aloqa".to_string(), command: "/contact".to_string() },
            ],
            welcome_message: Some(
                "Xush kelibsiz! Mahsulotlarimizni ko'rish uchun /products buyrug'ini yozing.".to_string(),
            ),
            contact_info: Some("Bog'lanish: +998901234567".to_string()),
            extra: Default::default(),
        }
    }
}
