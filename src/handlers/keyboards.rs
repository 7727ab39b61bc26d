//! Reply and inline keyboards of the shop bot

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

use crate::models::{Category, MenuItem, Product};
use crate::utils::helpers::format_price;
use super::callbacks::CallbackAction;

pub const BACK: &str = "🔙 Orqaga";

/// The persistent menu under the input field, one button per menu item
pub fn main_menu(items: &[MenuItem]) -> KeyboardMarkup {
    KeyboardMarkup::new(
        items
            .iter()
            .map(|item| vec![KeyboardButton::new(item.text.clone())]),
    )
    .resize_keyboard()
}

fn button(text: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, action.data())
}

pub fn categories_keyboard(categories: &[Category]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = categories
        .iter()
        .map(|category| vec![button(category.display_label(), CallbackAction::Category(category.id))])
        .collect();
    rows.push(vec![button(BACK, CallbackAction::BackToMain)]);
    InlineKeyboardMarkup::new(rows)
}

pub fn category_products_keyboard(products: &[Product]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = products
        .iter()
        .map(|product| {
            let label = format!("{} - {} so'm", product.name, format_price(product.price));
            vec![button(label, CallbackAction::Product(product.id))]
        })
        .collect();
    rows.push(vec![button(BACK, CallbackAction::BackToCategories)]);
    InlineKeyboardMarkup::new(rows)
}

pub fn back_to_categories() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button(BACK, CallbackAction::BackToCategories)]])
}

pub fn product_keyboard(product: &Product) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button("✅ Buyurtma berish", CallbackAction::Order(product.id))],
        vec![button(BACK, CallbackAction::Category(product.category_id))],
    ])
}

/// Shown while the bot waits for the order reason; cancelling reopens the product
pub fn cancel_order(product_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button("❌ Bekor qilish", CallbackAction::Product(product_id))]])
}
