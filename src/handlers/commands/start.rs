//! Start, info and contact command handlers

use teloxide::{Bot, types::{Message, ParseMode}, prelude::*};
use tracing::info;

use crate::models::{MenuItem, ShopSettings};
use crate::store::SeedProvider;
use crate::utils::errors::Result;
use crate::handlers::{keyboards, ShopContext};

pub const INFO_TEXT: &str = "<b>ℹ️ Bot haqida ma'lumot</b>\n\n\
    Bu bot orqali siz:\n\
    • Mahsulotlar katalogini ko'rishingiz\n\
    • Buyurtma berishingiz\n\
    • Buyurtmalaringizni kuzatishingiz mumkin\n\n\
    Barcha ma'lumotlar sayt bilan sinxronlashadi.\n\n\
    <b>Buyruqlar:</b>\n\
    /start - Asosiy menyu\n\
    /products - Mahsulotlar\n\
    /my_orders - Mening buyurtmalarim\n\
    /info - Ma'lumot\n\
    /contact - Aloqa";

const DEFAULT_CONTACT: &str = "📞 Bog'lanish uchun:\nTelefon: +998901234567\nEmail: info@example.com";

/// Handle /start: greet and show the menu keyboard
pub async fn handle_start(bot: &Bot, msg: &Message, ctx: &ShopContext) -> Result<()> {
    let settings = ctx.with_store(|store| store.get_settings()).await?;
    let first_name = msg.from.as_ref().map(|user| user.first_name.as_str()).unwrap_or_default();
    info!(chat_id = ?msg.chat.id, "Start command");

    bot.send_message(msg.chat.id, welcome_text(&settings, first_name))
        .reply_markup(keyboards::main_menu(&menu_items(&settings)))
        .await?;
    Ok(())
}

pub async fn handle_info(bot: &Bot, msg: &Message) -> Result<()> {
    bot.send_message(msg.chat.id, INFO_TEXT)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

pub async fn handle_contact(bot: &Bot, msg: &Message, ctx: &ShopContext) -> Result<()> {
    let settings = ctx.with_store(|store| store.get_settings()).await?;
    bot.send_message(msg.chat.id, contact_text(&settings)).await?;
    Ok(())
}

/// The configured welcome message, or a greeting by first name
pub fn welcome_text(settings: &ShopSettings, first_name: &str) -> String {
    match settings.welcome_message.as_deref().map(str::trim) {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => format!(
            "Assalomu alaykum, {}! 👋\n\nMahsulotlar katalogiga xush kelibsiz!\n\n\
             Quyidagi tugmalardan birini tanlang:",
            first_name
        ),
    }
}

pub fn contact_text(settings: &ShopSettings) -> String {
    match settings.contact_info.as_deref().map(str::trim) {
        Some(contact) if !contact.is_empty() => contact.to_string(),
        _ => DEFAULT_CONTACT.to_string(),
    }
}

/// Menu items from the settings, falling back to the seeded ones
pub fn menu_items(settings: &ShopSettings) -> Vec<MenuItem> {
    if settings.menu_items.is_empty() {
        SeedProvider::new().default_settings().menu_items
    } else {
        settings.menu_items.clone()
    }
}
