//! Catalog browsing: categories, the products of a category and product
//! details. `/products` sends the category list; the inline buttons then
//! edit that message in place.

use teloxide::{Bot, types::{ChatId, Message, MessageId, ParseMode}, prelude::*, utils::html};
use tracing::debug;

use crate::models::{Category, Product};
use crate::store::lookup;
use crate::utils::errors::Result;
use crate::utils::helpers::format_price;
use crate::handlers::{keyboards, ShopContext};

pub const CATEGORIES_PROMPT: &str = "📦 <b>Kategoriyalar:</b>\n\nQaysi kategoriyani ko'rmoqchisiz?";
pub const NO_CATEGORIES: &str = "Hozircha kategoriyalar mavjud emas.";
pub const CATEGORY_NOT_FOUND: &str = "Kategoriya topilmadi.";
pub const PRODUCT_NOT_FOUND: &str = "Mahsulot topilmadi.";

/// Handle /products
pub async fn handle_products(bot: &Bot, msg: &Message, ctx: &ShopContext) -> Result<()> {
    let categories = ctx.with_store(|store| store.get_categories()).await?;

    if categories.is_empty() {
        bot.send_message(msg.chat.id, NO_CATEGORIES).await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, CATEGORIES_PROMPT)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboards::categories_keyboard(&categories))
        .await?;
    Ok(())
}

pub async fn show_categories(bot: &Bot, chat_id: ChatId, message_id: MessageId, ctx: &ShopContext) -> Result<()> {
    let categories = ctx.with_store(|store| store.get_categories()).await?;

    if categories.is_empty() {
        bot.edit_message_text(chat_id, message_id, NO_CATEGORIES).await?;
        return Ok(());
    }

    bot.edit_message_text(chat_id, message_id, CATEGORIES_PROMPT)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboards::categories_keyboard(&categories))
        .await?;
    Ok(())
}

/// List the products of a category that are still in stock
pub async fn show_category(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    category_id: i64,
    ctx: &ShopContext,
) -> Result<()> {
    let (category, products) = ctx.with_store(move |store| {
        (store.get_category(category_id), store.available_products_in_category(category_id))
    }).await?;

    let Some(category) = category else {
        debug!(category_id, "Category not found");
        bot.edit_message_text(chat_id, message_id, CATEGORY_NOT_FOUND).await?;
        return Ok(());
    };

    let markup = if products.is_empty() {
        keyboards::back_to_categories()
    } else {
        keyboards::category_products_keyboard(&products)
    };

    bot.edit_message_text(chat_id, message_id, category_text(&category, !products.is_empty()))
        .parse_mode(ParseMode::Html)
        .reply_markup(markup)
        .await?;
    Ok(())
}

pub async fn show_product(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    product_id: i64,
    ctx: &ShopContext,
) -> Result<()> {
    let (product, categories) = ctx.with_store(move |store| {
        (store.get_product(product_id), store.get_categories())
    }).await?;

    let Some(product) = product else {
        debug!(product_id, "Product not found");
        bot.edit_message_text(chat_id, message_id, PRODUCT_NOT_FOUND).await?;
        return Ok(());
    };

    let category_name = lookup::category_name(&categories, product.category_id);
    bot.edit_message_text(chat_id, message_id, product_text(&product, &category_name))
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboards::product_keyboard(&product))
        .await?;
    Ok(())
}

pub fn category_text(category: &Category, has_products: bool) -> String {
    let name = html::escape(&category.name);
    if !has_products {
        return format!("<b>{}</b> kategoriyasida hozircha mahsulotlar yo'q.", name);
    }
    format!("<b>{}</b>\n\n{}\n\nMahsulotlar:", name, html::escape(&category.description))
}

pub fn product_text(product: &Product, category_name: &str) -> String {
    let mut text = format!(
        "<b>{}</b>\n\n📂 Kategoriya: {}\n💰 Narxi: {} so'm\n📦 Mavjud: {} dona\n",
        html::escape(&product.name),
        html::escape(category_name),
        format_price(product.price),
        product.quantity,
    );
    if !product.description.trim().is_empty() {
        text.push_str(&format!("\n📝 Tavsif: {}\n", html::escape(&product.description)));
    }
    text
}
