//! Ordering flow and the customer's order history
//!
//! Tapping "order" opens a draft and asks for a reason; the next text
//! message completes the order. Admin notifications are sent by the
//! notification listener when the store publishes the new order.

use teloxide::{Bot, types::{ChatId, Message, MessageId, ParseMode}, prelude::*, utils::html};
use tracing::{info, warn};

use crate::models::{CreateOrderRequest, Order, Product};
use crate::state::OrderDraft;
use crate::store::lookup;
use crate::utils::errors::{ShopDeskError, Result};
use crate::utils::helpers::format_order_timestamp;
use crate::handlers::{keyboards, ShopContext};
use super::catalog::PRODUCT_NOT_FOUND;

pub const ORDER_REASON_PROMPT: &str =
    "Buyurtma sababini yozing:\n(Masalan: O'zimga kerak, Do'stimga sovg'a, ish uchun va h.k.)";
pub const OUT_OF_STOCK: &str = "Kechirasiz, bu mahsulot tugadi.";
pub const NO_ORDERS: &str = "Sizda hali buyurtmalar yo'q.";
pub const ORDER_HISTORY_LIMIT: usize = 10;

/// Open a draft for the product and ask for the order reason
pub async fn start_order(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    user_id: i64,
    product_id: i64,
    ctx: &ShopContext,
) -> Result<()> {
    ctx.drafts.start(user_id, product_id).await;
    bot.edit_message_text(chat_id, message_id, ORDER_REASON_PROMPT)
        .reply_markup(keyboards::cancel_order(product_id))
        .await?;
    Ok(())
}

/// Complete a draft with the reason the customer typed
pub async fn handle_order_reason(
    bot: &Bot,
    msg: &Message,
    draft: OrderDraft,
    reason: &str,
    ctx: &ShopContext,
) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let request = CreateOrderRequest {
        product_id: draft.product_id,
        user_name: user.full_name(),
        telegram_id: user.id.0 as i64,
        reason: reason.to_string(),
    };

    let placed = ctx.with_store(move |store| {
        let product = orderable_product(store.get_product(request.product_id), request.product_id)?;
        let order = store.add_order(request)?;
        Ok::<_, ShopDeskError>((order, product))
    }).await?;

    match placed {
        Ok((order, product)) => {
            info!(order_id = order.id, product_id = product.id, telegram_id = order.telegram_id, "Order placed through bot");
            bot.send_message(msg.chat.id, order_confirmation_text(&order, &product.name)).await?;
        }
        Err(ShopDeskError::ProductNotFound { product_id }) => {
            warn!(product_id, "Ordered product no longer exists");
            bot.send_message(msg.chat.id, PRODUCT_NOT_FOUND).await?;
        }
        Err(ShopDeskError::OutOfStock { product_id, .. }) => {
            info!(product_id, "Order refused, product out of stock");
            bot.send_message(msg.chat.id, OUT_OF_STOCK).await?;
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Handle /my_orders: the latest orders of the user, newest first
pub async fn handle_my_orders(bot: &Bot, msg: &Message, ctx: &ShopContext) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let telegram_id = user.id.0 as i64;

    let (orders, products) = ctx.with_store(move |store| {
        (store.orders_for_user(telegram_id, ORDER_HISTORY_LIMIT), store.get_products())
    }).await?;

    if orders.is_empty() {
        bot.send_message(msg.chat.id, NO_ORDERS).await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, my_orders_text(&orders, &products))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// The bot only takes orders for products that exist and are in stock
pub fn orderable_product(product: Option<Product>, product_id: i64) -> Result<Product> {
    let product = product.ok_or(ShopDeskError::ProductNotFound { product_id })?;
    if !product.is_available() {
        return Err(ShopDeskError::OutOfStock { product_id, quantity: product.quantity });
    }
    Ok(product)
}

pub fn order_confirmation_text(order: &Order, product_name: &str) -> String {
    format!(
        "✅ Buyurtma qabul qilindi!\n\n\
         Buyurtma raqami: #{}\n\
         Mahsulot: {}\n\
         Sabab: {}\n\n\
         Buyurtmangiz tez orada ko'rib chiqiladi.",
        order.id, product_name, order.reason
    )
}

pub fn my_orders_text(orders: &[Order], products: &[Product]) -> String {
    let mut text = String::from("<b>📋 Sizning buyurtmalaringiz:</b>\n\n");
    for order in orders {
        let reason = if order.reason.trim().is_empty() { "-" } else { order.reason.as_str() };
        let created_at = order.created_at.map(format_order_timestamp).unwrap_or_else(|| "-".to_string());
        text.push_str(&format!(
            "{} <b>Buyurtma #{}</b>\nMahsulot: {}\nSabab: {}\nSana: {}\nStatus: {}\n\n",
            order.status.emoji(),
            order.id,
            html::escape(&lookup::product_name(products, order.product_id)),
            html::escape(reason),
            created_at,
            order.status.label(),
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;
    use chrono::Utc;
    use crate::models::OrderStatus;

    fn product(quantity: i64) -> Product {
        Product {
            id: 7,
            name: "Noutbuk".to_string(),
            category_id: 1,
            price: 12_500_000.0,
            quantity,
            description: String::new(),
            image: String::new(),
            created_at: None,
        }
    }

    fn order(id: i64, product_id: i64, status: OrderStatus) -> Order {
        Order {
            id,
            product_id,
            user_name: "Ali".to_string(),
            telegram_id: 42,
            reason: "Ish uchun".to_string(),
            status,
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap()),
        }
    }

    #[test]
    fn test_orderable_product() {
        assert_matches!(orderable_product(None, 7), Err(ShopDeskError::ProductNotFound { product_id: 7 }));
        assert_matches!(
            orderable_product(Some(product(0)), 7),
            Err(ShopDeskError::OutOfStock { product_id: 7, quantity: 0 })
        );
        assert_eq!(orderable_product(Some(product(2)), 7).unwrap().quantity, 2);
    }

    #[test]
    fn test_my_orders_text() {
        let orders = vec![order(2, 99, OrderStatus::Completed), order(1, 7, OrderStatus::Pending)];
        let text = my_orders_text(&orders, &[product(3)]);

        assert!(text.contains(&format!("✅ <b>Buyurtma #2</b>\nMahsulot: {}", lookup::UNKNOWN_PRODUCT)));
        assert!(text.contains("⏳ <b>Buyurtma #1</b>\nMahsulot: Noutbuk"));
        assert!(text.contains("Sana: 07.03.2024 09:05"));
        assert!(text.contains("Status: Bajarildi"));
        assert!(text.find("#2").unwrap() < text.find("#1").unwrap());
    }

    #[test]
    fn test_confirmation_text() {
        let text = order_confirmation_text(&order(5, 7, OrderStatus::Pending), "Noutbuk");
        assert!(text.contains("Buyurtma raqami: #5"));
        assert!(text.contains("Mahsulot: Noutbuk"));
        assert!(text.contains("Sabab: Ish uchun"));
    }
}
