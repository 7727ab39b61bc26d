//! Shop bot integration tests
//!
//! Feed Telegram updates to the handlers and watch the replies on a mocked
//! Telegram API.

mod helpers;

use serde_json::json;
use serial_test::serial;
use teloxide::types::Message;

use helpers::*;
use ShopDesk::handlers::commands::orders::OUT_OF_STOCK;
use ShopDesk::handlers::{handle_command, handle_message, Command, ShopContext, NOT_ADMIN};
use ShopDesk::models::CreateProductRequest;

const CUSTOMER: i64 = 42;
const ADMIN: i64 = 7;

fn private_message(user_id: i64, text: &str) -> Message {
    serde_json::from_value(json!({
        "message_id": 10,
        "date": 1640995200,
        "chat": { "id": user_id, "first_name": "Ali", "type": "private" },
        "from": { "id": user_id, "is_bot": false, "first_name": "Ali", "last_name": "Valiyev" },
        "text": text
    }))
    .expect("valid message json")
}

fn texts_to(sent: &[serde_json::Value], chat_id: i64) -> Vec<String> {
    sent.iter()
        .filter(|m| m["chat_id"].as_i64() == Some(chat_id))
        .filter_map(|m| m["text"].as_str().map(str::to_string))
        .collect()
}

#[tokio::test]
#[serial]
async fn test_order_reason_completes_open_draft() {
    init_test_env();
    let mock = TelegramMockServer::new().await;
    mock.mock_send_message().await;

    let store = memory_store();
    let product = store.add_product(CreateProductRequest {
        name: "Noutbuk".to_string(),
        category_id: 1,
        price: 12_500_000.0,
        quantity: 3,
        ..Default::default()
    }).unwrap();

    let ctx = ShopContext::new(store.clone(), vec![ADMIN]);
    ctx.drafts.start(CUSTOMER, product.id).await;

    handle_message(mock.bot(), private_message(CUSTOMER, "Ish uchun"), ctx.clone())
        .await
        .unwrap();

    let orders = store.get_orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].telegram_id, CUSTOMER);
    assert_eq!(orders[0].user_name, "Ali Valiyev");
    assert_eq!(orders[0].reason, "Ish uchun");
    assert_eq!(store.get_product(product.id).unwrap().quantity, 2);
    assert!(ctx.drafts.is_empty().await);

    let replies = texts_to(&mock.sent_messages().await, CUSTOMER);
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains(&format!("Buyurtma raqami: #{}", orders[0].id)));
    assert!(replies[0].contains("Mahsulot: Noutbuk"));
}

#[tokio::test]
#[serial]
async fn test_sold_out_product_is_not_ordered() {
    init_test_env();
    let mock = TelegramMockServer::new().await;
    mock.mock_send_message().await;

    let store = memory_store();
    let product = store.add_product(CreateProductRequest {
        name: "Kitob".to_string(),
        category_id: 4,
        price: 30_000.0,
        quantity: 0,
        ..Default::default()
    }).unwrap();

    let ctx = ShopContext::new(store.clone(), vec![]);
    ctx.drafts.start(CUSTOMER, product.id).await;

    handle_message(mock.bot(), private_message(CUSTOMER, "Sovg'a"), ctx)
        .await
        .unwrap();

    assert!(store.get_orders().is_empty());
    assert_eq!(texts_to(&mock.sent_messages().await, CUSTOMER), vec![OUT_OF_STOCK.to_string()]);
}

#[tokio::test]
#[serial]
async fn test_add_admin_requires_admin_rights() {
    init_test_env();
    let mock = TelegramMockServer::new().await;
    mock.mock_send_message().await;

    let store = memory_store();
    let ctx = ShopContext::new(store.clone(), vec![ADMIN]);

    let command = Command::AddAdmin("1001".to_string());
    handle_command(mock.bot(), private_message(CUSTOMER, "/add_admin 1001"), command.clone(), ctx.clone())
        .await
        .unwrap();
    assert!(store.get_admin_ids().is_empty());

    handle_command(mock.bot(), private_message(ADMIN, "/add_admin 1001"), command, ctx.clone())
        .await
        .unwrap();
    assert_eq!(store.get_admin_ids(), vec![1001]);
    assert!(ctx.is_admin(1001).await.unwrap());

    let sent = mock.sent_messages().await;
    assert_eq!(texts_to(&sent, CUSTOMER), vec![NOT_ADMIN.to_string()]);
    assert_eq!(texts_to(&sent, ADMIN), vec!["✅ Admin qo'shildi: 1001".to_string()]);
}
