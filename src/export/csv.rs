//! Orders CSV export
//!
//! UTF-8 with a byte order mark so spreadsheet apps pick the right
//! encoding for the Uzbek headers and names.

use crate::models::{Order, Product};
use crate::store::lookup;
use crate::utils::helpers::format_order_timestamp;

const BOM: &str = "\u{feff}";
const HEADERS: [&str; 7] = ["ID", "Mahsulot", "Foydalanuvchi", "Telegram ID", "Sabab", "Sana", "Status"];

/// Render orders as CSV, resolving product names against `products`
pub fn orders_csv(orders: &[Order], products: &[Product]) -> String {
    let mut out = String::from(BOM);
    push_row(&mut out, HEADERS.iter().map(|h| h.to_string()));

    for order in orders {
        let created_at = order.created_at
            .map(format_order_timestamp)
            .unwrap_or_default();

        push_row(&mut out, [
            order.id.to_string(),
            lookup::product_name(products, order.product_id),
            order.user_name.clone(),
            order.telegram_id.to_string(),
            order.reason.clone(),
            created_at,
            order.status.label().to_string(),
        ]);
    }

    out
}

fn push_row(out: &mut String, fields: impl IntoIterator<Item = String>) {
    let row: Vec<String> = fields.into_iter().map(|f| escape_field(&f)).collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;
    use chrono::{TimeZone, Utc};

    fn order(id: i64, product_id: i64, reason: &str, status: OrderStatus) -> Order {
        Order {
            id,
            product_id,
            user_name: "Ali".to_string(),
            telegram_id: 42,
            reason: reason.to_string(),
            status,
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap()),
        }
    }

    #[test]
    fn test_orders_csv_layout() {
        let products = vec![Product {
            id: 1,
            name: "Telefon".to_string(),
            category_id: 1,
            price: 100.0,
            quantity: 1,
            description: String::new(),
            image: String::new(),
            created_at: None,
        }];
        let orders = vec![
            order(10, 1, "Sovg'a", OrderStatus::Pending),
            order(11, 99, "Katta, qizil", OrderStatus::Completed),
        ];

        let csv = orders_csv(&orders, &products);
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some("\u{feff}ID,Mahsulot,Foydalanuvchi,Telegram ID,Sabab,Sana,Status"));
        assert_eq!(lines.next(), Some("10,Telefon,Ali,42,Sovg'a,07.03.2024 09:05,Kutilmoqda"));
        assert_eq!(
            lines.next(),
            Some("11,Noma'lum mahsulot,Ali,42,\"Katta, qizil\",07.03.2024 09:05,Bajarildi")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }
}
