//! Admin command handlers

use teloxide::{Bot, types::{Message, ParseMode}, prelude::*};
use tracing::{info, warn};

use crate::store::StoreStats;
use crate::utils::errors::Result;
use crate::handlers::{ShopContext, NOT_ADMIN};

pub const ADD_ADMIN_USAGE: &str = "Foydalanish: /add_admin <user_id>";
pub const INVALID_ADMIN_ID: &str = "Noto'g'ri user_id formati.";
pub const ALREADY_ADMIN: &str = "Bu foydalanuvchi allaqachon admin.";

/// Parsed argument of /add_admin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminArgument {
    Missing,
    Invalid,
    Id(i64),
}

impl AdminArgument {
    pub fn parse(argument: &str) -> Self {
        match argument.split_whitespace().next() {
            None => Self::Missing,
            Some(raw) => raw.parse().map(Self::Id).unwrap_or(Self::Invalid),
        }
    }
}

/// Handle /admin_stats
pub async fn handle_admin_stats(bot: &Bot, msg: &Message, ctx: &ShopContext) -> Result<()> {
    if !sender_is_admin(msg, ctx).await? {
        bot.send_message(msg.chat.id, NOT_ADMIN).await?;
        return Ok(());
    }

    let stats = ctx.with_store(|store| store.stats()).await?;
    bot.send_message(msg.chat.id, stats_text(&stats))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Handle /add_admin <user_id>
pub async fn handle_add_admin(bot: &Bot, msg: &Message, argument: &str, ctx: &ShopContext) -> Result<()> {
    if !sender_is_admin(msg, ctx).await? {
        warn!(chat_id = ?msg.chat.id, "Non-admin tried to add an admin");
        bot.send_message(msg.chat.id, NOT_ADMIN).await?;
        return Ok(());
    }

    let admin_id = match AdminArgument::parse(argument) {
        AdminArgument::Missing => {
            bot.send_message(msg.chat.id, ADD_ADMIN_USAGE).await?;
            return Ok(());
        }
        AdminArgument::Invalid => {
            bot.send_message(msg.chat.id, INVALID_ADMIN_ID).await?;
            return Ok(());
        }
        AdminArgument::Id(admin_id) => admin_id,
    };

    let added = !ctx.is_admin(admin_id).await?
        && ctx.with_store(move |store| store.add_admin_id(admin_id)).await??;

    let reply = if added {
        info!(admin_id, "Admin added");
        format!("✅ Admin qo'shildi: {}", admin_id)
    } else {
        ALREADY_ADMIN.to_string()
    };
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn sender_is_admin(msg: &Message, ctx: &ShopContext) -> Result<bool> {
    match msg.from.as_ref() {
        Some(user) => ctx.is_admin(user.id.0 as i64).await,
        None => Ok(false),
    }
}

pub fn stats_text(stats: &StoreStats) -> String {
    format!(
        "<b>📊 Admin statistikasi</b>\n\n\
         📦 Jami mahsulotlar: {}\n\
         ✅ Mavjud mahsulotlar: {}\n\
         📂 Kategoriyalar: {}\n\
         🛒 Jami buyurtmalar: {}\n\
         ⏳ Kutilayotgan buyurtmalar: {}\n",
        stats.total_products,
        stats.available_products,
        stats.categories,
        stats.total_orders,
        stats.pending_orders,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_argument() {
        assert_eq!(AdminArgument::parse(""), AdminArgument::Missing);
        assert_eq!(AdminArgument::parse("   "), AdminArgument::Missing);
        assert_eq!(AdminArgument::parse("abc"), AdminArgument::Invalid);
        assert_eq!(AdminArgument::parse(" 1001 "), AdminArgument::Id(1001));
    }

    #[test]
    fn test_stats_text() {
        let text = stats_text(&StoreStats {
            total_products: 3,
            available_products: 2,
            categories: 4,
            total_orders: 5,
            pending_orders: 1,
        });
        assert!(text.contains("📦 Jami mahsulotlar: 3"));
        assert!(text.contains("✅ Mavjud mahsulotlar: 2"));
        assert!(text.contains("⏳ Kutilayotgan buyurtmalar: 1"));
    }
}
