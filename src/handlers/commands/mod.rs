//! Command handlers module
//!
//! This module contains handlers for the bot commands. Menu buttons map to
//! the same commands through the shop's menu items.

pub mod admin;
pub mod catalog;
pub mod orders;
pub mod start;

use teloxide::{Bot, types::Message, utils::command::BotCommands};

use crate::models::MenuItem;
use crate::utils::errors::Result;
use super::ShopContext;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "Buyruqlar:")]
pub enum Command {
    #[command(description = "Asosiy menyu")]
    Start,
    #[command(description = "Mahsulotlar")]
    Products,
    #[command(description = "Mening buyurtmalarim")]
    MyOrders,
    #[command(description = "Ma'lumot")]
    Info,
    #[command(description = "Aloqa")]
    Contact,
    #[command(description = "Admin statistikasi (faqat adminlar)")]
    AdminStats,
    #[command(description = "Admin qo'shish: /add_admin <user_id>")]
    AddAdmin(String),
}

impl Command {
    /// The command behind a menu button text
    pub fn from_menu(items: &[MenuItem], text: &str) -> Option<Self> {
        let item = items.iter().find(|item| item.text == text.trim())?;
        Self::parse(&item.command, "").ok()
    }
}

/// Main command dispatcher
pub async fn handle_command(bot: Bot, msg: Message, cmd: Command, ctx: ShopContext) -> Result<()> {
    match cmd {
        Command::Start => start::handle_start(&bot, &msg, &ctx).await,
        Command::Products => catalog::handle_products(&bot, &msg, &ctx).await,
        Command::MyOrders => orders::handle_my_orders(&bot, &msg, &ctx).await,
        Command::Info => start::handle_info(&bot, &msg).await,
        Command::Contact => start::handle_contact(&bot, &msg, &ctx).await,
        Command::AdminStats => admin::handle_admin_stats(&bot, &msg, &ctx).await,
        Command::AddAdmin(argument) => admin::handle_add_admin(&bot, &msg, &argument, &ctx).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SeedProvider;

    #[test]
    fn test_snake_case_commands() {
        assert_eq!(Command::parse("/my_orders", "shopbot").unwrap(), Command::MyOrders);
        assert_eq!(Command::parse("/admin_stats@shopbot", "shopbot").unwrap(), Command::AdminStats);
        assert_eq!(Command::parse("/add_admin 1001", "shopbot").unwrap(), Command::AddAdmin("1001".to_string()));
        assert_eq!(Command::parse("/add_admin", "shopbot").unwrap(), Command::AddAdmin(String::new()));
        assert!(Command::parse("/unknown", "shopbot").is_err());
    }

    #[test]
    fn test_menu_buttons_map_to_commands() {
        let items = SeedProvider::new().default_settings().menu_items;
        assert_eq!(Command::from_menu(&items, "🛍 Mahsulotlar"), Some(Command::Products));
        assert_eq!(Command::from_menu(&items, "📋 Mening buyurtmalarim"), Some(Command::MyOrders));
        assert_eq!(Command::from_menu(&items, "☎️ Aloqa"), Some(Command::Contact));
        assert_eq!(Command::from_menu(&items, "salom"), None);
    }
}
