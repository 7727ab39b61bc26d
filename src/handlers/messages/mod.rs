//! Message handlers module
//!
//! Plain text in private chats is either the reason for an open order
//! draft or one of the menu buttons.

use teloxide::{Bot, types::Message, prelude::*};
use tracing::debug;

use crate::utils::errors::Result;
use crate::handlers::commands::{handle_command, orders, start, Command};
use crate::handlers::ShopContext;

pub const UNKNOWN_INPUT: &str = "Noto'g'ri buyruq. /start buyrug'ini bosing.";

/// Handle incoming text messages
pub async fn handle_message(bot: Bot, msg: Message, ctx: ShopContext) -> Result<()> {
    if !msg.chat.id.is_user() {
        debug!(chat_id = ?msg.chat.id, "Ignoring message outside private chat");
        return Ok(());
    }
    let (Some(user), Some(text)) = (msg.from.as_ref(), msg.text()) else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;

    if let Some(draft) = ctx.drafts.take(user_id).await {
        return orders::handle_order_reason(&bot, &msg, draft, text, &ctx).await;
    }

    let settings = ctx.with_store(|store| store.get_settings()).await?;
    match Command::from_menu(&start::menu_items(&settings), text) {
        Some(command) => handle_command(bot, msg, command, ctx).await,
        None => {
            debug!(user_id, "Unrecognized text message");
            bot.send_message(msg.chat.id, UNKNOWN_INPUT).await?;
            Ok(())
        }
    }
}
