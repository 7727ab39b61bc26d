//! Callback query handlers module
//!
//! Routes the inline catalog buttons. Callback data is `action:value`.

use teloxide::{Bot, types::CallbackQuery, prelude::*};
use tracing::{debug, info, warn};

use crate::utils::errors::Result;
use super::commands::{catalog, orders};
use super::ShopContext;

/// What an inline button asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Category(i64),
    Product(i64),
    Order(i64),
    BackToMain,
    BackToCategories,
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        let (action, value) = data.split_once(':')?;
        match action {
            "category" => value.parse().ok().map(Self::Category),
            "product" => value.parse().ok().map(Self::Product),
            "order" => value.parse().ok().map(Self::Order),
            "back" => match value {
                "main" => Some(Self::BackToMain),
                "categories" => Some(Self::BackToCategories),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn data(&self) -> String {
        match self {
            Self::Category(id) => format!("category:{}", id),
            Self::Product(id) => format!("product:{}", id),
            Self::Order(id) => format!("order:{}", id),
            Self::BackToMain => "back:main".to_string(),
            Self::BackToCategories => "back:categories".to_string(),
        }
    }
}

/// Main callback query dispatcher
pub async fn handle_callback_query(bot: Bot, query: CallbackQuery, ctx: ShopContext) -> Result<()> {
    let user_id = query.from.id.0 as i64;

    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = %query.id, "Failed to answer callback query");
    }

    let Some(data) = query.data.as_deref() else {
        debug!(user_id, "Callback query without data");
        return Ok(());
    };
    let Some(action) = CallbackAction::parse(data) else {
        warn!(user_id, data = %data, "Unknown callback data");
        return Ok(());
    };
    let Some(message) = query.message.as_ref() else {
        warn!(user_id, data = %data, "Callback message is no longer available");
        return Ok(());
    };

    let chat_id = message.chat().id;
    let message_id = message.id();
    info!(user_id, action = ?action, "Callback received");

    match action {
        CallbackAction::Category(category_id) => {
            catalog::show_category(&bot, chat_id, message_id, category_id, &ctx).await
        }
        CallbackAction::Product(product_id) => {
            ctx.drafts.cancel(user_id).await;
            catalog::show_product(&bot, chat_id, message_id, product_id, &ctx).await
        }
        CallbackAction::Order(product_id) => {
            orders::start_order(&bot, chat_id, message_id, user_id, product_id, &ctx).await
        }
        CallbackAction::BackToMain => {
            bot.delete_message(chat_id, message_id).await?;
            Ok(())
        }
        CallbackAction::BackToCategories => {
            catalog::show_categories(&bot, chat_id, message_id, &ctx).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_callback_data() {
        assert_eq!(CallbackAction::parse("category:3"), Some(CallbackAction::Category(3)));
        assert_eq!(CallbackAction::parse("order:1700000000000"), Some(CallbackAction::Order(1700000000000)));
        assert_eq!(CallbackAction::parse("back:categories"), Some(CallbackAction::BackToCategories));
        assert_eq!(CallbackAction::parse("product:abc"), None);
        assert_eq!(CallbackAction::parse("back:nowhere"), None);
        assert_eq!(CallbackAction::parse("category_3"), None);
    }

    #[test]
    fn test_data_parses_back() {
        for action in [
            CallbackAction::Category(1),
            CallbackAction::Product(7),
            CallbackAction::Order(7),
            CallbackAction::BackToMain,
            CallbackAction::BackToCategories,
        ] {
            assert_eq!(CallbackAction::parse(&action.data()), Some(action));
        }
    }
}
