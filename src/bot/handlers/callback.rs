use std::sync::Arc;
use teloxide::prelude::*;

use crate::bot::conversation::{self, Next};
use crate::bot::handlers::{BotContext, HandlerResult, OrderDialogue};
use crate::bot::texts;
use crate::utils::logging::log_database_error;

/// Service button pressed from the /start menu.
pub async fn choose_service(bot: Bot, dialogue: OrderDialogue, q: CallbackQuery) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(message) = q.message else {
        return Ok(());
    };
    let user_id = q.from.id.0 as i64;
    let data = q.data.unwrap_or_default();

    tracing::info!("Service callback '{}' from user {}", data, user_id);

    let step = conversation::choose_service(&data, q.from.username.clone(), user_id);
    let reset = step.next == Next::Reset;
    conversation::advance(&dialogue, step.next).await?;

    if reset {
        bot.send_message(message.chat.id, step.reply).await?;
    } else {
        bot.edit_message_text(message.chat.id, message.id, step.reply)
            .await?;
    }
    Ok(())
}

/// "Annuler" under a payment link. Works whatever state the dialogue is in.
pub async fn cancel_callback(
    bot: Bot,
    dialogue: OrderDialogue,
    q: CallbackQuery,
    ctx: Arc<BotContext>,
) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    let user_id = q.from.id.0 as i64;
    if let Err(e) = ctx.orders.cancel(user_id).await {
        log_database_error("delete", "pending_orders", &e.to_string(), Some(&user_id.to_string()));
    }
    conversation::reset(&dialogue).await?;

    if let Some(message) = q.message {
        bot.edit_message_text(message.chat.id, message.id, texts::CANCEL)
            .await?;
    }
    Ok(())
}

/// Buttons from a menu whose conversation is over (finished, cancelled or
/// lost on restart).
pub async fn stale_callback(bot: Bot, q: CallbackQuery) -> HandlerResult {
    tracing::debug!(
        "Stale callback '{}' from user {}",
        q.data.as_deref().unwrap_or_default(),
        q.from.id.0
    );
    bot.answer_callback_query(q.id)
        .text(texts::RESTART_HINT)
        .await?;
    Ok(())
}
