use teloxide::prelude::*;

use crate::bot::handlers::HandlerResult;
use crate::bot::texts;

/// Anything that is neither a known command nor an expected answer. Group
/// chats are left alone so the admin group stays quiet.
pub async fn handle_general_message(bot: Bot, msg: Message) -> HandlerResult {
    if !msg.chat.is_private() {
        return Ok(());
    }

    if let Some(text) = msg.text() {
        let reply = if text.starts_with('/') {
            texts::UNKNOWN_COMMAND
        } else {
            texts::IDLE_HINT
        };
        bot.send_message(msg.chat.id, reply).await?;
    }

    Ok(())
}
