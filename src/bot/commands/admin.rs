use teloxide::prelude::*;

use crate::bot::handlers::{sender_id, sender_name, BotContext, HandlerResult};
use crate::bot::texts;
use crate::utils::logging::{log_command_error, log_command_start, log_command_success, log_validation_error};
use crate::utils::validation::parse_user_id_arg;

/// `/sendtutorial <telegram_user_id>`: manual delivery, e.g. for a payment
/// made through a static link whose webhook never reached the bot.
pub async fn handle_send_tutorial(bot: Bot, msg: Message, args: String, ctx: &BotContext) -> HandlerResult {
    let user_id = sender_id(&msg);
    let user = sender_name(&msg);
    let chat_id = msg.chat.id;
    log_command_start("sendtutorial", &user, user_id, chat_id.0, Some(&args));

    if !ctx.config.is_admin(user_id) {
        bot.send_message(chat_id, texts::ADMIN_ONLY).await?;
        return Ok(());
    }

    let target = match parse_user_id_arg(&args) {
        Ok(target) => target,
        Err(e) => {
            log_validation_error("sendtutorial", "telegram_user_id", &args, &e.to_string(), user_id);
            bot.send_message(chat_id, texts::SEND_TUTORIAL_USAGE).await?;
            return Ok(());
        }
    };

    let Some(link) = ctx.config.tutorial_link.as_deref() else {
        bot.send_message(chat_id, texts::TUTORIAL_NOT_CONFIGURED).await?;
        return Ok(());
    };

    match bot.send_message(ChatId(target), texts::tutorial(link)).await {
        Ok(_) => {
            bot.send_message(chat_id, texts::TUTORIAL_SENT).await?;
            log_command_success("sendtutorial", &user, user_id, chat_id.0, Some(&target.to_string()));
        }
        Err(e) => {
            log_command_error("sendtutorial", &user, user_id, chat_id.0, &e.to_string());
            bot.send_message(chat_id, texts::SEND_ERROR).await?;
        }
    }
    Ok(())
}
