use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::{admin, Command};
use crate::bot::handlers::{sender_id, sender_name, BotContext, HandlerResult, OrderDialogue};
use crate::bot::{conversation, keyboards, texts};
use crate::database::models::Service;
use crate::services::orders::Submission;
use crate::utils::logging::{log_command_error, log_command_start, log_command_success, log_database_error};

pub async fn command_handler(
    bot: Bot,
    dialogue: OrderDialogue,
    msg: Message,
    cmd: Command,
    ctx: Arc<BotContext>,
) -> HandlerResult {
    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string()).await?;
        }
        Command::Start => {
            handle_start(bot, dialogue, msg, &ctx).await?;
        }
        Command::Cancel => {
            handle_cancel(bot, dialogue, msg, &ctx).await?;
        }
        Command::Status => {
            bot.send_message(msg.chat.id, texts::STATUS_OK).await?;
        }
        Command::SendTutorial(args) => {
            admin::handle_send_tutorial(bot, msg, args, &ctx).await?;
        }
    }
    Ok(())
}

/// Starts (or restarts) the order conversation with the service menu.
async fn handle_start(bot: Bot, dialogue: OrderDialogue, msg: Message, ctx: &BotContext) -> HandlerResult {
    let user_id = sender_id(&msg);
    let user = sender_name(&msg);
    log_command_start("start", &user, user_id, msg.chat.id.0, None);

    let is_private = msg.chat.is_private();
    let step = conversation::start(is_private);
    conversation::advance(&dialogue, step.next).await?;

    if is_private {
        bot.send_message(msg.chat.id, step.reply)
            .reply_markup(keyboards::main_menu(&ctx.config))
            .await?;
        log_command_success("start", &user, user_id, msg.chat.id.0, None);
    } else {
        bot.send_message(msg.chat.id, step.reply).await?;
        log_command_error("start", &user, user_id, msg.chat.id.0, "not a private chat");
    }
    Ok(())
}

async fn handle_cancel(bot: Bot, dialogue: OrderDialogue, msg: Message, ctx: &BotContext) -> HandlerResult {
    let user_id = sender_id(&msg);
    let user = sender_name(&msg);
    log_command_start("cancel", &user, user_id, msg.chat.id.0, None);

    if let Err(e) = ctx.orders.cancel(user_id).await {
        log_database_error("delete", "pending_orders", &e.to_string(), Some(&user_id.to_string()));
    }
    conversation::reset(&dialogue).await?;
    bot.send_message(msg.chat.id, texts::CANCEL).await?;

    log_command_success("cancel", &user, user_id, msg.chat.id.0, None);
    Ok(())
}

pub async fn receive_country(
    bot: Bot,
    dialogue: OrderDialogue,
    (service, username): (Service, Option<String>),
    msg: Message,
) -> HandlerResult {
    let step = conversation::receive_country(service, username, msg.text().unwrap_or_default(), sender_id(&msg));
    conversation::advance(&dialogue, step.next).await?;
    bot.send_message(msg.chat.id, step.reply).await?;
    Ok(())
}

pub async fn receive_whatsapp(
    bot: Bot,
    dialogue: OrderDialogue,
    (service, username, country): (Service, Option<String>, String),
    msg: Message,
    ctx: Arc<BotContext>,
) -> HandlerResult {
    let user_id = sender_id(&msg);
    let new_order = match conversation::receive_whatsapp(
        service,
        username,
        country,
        msg.text().unwrap_or_default(),
        user_id,
    ) {
        Ok(new_order) => new_order,
        Err(step) => {
            conversation::advance(&dialogue, step.next).await?;
            bot.send_message(msg.chat.id, step.reply).await?;
            return Ok(());
        }
    };

    // The conversation ends here whatever the outcome.
    conversation::reset(&dialogue).await?;

    let submission = match ctx.orders.submit(&new_order).await {
        Ok(submission) => submission,
        Err(e) => {
            log_command_error("order", &sender_name(&msg), user_id, msg.chat.id.0, &e.to_string());
            bot.send_message(msg.chat.id, texts::GENERIC_ERROR).await?;
            return Ok(());
        }
    };

    match submission {
        Submission::AdminBypass { tutorial_link } => {
            bot.send_message(msg.chat.id, texts::ADMIN_NOTE).await?;
            if let Some(link) = tutorial_link {
                bot.send_message(msg.chat.id, texts::tutorial(&link)).await?;
            }
        }
        Submission::AwaitingPayment(link) => {
            bot.send_message(msg.chat.id, texts::checkout(service, link.amount))
                .reply_markup(keyboards::pay(&link.url))
                .await?;
        }
        Submission::PaymentUnavailable => {
            bot.send_message(msg.chat.id, texts::PAY_ERROR)
                .reply_markup(keyboards::support(&ctx.config.support_link))
                .await?;
        }
    }

    log_command_success("order", &sender_name(&msg), user_id, msg.chat.id.0, Some(service.as_str()));
    Ok(())
}
