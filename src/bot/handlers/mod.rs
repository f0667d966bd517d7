pub mod callback;
pub mod general_message;
pub mod message;

use std::sync::Arc;
use teloxide::{
    dispatching::{
        dialogue::{self, InMemStorage},
        UpdateHandler,
    },
    prelude::*,
};

use crate::bot::commands::Command;
use crate::bot::keyboards::CANCEL_CALLBACK;
use crate::config::Config;
use crate::database::models::Service;
use crate::services::orders::OrderService;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;
pub type OrderDialogue = Dialogue<State, InMemStorage<State>>;

/// Where a user is in the order conversation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum State {
    #[default]
    Idle,
    ChoosingService,
    ReceiveCountry {
        service: Service,
        username: Option<String>,
    },
    ReceiveWhatsapp {
        service: Service,
        username: Option<String>,
        country: String,
    },
}

/// Shared dependencies injected into every handler.
pub struct BotContext {
    pub config: Arc<Config>,
    pub orders: Arc<OrderService>,
}

pub struct BotHandler;

impl BotHandler {
    pub fn schema() -> UpdateHandler<HandlerError> {
        use dptree::case;

        let command_handler = teloxide::filter_command::<Command, _>().endpoint(message::command_handler);

        let message_handler = Update::filter_message()
            .branch(command_handler)
            .branch(case![State::ReceiveCountry { service, username }].endpoint(message::receive_country))
            .branch(
                case![State::ReceiveWhatsapp { service, username, country }]
                    .endpoint(message::receive_whatsapp),
            )
            .branch(dptree::endpoint(general_message::handle_general_message));

        let callback_handler = Update::filter_callback_query()
            .branch(
                dptree::filter(|q: CallbackQuery| q.data.as_deref() == Some(CANCEL_CALLBACK))
                    .endpoint(callback::cancel_callback),
            )
            .branch(case![State::ChoosingService].endpoint(callback::choose_service))
            .branch(dptree::endpoint(callback::stale_callback));

        dialogue::enter::<Update, InMemStorage<State>, State, _>()
            .branch(message_handler)
            .branch(callback_handler)
    }
}

/// Telegram id of the message author, falling back to the chat for
/// channel posts.
pub(crate) fn sender_id(msg: &Message) -> i64 {
    msg.from().map(|user| user.id.0 as i64).unwrap_or(msg.chat.id.0)
}

pub(crate) fn sender_name(msg: &Message) -> String {
    msg.from()
        .map(|user| user.username.clone().unwrap_or_else(|| user.first_name.clone()))
        .unwrap_or_else(|| "unknown".to_string())
}
