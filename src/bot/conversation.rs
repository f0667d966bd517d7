//! Order conversation steps, kept apart from the Telegram calls so each
//! transition can be checked on its own.

use crate::bot::handlers::{HandlerResult, OrderDialogue, State};
use crate::bot::texts;
use crate::database::models::{NewOrder, Service};
use crate::utils::logging::log_validation_error;
use crate::utils::validation::{normalize_whatsapp_number, validate_country};

/// What happens to the dialogue after a step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Next {
    /// Keep the current state and wait for another answer.
    Stay,
    Go(State),
    /// End the conversation.
    Reset,
}

/// The reply to send and where the conversation goes next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub reply: &'static str,
    pub next: Next,
}

impl Step {
    fn new(reply: &'static str, next: Next) -> Self {
        Self { reply, next }
    }
}

/// `/start`. Orders are only taken in private chats: dialogues are keyed
/// by chat, so in a group every member would share one conversation.
pub fn start(is_private: bool) -> Step {
    if is_private {
        Step::new(texts::START, Next::Go(State::ChoosingService))
    } else {
        Step::new(texts::PRIVATE_ONLY, Next::Stay)
    }
}

/// A service button pressed from the menu.
pub fn choose_service(data: &str, username: Option<String>, user_id: i64) -> Step {
    match data.parse::<Service>() {
        Ok(service) => Step::new(texts::ASK_COUNTRY, Next::Go(State::ReceiveCountry { service, username })),
        Err(e) => {
            log_validation_error("service", "callback_data", data, &e.to_string(), user_id);
            Step::new(texts::UNKNOWN_OPTION, Next::Reset)
        }
    }
}

pub fn receive_country(service: Service, username: Option<String>, text: &str, user_id: i64) -> Step {
    match validate_country(text) {
        Ok(country) => Step::new(
            texts::ASK_WHATSAPP,
            Next::Go(State::ReceiveWhatsapp {
                service,
                username,
                country,
            }),
        ),
        Err(e) => {
            log_validation_error("country", "country", text, &e.to_string(), user_id);
            Step::new(texts::INVALID_COUNTRY, Next::Stay)
        }
    }
}

/// Last answer. A valid number completes the order; anything else is asked
/// again.
pub fn receive_whatsapp(
    service: Service,
    username: Option<String>,
    country: String,
    text: &str,
    user_id: i64,
) -> Result<NewOrder, Step> {
    match normalize_whatsapp_number(text) {
        Ok(whatsapp) => Ok(NewOrder {
            user_id,
            username,
            service,
            country,
            whatsapp,
        }),
        Err(e) => {
            log_validation_error("whatsapp", "whatsapp", text, &e.to_string(), user_id);
            Err(Step::new(texts::INVALID_WHATSAPP, Next::Stay))
        }
    }
}

/// Applies `next` to the stored dialogue.
pub async fn advance(dialogue: &OrderDialogue, next: Next) -> HandlerResult {
    match next {
        Next::Stay => {}
        Next::Go(state) => dialogue.update(state).await?,
        Next::Reset => reset(dialogue).await?,
    }
    Ok(())
}

/// Ends the conversation. Idle chats have nothing stored, and removing a
/// missing dialogue is an error for the in-memory storage.
pub async fn reset(dialogue: &OrderDialogue) -> HandlerResult {
    if dialogue.get().await?.is_some() {
        dialogue.exit().await?;
    }
    Ok(())
}
