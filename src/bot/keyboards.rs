use reqwest::Url;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::warn;

use crate::bot::texts;
use crate::config::Config;
use crate::database::models::Service;

/// Callback data of the "cancel order" button.
pub const CANCEL_CALLBACK: &str = "cancel";

const HOW_IT_WORKS_FALLBACK: &str = "https://t.me/";

pub fn main_menu(config: &Config) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Service::ALL
        .iter()
        .map(|service| {
            vec![InlineKeyboardButton::callback(
                texts::service_button(*service),
                service.as_str(),
            )]
        })
        .collect();

    let how_it_works = config.tutorial_link.as_deref().unwrap_or(HOW_IT_WORKS_FALLBACK);
    if let Some(button) = url_button(texts::BUTTON_HOW_IT_WORKS, how_it_works) {
        rows.push(vec![button]);
    }
    if let Some(button) = url_button(texts::BUTTON_SUPPORT, &config.support_link) {
        rows.push(vec![button]);
    }

    InlineKeyboardMarkup::new(rows)
}

pub fn pay(pay_url: &str) -> InlineKeyboardMarkup {
    let mut rows = Vec::new();
    if let Some(button) = url_button(texts::BUTTON_PAY, pay_url) {
        rows.push(vec![button]);
    }
    rows.push(vec![InlineKeyboardButton::callback(texts::BUTTON_CANCEL, CANCEL_CALLBACK)]);
    InlineKeyboardMarkup::new(rows)
}

pub fn support(support_link: &str) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = url_button(texts::BUTTON_SUPPORT_SHORT, support_link)
        .map(|button| vec![vec![button]])
        .unwrap_or_default();
    InlineKeyboardMarkup::new(rows)
}

/// Telegram rejects the whole keyboard if one URL is malformed, so bad
/// links are dropped with a warning instead.
fn url_button(label: &str, link: &str) -> Option<InlineKeyboardButton> {
    match Url::parse(link) {
        Ok(url) => Some(InlineKeyboardButton::url(label, url)),
        Err(e) => {
            warn!("Skipping '{}' button, invalid URL {}: {}", label, link, e);
            None
        }
    }
}
