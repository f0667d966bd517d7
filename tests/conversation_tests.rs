use monetization_bot::bot::conversation::{self, Next, Step};
use monetization_bot::bot::handlers::{OrderDialogue, State};
use monetization_bot::bot::texts;
use monetization_bot::database::models::Service;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::types::ChatId;

fn dialogue(chat_id: i64) -> OrderDialogue {
    OrderDialogue::new(InMemStorage::<State>::new(), ChatId(chat_id))
}

#[tokio::test]
async fn test_start_in_private_chat_opens_service_menu() {
    let dialogue = dialogue(42);

    let step = conversation::start(true);
    assert_eq!(step.reply, texts::START);
    conversation::advance(&dialogue, step.next).await.unwrap();

    assert_eq!(dialogue.get().await.unwrap(), Some(State::ChoosingService));
}

#[tokio::test]
async fn test_start_in_group_does_not_open_shared_conversation() {
    let group = dialogue(-100555);

    let step = conversation::start(false);
    assert_eq!(step, Step { reply: texts::PRIVATE_ONLY, next: Next::Stay });
    conversation::advance(&group, step.next).await.unwrap();

    assert_eq!(group.get().await.unwrap(), None);
}

#[tokio::test]
async fn test_invalid_country_asks_again_and_keeps_state() {
    let dialogue = dialogue(42);
    let state = State::ReceiveCountry {
        service: Service::TikTok,
        username: Some("awa".to_string()),
    };
    dialogue.update(state.clone()).await.unwrap();

    let step = conversation::receive_country(Service::TikTok, Some("awa".to_string()), "   ", 42);
    assert_eq!(step.reply, texts::INVALID_COUNTRY);
    conversation::advance(&dialogue, step.next).await.unwrap();

    assert_eq!(dialogue.get().await.unwrap(), Some(state));
}

#[tokio::test]
async fn test_valid_country_moves_to_whatsapp() {
    let dialogue = dialogue(42);

    let step = conversation::receive_country(Service::Facebook, None, "  Côte d'Ivoire ", 42);
    assert_eq!(step.reply, texts::ASK_WHATSAPP);
    conversation::advance(&dialogue, step.next).await.unwrap();

    let Some(State::ReceiveWhatsapp { service, country, .. }) = dialogue.get().await.unwrap() else {
        panic!("expected the WhatsApp step");
    };
    assert_eq!(service, Service::Facebook);
    assert_eq!(country, "Côte d'Ivoire");
}

#[tokio::test]
async fn test_invalid_whatsapp_asks_again_and_keeps_state() {
    let dialogue = dialogue(42);
    let state = State::ReceiveWhatsapp {
        service: Service::TikTok,
        username: None,
        country: "Mali".to_string(),
    };
    dialogue.update(state.clone()).await.unwrap();

    let Err(step) = conversation::receive_whatsapp(Service::TikTok, None, "Mali".to_string(), "0770", 42) else {
        panic!("a local number without country code is rejected");
    };
    assert_eq!(step.reply, texts::INVALID_WHATSAPP);
    conversation::advance(&dialogue, step.next).await.unwrap();

    assert_eq!(dialogue.get().await.unwrap(), Some(state));
}

#[test]
fn test_valid_whatsapp_completes_order() {
    let order = conversation::receive_whatsapp(
        Service::TikTok,
        Some("awa".to_string()),
        "Mali".to_string(),
        "+223 70 12 34 56",
        42,
    )
    .unwrap();

    assert_eq!(order.user_id, 42);
    assert_eq!(order.service, Service::TikTok);
    assert_eq!(order.country, "Mali");
    assert_eq!(order.whatsapp, "+22370123456");
}

#[tokio::test]
async fn test_unknown_service_option_resets_conversation() {
    let dialogue = dialogue(42);
    dialogue.update(State::ChoosingService).await.unwrap();

    let step = conversation::choose_service("instagram", None, 42);
    assert_eq!(step, Step { reply: "Option inconnue.", next: Next::Reset });
    conversation::advance(&dialogue, step.next).await.unwrap();

    assert_eq!(dialogue.get().await.unwrap(), None);
}

#[tokio::test]
async fn test_known_service_option_asks_country() {
    let dialogue = dialogue(42);
    dialogue.update(State::ChoosingService).await.unwrap();

    let step = conversation::choose_service("tiktok", Some("awa".to_string()), 42);
    assert_eq!(step.reply, texts::ASK_COUNTRY);
    conversation::advance(&dialogue, step.next).await.unwrap();

    assert_eq!(
        dialogue.get().await.unwrap(),
        Some(State::ReceiveCountry {
            service: Service::TikTok,
            username: Some("awa".to_string()),
        })
    );
}

#[tokio::test]
async fn test_reset_on_idle_chat_succeeds() {
    let dialogue = dialogue(42);

    // /cancel before /start: nothing is stored for the chat yet.
    conversation::reset(&dialogue).await.unwrap();
    conversation::advance(&dialogue, Next::Reset).await.unwrap();
    assert_eq!(dialogue.get().await.unwrap(), None);
}
