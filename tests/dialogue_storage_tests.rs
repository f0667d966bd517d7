use monetization_bot::bot::handlers::{BotHandler, OrderDialogue, State};
use monetization_bot::database::models::Service;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::types::ChatId;

#[tokio::test]
async fn test_schema_builds() {
    // Building the handler tree exercises every `case!` pattern.
    let _schema = BotHandler::schema();
}

#[tokio::test]
async fn test_dialogue_starts_idle() {
    let storage = InMemStorage::<State>::new();
    let dialogue = OrderDialogue::new(storage, ChatId(42));

    assert_eq!(dialogue.get_or_default().await.unwrap(), State::Idle);
}

#[tokio::test]
async fn test_dialogue_walks_through_order_states() {
    let storage = InMemStorage::<State>::new();
    let dialogue = OrderDialogue::new(storage.clone(), ChatId(42));

    dialogue.update(State::ChoosingService).await.unwrap();
    dialogue
        .update(State::ReceiveCountry {
            service: Service::TikTok,
            username: Some("awa".to_string()),
        })
        .await
        .unwrap();
    dialogue
        .update(State::ReceiveWhatsapp {
            service: Service::TikTok,
            username: Some("awa".to_string()),
            country: "Mali".to_string(),
        })
        .await
        .unwrap();

    let state = dialogue.get().await.unwrap();
    assert_eq!(
        state,
        Some(State::ReceiveWhatsapp {
            service: Service::TikTok,
            username: Some("awa".to_string()),
            country: "Mali".to_string(),
        })
    );

    // Other chats are independent
    let other = OrderDialogue::new(storage, ChatId(7));
    assert_eq!(other.get().await.unwrap(), None);

    dialogue.exit().await.unwrap();
    assert_eq!(dialogue.get().await.unwrap(), None);
}
