//! Unit tests for the command bot

use super::*;
use crate::notify::MockMessageSink;
use crate::types::Color;
use mockall::predicate::eq;

fn handler_with(sink: MockMessageSink, history: Arc<HistoryStore>) -> CommandHandler {
    CommandHandler::new(history, Arc::new(sink), 10)
}

#[test]
fn test_parse_commands() {
    assert_eq!(BotCommand::parse("/start"), Some(BotCommand::Start));
    assert_eq!(BotCommand::parse("/status"), Some(BotCommand::Status));
    assert_eq!(BotCommand::parse("/help"), Some(BotCommand::Help));
}

#[test]
fn test_parse_command_variants() {
    assert_eq!(BotCommand::parse("  /STATUS  "), Some(BotCommand::Status));
    assert_eq!(BotCommand::parse("/help@wingo_bot"), Some(BotCommand::Help));
    assert_eq!(BotCommand::parse("/start now please"), Some(BotCommand::Start));
}

#[test]
fn test_parse_ignores_other_text() {
    assert_eq!(BotCommand::parse("status"), None);
    assert_eq!(BotCommand::parse("/"), None);
    assert_eq!(BotCommand::parse("/pause"), None);
    assert_eq!(BotCommand::parse(""), None);
}

#[test]
fn test_update_deserialization() {
    let body = r#"{
        "ok": true,
        "result": [
            {"update_id": 10, "message": {"message_id": 1, "chat": {"id": 555, "type": "private"}, "text": "/status"}},
            {"update_id": 11, "edited_message": {"message_id": 1}}
        ]
    }"#;
    let resp: ApiResponse<Vec<TelegramUpdate>> = serde_json::from_str(body).unwrap();
    assert!(resp.ok);
    let updates = resp.result.unwrap();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].message.as_ref().unwrap().chat.id, 555);
    assert!(updates[1].message.is_none());
}

#[test]
fn test_error_response_deserialization() {
    let body = r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#;
    let resp: ApiResponse<Vec<TelegramUpdate>> = serde_json::from_str(body).unwrap();
    assert!(!resp.ok);
    assert_eq!(resp.description.as_deref(), Some("Unauthorized"));
    assert!(resp.result.is_none());
}

#[tokio::test]
async fn test_start_sends_typing_and_ack() {
    let mut sink = MockMessageSink::new();
    sink.expect_chat_action()
        .with(eq(42), eq("typing"))
        .times(1)
        .returning(|_, _| Ok(()));
    sink.expect_reply()
        .withf(|chat, text| *chat == 42 && text == START_TEXT)
        .times(1)
        .returning(|_, _| Ok(()));

    let history = Arc::new(HistoryStore::default());
    handler_with(sink, history.clone()).handle(42, BotCommand::Start).await;
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_start_still_replies_when_typing_fails() {
    let mut sink = MockMessageSink::new();
    sink.expect_chat_action()
        .returning(|_, _| Err(BotError::Notify("typing".into())));
    sink.expect_reply().times(1).returning(|_, _| Ok(()));

    handler_with(sink, Arc::new(HistoryStore::default()))
        .handle(1, BotCommand::Start)
        .await;
}

#[tokio::test]
async fn test_status_reports_snapshot() {
    let history = Arc::new(HistoryStore::default());
    history.record_if_new("101", Color::Red);
    history.record_if_new("102", Color::Violet);
    history.set_prediction(Color::Green);

    let mut sink = MockMessageSink::new();
    sink.expect_reply()
        .withf(|chat, text| {
            *chat == 7
                && text.contains("Last Period: 102")
                && text.contains("Last Prediction: green")
                && text.contains("Recent History: violet, red")
        })
        .times(1)
        .returning(|_, _| Ok(()));

    handler_with(sink, history).handle(7, BotCommand::Status).await;
}

#[tokio::test]
async fn test_help_sends_static_text() {
    let mut sink = MockMessageSink::new();
    sink.expect_reply()
        .withf(|_, text| text == HELP_TEXT)
        .times(1)
        .returning(|_, _| Ok(()));

    handler_with(sink, Arc::new(HistoryStore::default()))
        .handle(9, BotCommand::Help)
        .await;
}

#[tokio::test]
async fn test_reply_failure_is_swallowed() {
    let mut sink = MockMessageSink::new();
    sink.expect_reply()
        .times(1)
        .returning(|_, _| Err(BotError::Notify("down".into())));

    handler_with(sink, Arc::new(HistoryStore::default()))
        .handle(9, BotCommand::Help)
        .await;
}

#[tokio::test]
async fn test_dispatch_advances_offset_and_ignores_chatter() {
    let mut sink = MockMessageSink::new();
    sink.expect_reply()
        .withf(|chat, text| *chat == 3 && text == HELP_TEXT)
        .times(1)
        .returning(|_, _| Ok(()));

    let handler = handler_with(sink, Arc::new(HistoryStore::default()));
    let mut bot = TelegramBot::new("123:abc".into(), handler);

    let chatter = TelegramUpdate {
        update_id: 20,
        message: Some(TelegramMessage {
            message_id: 1,
            chat: TelegramChat { id: 3 },
            text: Some("hello".into()),
        }),
    };
    bot.dispatch(chatter).await;
    assert_eq!(bot.last_update_id, 21);

    let help = TelegramUpdate {
        update_id: 21,
        message: Some(TelegramMessage {
            message_id: 2,
            chat: TelegramChat { id: 3 },
            text: Some("/help".into()),
        }),
    };
    bot.dispatch(help).await;
    assert_eq!(bot.last_update_id, 22);

    bot.dispatch(TelegramUpdate { update_id: 22, message: None }).await;
    assert_eq!(bot.last_update_id, 23);
}

#[tokio::test]
async fn test_listener_stops_on_shutdown() {
    let handler = handler_with(MockMessageSink::new(), Arc::new(HistoryStore::default()));
    let mut bot = TelegramBot::new("123:abc".into(), handler);
    bot.api_base = "http://127.0.0.1:9".into();

    let (tx, rx) = watch::channel(false);
    let task = tokio::spawn(bot.start_polling(rx));
    tx.send(true).unwrap();

    tokio::time::timeout(Duration::from_secs(10), task)
        .await
        .expect("listener did not stop")
        .unwrap();
}

#[test]
fn test_parse_updates_ok() {
    let body = r#"{"ok":true,"result":[{"update_id":5,"message":{"message_id":1,"chat":{"id":8},"text":"/help"}}]}"#;
    let updates = parse_updates(body).unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].update_id, 5);
}

#[test]
fn test_parse_updates_empty_result() {
    assert!(parse_updates(r#"{"ok":true}"#).unwrap().is_empty());
}

#[test]
fn test_parse_updates_rejected() {
    let body = r#"{"ok":false,"error_code":409,"description":"Conflict: terminated by other getUpdates request"}"#;
    match parse_updates(body) {
        Err(BotError::Telegram(msg)) => assert!(msg.starts_with("Conflict")),
        other => panic!("expected Telegram error, got {other:?}"),
    }
}

#[test]
fn test_parse_updates_html_body() {
    let err = parse_updates("<html>502 Bad Gateway</html>").unwrap_err();
    assert!(matches!(err, BotError::Telegram(_)));
}

#[tokio::test]
async fn test_poll_updates_unreachable_is_telegram_error() {
    let handler = handler_with(MockMessageSink::new(), Arc::new(HistoryStore::default()));
    let mut bot = TelegramBot::new("123:abc".into(), handler);
    bot.api_base = "http://127.0.0.1:9".into();

    match bot.poll_updates().await {
        Err(BotError::Telegram(msg)) => assert!(!msg.contains("123:abc")),
        other => panic!("expected Telegram error, got {other:?}"),
    }
}
