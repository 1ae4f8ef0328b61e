//! Telegram bot for receiving commands
//!
//! Supports /start, /status and /help.

#[cfg(test)]
mod tests;

use crate::error::{BotError, Result};
use crate::history::HistoryStore;
use crate::notify::{format_status, MessageSink, HELP_TEXT, START_TEXT, TELEGRAM_API_BASE};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Long-poll timeout passed to getUpdates
const LONG_POLL_SECS: u64 = 30;

/// Commands the bot answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Status,
    Help,
}

impl BotCommand {
    /// Parse `/cmd` or `/cmd@botname`, ignoring arguments and case.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let body = text.strip_prefix('/')?;
        let word = body.split_whitespace().next()?;
        let cmd = word.split('@').next().unwrap_or(word);

        match cmd.to_lowercase().as_str() {
            "start" => Some(BotCommand::Start),
            "status" => Some(BotCommand::Status),
            "help" => Some(BotCommand::Help),
            _ => None,
        }
    }
}

/// Bot API envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub result: Option<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TelegramUpdate {
    pub update_id: i64,
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub(crate) struct TelegramMessage {
    pub message_id: i64,
    pub chat: TelegramChat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TelegramChat {
    pub id: i64,
}

/// Answers commands from the shared history
pub struct CommandHandler {
    history: Arc<HistoryStore>,
    sink: Arc<dyn MessageSink>,
    recent_count: usize,
}

impl CommandHandler {
    pub fn new(history: Arc<HistoryStore>, sink: Arc<dyn MessageSink>, recent_count: usize) -> Self {
        Self {
            history,
            sink,
            recent_count,
        }
    }

    /// Reply to `cmd` in `chat_id`. Send failures are logged, not returned.
    pub async fn handle(&self, chat_id: i64, cmd: BotCommand) {
        let result = match cmd {
            BotCommand::Start => self.send_start(chat_id).await,
            BotCommand::Status => {
                let text = format_status(&self.history.snapshot(), self.recent_count);
                self.sink.reply(chat_id, &text).await
            }
            BotCommand::Help => self.sink.reply(chat_id, HELP_TEXT).await,
        };

        if let Err(e) = result {
            tracing::error!("Failed to answer {:?} in chat {}: {}", cmd, chat_id, e);
        }
    }

    async fn send_start(&self, chat_id: i64) -> Result<()> {
        if let Err(e) = self.sink.chat_action(chat_id, "typing").await {
            tracing::debug!("Typing action failed: {}", e);
        }
        self.sink.reply(chat_id, START_TEXT).await
    }
}

/// Telegram update listener
pub struct TelegramBot {
    http: Client,
    api_base: String,
    bot_token: String,
    last_update_id: i64,
    handler: CommandHandler,
}

impl TelegramBot {
    pub fn new(bot_token: String, handler: CommandHandler) -> Self {
        Self {
            http: Client::new(),
            api_base: TELEGRAM_API_BASE.to_string(),
            bot_token,
            last_update_id: 0,
            handler,
        }
    }

    /// Poll for updates until `shutdown` flips to true
    pub async fn start_polling(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!("Starting Telegram command listener...");

        loop {
            if *shutdown.borrow() {
                break;
            }

            let polled = tokio::select! {
                res = self.poll_updates() => res,
                _ = shutdown.changed() => break,
            };

            match polled {
                Ok(updates) => {
                    for update in updates {
                        self.dispatch(update).await;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to poll Telegram updates: {}", e);
                    tokio::select! {
                        _ = tokio::time::sleep(Duration::from_secs(5)) => {}
                        _ = shutdown.changed() => break,
                    }
                }
            }
        }

        tracing::info!("Telegram command listener stopped");
    }

    async fn dispatch(&mut self, update: TelegramUpdate) {
        self.last_update_id = self.last_update_id.max(update.update_id + 1);

        let Some(msg) = update.message else {
            return;
        };
        let Some(cmd) = msg.text.as_deref().and_then(BotCommand::parse) else {
            return;
        };

        tracing::info!("Received command {:?} from chat {}", cmd, msg.chat.id);
        self.handler.handle(msg.chat.id, cmd).await;
    }

    async fn poll_updates(&self) -> Result<Vec<TelegramUpdate>> {
        let url = format!("{}/bot{}/getUpdates", self.api_base, self.bot_token);

        let body = self
            .http
            .get(&url)
            .query(&[
                ("offset", self.last_update_id.to_string()),
                ("timeout", LONG_POLL_SECS.to_string()),
            ])
            .timeout(Duration::from_secs(LONG_POLL_SECS + 10))
            .send()
            .await
            .map_err(|e| BotError::Telegram(e.without_url().to_string()))?
            .text()
            .await
            .map_err(|e| BotError::Telegram(e.without_url().to_string()))?;

        parse_updates(&body)
    }
}

/// Parse a getUpdates reply, surfacing `ok: false` as [`BotError::Telegram`]
pub(crate) fn parse_updates(body: &str) -> Result<Vec<TelegramUpdate>> {
    let response: ApiResponse<Vec<TelegramUpdate>> =
        serde_json::from_str(body).map_err(|e| BotError::Telegram(format!("bad getUpdates reply: {}", e)))?;

    if !response.ok {
        return Err(BotError::Telegram(
            response.description.unwrap_or_else(|| "getUpdates failed".into()),
        ));
    }
    Ok(response.result.unwrap_or_default())
}
