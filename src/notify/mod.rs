//! Outbound Telegram messages
//!
//! Predictions go to the single configured chat; command replies go back to
//! whichever chat asked.

pub mod format;


pub use format::{format_prediction, format_status, next_period, HELP_TEXT, START_TEXT};

use crate::error::{BotError, Result};
use crate::telegram::ApiResponse;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Destination for bot messages
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Send a Markdown message to the configured chat
    async fn notify(&self, text: &str) -> Result<()>;

    /// Send a plain-text reply to `chat_id`
    async fn reply(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Show a chat action such as `typing`
    async fn chat_action(&self, chat_id: i64, action: &str) -> Result<()>;
}

/// Telegram Bot API notifier
#[derive(Clone)]
pub struct Notifier {
    http: Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: String,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct ChatActionRequest<'a> {
    chat_id: String,
    action: &'a str,
}

impl Notifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            http: Client::new(),
            api_base: TELEGRAM_API_BASE.to_string(),
            bot_token,
            chat_id,
        }
    }

    /// Point at a different Bot API server
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }

    async fn call<B: Serialize + Sync>(&self, method: &str, body: &B) -> Result<()> {
        let resp = self
            .http
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| BotError::Notify(format!("{} request failed: {}", method, e.without_url())))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| BotError::Notify(format!("{} returned {}: {}", method, status, e.without_url())))?;

        check_api_response(method, status, &body)
    }
}

/// Map a Bot API reply to `Ok` or [`BotError::Notify`].
///
/// A reply counts as delivered only when the body parses and carries `ok: true`.
pub fn check_api_response(method: &str, status: StatusCode, body: &str) -> Result<()> {
    let parsed: ApiResponse<serde_json::Value> = serde_json::from_str(body)
        .map_err(|e| BotError::Notify(format!("{} returned {}: {}", method, status, e)))?;

    if !parsed.ok {
        return Err(BotError::Notify(format!(
            "{} rejected: {}",
            method,
            parsed.description.unwrap_or_else(|| status.to_string())
        )));
    }
    if !status.is_success() {
        return Err(BotError::Notify(format!("{} returned {}", method, status)));
    }
    Ok(())
}

#[async_trait]
impl MessageSink for Notifier {
    async fn notify(&self, text: &str) -> Result<()> {
        tracing::info!("Sending to Telegram: {}", text);
        let request = SendMessageRequest {
            chat_id: self.chat_id.clone(),
            text,
            parse_mode: Some("Markdown"),
        };
        self.call("sendMessage", &request).await
    }

    async fn reply(&self, chat_id: i64, text: &str) -> Result<()> {
        let request = SendMessageRequest {
            chat_id: chat_id.to_string(),
            text,
            parse_mode: None,
        };
        self.call("sendMessage", &request).await
    }

    async fn chat_action(&self, chat_id: i64, action: &str) -> Result<()> {
        let request = ChatActionRequest {
            chat_id: chat_id.to_string(),
            action,
        };
        self.call("sendChatAction", &request).await
    }
}
