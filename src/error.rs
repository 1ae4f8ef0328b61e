//! Error types for the bot

use thiserror::Error;

/// Bot error type
#[derive(Debug, Error)]
pub enum BotError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Notification failed: {0}")]
    Notify(String),

    #[error("Telegram API error: {0}")]
    Telegram(String),

    #[error("Invalid period {0:?}: expected a numeric issue number")]
    InvalidPeriod(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for BotError {
    fn from(e: config::ConfigError) -> Self {
        BotError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
