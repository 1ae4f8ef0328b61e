//! Configuration management
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `WINGO__SECTION__KEY` environment variables, and finally the two plain
//! secrets `TELEGRAM_TOKEN` and `CHAT_ID`.

use crate::error::{BotError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// WinGo 30s draw history endpoint
pub const DEFAULT_SOURCE_URL: &str =
    "https://draw.ar-lottery01.com/WinGo/WinGo_30S/GetHistoryIssuePage.json";

/// Environment variable holding the bot token
pub const TOKEN_ENV: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the destination chat
pub const CHAT_ID_ENV: &str = "CHAT_ID";

const ENV_PREFIX: &str = "WINGO";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub poll: PollConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    /// Destination chat for predictions
    #[serde(default)]
    pub chat_id: String,
}

/// Result API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_url")]
    pub url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Poll loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    /// Maximum number of colors kept as predictor input
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Number of colors shown in notifications and /status
    #[serde(default = "default_recent_count")]
    pub recent_count: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            history_limit: default_history_limit(),
            recent_count: default_recent_count(),
        }
    }
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_interval() -> u64 {
    10
}

fn default_history_limit() -> usize {
    20
}

fn default_recent_count() -> usize {
    10
}

impl Config {
    /// Load and validate configuration from `path` (optional) and the
    /// process environment.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn load(path: &str) -> Result<Self> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`load`](Self::load) but without validation, for commands that
    /// never talk to Telegram.
    pub fn read(path: &str) -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Failed to read .env file: {}", e);
            }
        }
        Self::read_with_env(path, std::env::vars().collect())
    }

    /// Load and validate configuration against an explicit environment map.
    pub fn load_with_env(path: &str, env: HashMap<String, String>) -> Result<Self> {
        let config = Self::read_with_env(path, env)?;
        config.validate()?;
        Ok(config)
    }

    fn read_with_env(path: &str, env: HashMap<String, String>) -> Result<Self> {
        let path = shellexpand::tilde(path).into_owned();

        let mut builder = config::Config::builder()
            .add_source(config::File::new(&path, config::FileFormat::Toml).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .source(Some(env.clone())),
            );

        if let Some(token) = env.get(TOKEN_ENV) {
            builder = builder.set_override("telegram.bot_token", token.as_str())?;
        }
        if let Some(chat_id) = env.get(CHAT_ID_ENV) {
            builder = builder.set_override("telegram.chat_id", chat_id.as_str())?;
        }

        let config: Config = builder.build()?.try_deserialize()?;

        tracing::debug!(
            "Loaded config: source={} interval={}s history_limit={}",
            config.source.url,
            config.poll.interval_secs,
            config.poll.history_limit
        );
        Ok(config)
    }

    /// Reject configurations the bot cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(BotError::Config(format!(
                "{} is not set (or telegram.bot_token in the config file)",
                TOKEN_ENV
            )));
        }
        if self.telegram.chat_id.trim().is_empty() {
            return Err(BotError::Config(format!(
                "{} is not set (or telegram.chat_id in the config file)",
                CHAT_ID_ENV
            )));
        }
        if self.source.url.trim().is_empty() {
            return Err(BotError::Config("source.url must not be empty".into()));
        }
        if self.source.timeout_secs == 0 {
            return Err(BotError::Config("source.timeout_secs must be positive".into()));
        }
        if self.poll.interval_secs == 0 {
            return Err(BotError::Config("poll.interval_secs must be positive".into()));
        }
        if self.poll.history_limit == 0 {
            return Err(BotError::Config("poll.history_limit must be positive".into()));
        }
        Ok(())
    }
}
