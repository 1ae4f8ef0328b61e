//! WinGo Color Prediction Bot
//!
//! Polls the WinGo draw history, predicts the next round's color and pushes
//! it to a Telegram chat.
//!
//! ## Architecture
//!
//! ```text
//! Poller → ResultClient → Color::classify → HistoryStore → predict → format → Notifier
//!                                               ↑
//!                     TelegramBot → CommandHandler (/start, /status, /help)
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod notify;
pub mod poller;
pub mod predictor;
pub mod telegram;
pub mod types;

#[cfg(test)]
mod types_tests;
#[cfg(test)]
mod error_tests;
