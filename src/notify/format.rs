//! Message templates

use crate::error::{BotError, Result};
use crate::history::HistorySnapshot;
use crate::types::{join_colors, Color};

/// Number of colors shown by default
pub const RECENT_COUNT: usize = 10;

pub const START_TEXT: &str = "🔄 Please wait... fetching latest prediction 🔍\n\
You will receive the next prediction shortly.";

pub const HELP_TEXT: &str = "🤖 Available Commands:\n\
/start - Start the bot\n\
/status - View current prediction status\n\
/help - Show this help message";

/// Issue number following `period`
pub fn next_period(period: &str) -> Result<u128> {
    let digits = period.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BotError::InvalidPeriod(period.to_string()));
    }
    digits
        .parse::<u128>()
        .ok()
        .and_then(|p| p.checked_add(1))
        .ok_or_else(|| BotError::InvalidPeriod(period.to_string()))
}

/// Render the prediction notification (Telegram Markdown).
///
/// `recent` is most recent first and is shown as given.
pub fn format_prediction(
    predicted: Color,
    period: &str,
    last_color: Color,
    recent: &[Color],
) -> Result<String> {
    let next = next_period(period)?;

    Ok(format!(
        "🎯 *Next Prediction:* `{}`\n\
        🕓 *Period:* {}\n\
        ✅ *Last Result:* `{}`\n\
        📊 *History:* {}",
        predicted.as_upper(),
        next,
        last_color.as_upper(),
        join_colors(recent),
    ))
}

/// Render the `/status` reply (plain text)
pub fn format_status(snapshot: &HistorySnapshot, recent_count: usize) -> String {
    let period = snapshot.last_period.as_deref().unwrap_or("N/A");
    let prediction = snapshot
        .last_prediction
        .map(|c| c.as_str())
        .unwrap_or("N/A");

    let mut text = format!(
        "📊 Prediction Status:\n\
        Last Period: {}\n\
        Last Prediction: {}\n\
        Recent History: {}",
        period,
        prediction,
        join_colors(snapshot.recent(recent_count)),
    );

    if let Some(at) = snapshot.updated_at {
        text.push_str(&format!("\nUpdated: {}", at.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    text
}
