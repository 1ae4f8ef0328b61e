//! Core types shared across the bot

use serde::{Deserialize, Serialize};
use std::fmt;

/// Color outcome of a single round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Violet,
    Unknown,
}

impl Color {
    /// Classify a raw outcome code.
    ///
    /// Only the presence of the letters `r` and `g` matters, so `"r"`, `"g"`
    /// and `"r,g"` map to red, green and violet. Note that whole words
    /// classify letter by letter too: `"green"` contains an `r`.
    /// Matching is case-insensitive.
    pub fn classify(code: &str) -> Self {
        let code = code.to_lowercase();
        match (code.contains('r'), code.contains('g')) {
            (true, true) => Color::Violet,
            (true, false) => Color::Red,
            (false, true) => Color::Green,
            (false, false) => Color::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Violet => "violet",
            Color::Unknown => "unknown",
        }
    }

    /// Upper-case label used in notifications
    pub fn as_upper(&self) -> &'static str {
        match self {
            Color::Red => "RED",
            Color::Green => "GREEN",
            Color::Violet => "VIOLET",
            Color::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified round from the result API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Issue number, kept as the numeric string the API returns
    pub period: String,
    pub color: Color,
}

impl RoundResult {
    pub fn new(period: impl Into<String>, color: Color) -> Self {
        Self {
            period: period.into(),
            color,
        }
    }

    /// Build a round from its raw outcome code
    pub fn from_code(period: impl Into<String>, code: &str) -> Self {
        Self::new(period, Color::classify(code))
    }
}

/// Join colors with `", "` for display
pub fn join_colors(colors: &[Color]) -> String {
    colors
        .iter()
        .map(Color::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
