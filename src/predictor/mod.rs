//! Next-color heuristic
//!
//! Counts reds and greens over the whole history and leans toward the
//! majority, flipping the lean when the latest round came up violet.


use crate::types::Color;

/// Red/green tallies over a history window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorCounts {
    pub red: usize,
    pub green: usize,
}

impl ColorCounts {
    pub fn from_history(history: &[Color]) -> Self {
        history.iter().fold(Self::default(), |mut acc, color| {
            match color {
                Color::Red => acc.red += 1,
                Color::Green => acc.green += 1,
                Color::Violet | Color::Unknown => {}
            }
            acc
        })
    }
}

/// Predict the next color from a most-recent-first history.
///
/// Ties go to red, except after a violet round where they go to green.
/// An empty history predicts red.
pub fn predict(history: &[Color]) -> Color {
    let counts = ColorCounts::from_history(history);

    if history.first() == Some(&Color::Violet) {
        if counts.red < counts.green {
            Color::Red
        } else {
            Color::Green
        }
    } else if counts.red > counts.green {
        Color::Green
    } else {
        Color::Red
    }
}
