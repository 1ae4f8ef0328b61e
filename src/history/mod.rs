//! Recent round history shared by the poll loop and the command handler


use crate::types::Color;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::VecDeque;

/// Default number of colors kept
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Bounded, most-recent-first color history plus the last prediction.
///
/// The poll loop is the only writer; `/status` only ever reads.
pub struct HistoryStore {
    inner: RwLock<HistoryState>,
    limit: usize,
}

#[derive(Debug, Default)]
struct HistoryState {
    colors: VecDeque<Color>,
    last_period: Option<String>,
    last_prediction: Option<Color>,
    updated_at: Option<DateTime<Utc>>,
}

/// Point-in-time copy of the store
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    /// Most recent first
    pub colors: Vec<Color>,
    pub last_period: Option<String>,
    pub last_prediction: Option<Color>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl HistorySnapshot {
    /// The `n` most recent colors
    pub fn recent(&self, n: usize) -> &[Color] {
        &self.colors[..self.colors.len().min(n)]
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl HistoryStore {
    pub fn new(limit: usize) -> Self {
        Self {
            inner: RwLock::new(HistoryState {
                colors: VecDeque::with_capacity(limit),
                ..Default::default()
            }),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record a round if its period has not been seen last.
    ///
    /// Returns `false` and leaves the store untouched for a repeated period.
    /// The previous prediction is kept; use
    /// [`record_and_predict`](Self::record_and_predict) to replace it in the
    /// same step.
    pub fn record_if_new(&self, period: &str, color: Color) -> bool {
        let mut state = self.inner.write();
        self.push_if_new(&mut state, period, color)
    }

    /// Record a new round and store the prediction for it under one write
    /// guard, so readers never see the new period without its prediction.
    ///
    /// Returns the updated history (most recent first) and the prediction,
    /// or `None` for a repeated period.
    pub fn record_and_predict<F>(&self, period: &str, color: Color, predict: F) -> Option<(Vec<Color>, Color)>
    where
        F: FnOnce(&[Color]) -> Color,
    {
        let mut state = self.inner.write();
        if !self.push_if_new(&mut state, period, color) {
            return None;
        }

        let prediction = predict(state.colors.make_contiguous());
        state.last_prediction = Some(prediction);
        Some((state.colors.iter().copied().collect(), prediction))
    }

    fn push_if_new(&self, state: &mut HistoryState, period: &str, color: Color) -> bool {
        if state.last_period.as_deref() == Some(period) {
            return false;
        }

        state.colors.push_front(color);
        state.colors.truncate(self.limit);
        state.last_period = Some(period.to_string());
        state.updated_at = Some(Utc::now());
        true
    }

    pub fn set_prediction(&self, prediction: Color) {
        self.inner.write().last_prediction = Some(prediction);
    }

    /// Most-recent-first copy of the colors
    pub fn colors(&self) -> Vec<Color> {
        self.inner.read().colors.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().colors.is_empty()
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        let state = self.inner.read();
        HistorySnapshot {
            colors: state.colors.iter().copied().collect(),
            last_period: state.last_period.clone(),
            last_prediction: state.last_prediction,
            updated_at: state.updated_at,
        }
    }
}
