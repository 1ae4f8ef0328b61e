//! Poll loop
//!
//! ```text
//! Idle → Fetching ─(empty)──────────────────────────────→ Sleeping → Fetching …
//!                 └(rounds)→ Processing ─(duplicate)─────→ Sleeping
//!                                       └(new)→ notify ──→ Sleeping
//! ```


use crate::client::{fetch_or_empty, ResultSource};
use crate::history::HistoryStore;
use crate::notify::format::RECENT_COUNT;
use crate::notify::{format_prediction, MessageSink};
use crate::predictor::predict;
use crate::types::Color;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Where the loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Fetching,
    Processing,
    Sleeping,
}

/// Result of a single cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Fetch failed or returned no rounds
    Empty,
    /// Latest period was already processed
    Duplicate { period: String },
    /// New period recorded and prediction sent
    Notified { period: String, prediction: Color },
    /// New period recorded but the send failed
    NotifyFailed { period: String, prediction: Color },
    /// New period recorded but the message could not be built
    Skipped { period: String },
}

pub struct Poller {
    source: Arc<dyn ResultSource>,
    sink: Arc<dyn MessageSink>,
    history: Arc<HistoryStore>,
    interval: Duration,
    recent_count: usize,
    state: PollState,
}

impl Poller {
    pub fn new(
        source: Arc<dyn ResultSource>,
        sink: Arc<dyn MessageSink>,
        history: Arc<HistoryStore>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            sink,
            history,
            interval,
            recent_count: RECENT_COUNT,
            state: PollState::Idle,
        }
    }

    /// Number of colors included in each notification
    pub fn with_recent_count(mut self, recent_count: usize) -> Self {
        self.recent_count = recent_count;
        self
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// Run one fetch → dedupe → predict → notify pass
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.state = PollState::Fetching;
        let rounds = fetch_or_empty(self.source.as_ref()).await;

        let Some(latest) = rounds.into_iter().next() else {
            return CycleOutcome::Empty;
        };

        self.state = PollState::Processing;
        let Some((colors, prediction)) =
            self.history.record_and_predict(&latest.period, latest.color, predict)
        else {
            tracing::debug!("Period {} already processed", latest.period);
            return CycleOutcome::Duplicate {
                period: latest.period,
            };
        };

        tracing::info!(
            "Period {} came up {}, predicting {} next",
            latest.period,
            latest.color,
            prediction
        );

        let recent = &colors[..colors.len().min(self.recent_count)];
        let message = match format_prediction(prediction, &latest.period, latest.color, recent) {
            Ok(message) => message,
            Err(e) => {
                tracing::error!("Failed to format prediction: {}", e);
                return CycleOutcome::Skipped {
                    period: latest.period,
                };
            }
        };

        match self.sink.notify(&message).await {
            Ok(()) => CycleOutcome::Notified {
                period: latest.period,
                prediction,
            },
            Err(e) => {
                tracing::error!("Telegram error: {}", e);
                CycleOutcome::NotifyFailed {
                    period: latest.period,
                    prediction,
                }
            }
        }
    }

    /// Run a cycle, wait a full interval, repeat until `shutdown` flips to true
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!("Bot is running and polling every {:?}", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = self.run_cycle().await;
                    tracing::debug!("Cycle finished: {:?}", outcome);
                    self.state = PollState::Sleeping;
                    ticker.reset();
                }
                _ = shutdown.changed() => break,
            }
        }

        self.state = PollState::Idle;
        tracing::info!("Poll loop stopped");
    }
}
