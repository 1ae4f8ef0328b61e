//! Result API client
//!
//! Fetches recent draw history and classifies each round.

pub mod history;


pub use history::{parse_history, ResultClient};

use crate::error::Result;
use crate::types::RoundResult;
use async_trait::async_trait;

/// Source of recent rounds, newest first
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultSource: Send + Sync {
    async fn try_fetch(&self) -> Result<Vec<RoundResult>>;
}

/// Fetch the latest rounds, logging any failure and returning nothing
pub async fn fetch_or_empty(source: &dyn ResultSource) -> Vec<RoundResult> {
    match source.try_fetch().await {
        Ok(rounds) => rounds,
        Err(e) => {
            tracing::warn!("Fetch error: {}", e);
            Vec::new()
        }
    }
}
