//! Draw history endpoint client

use super::ResultSource;
use crate::config::SourceConfig;
use crate::error::{BotError, Result};
use crate::types::RoundResult;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the draw history API
#[derive(Clone)]
pub struct ResultClient {
    http: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    data: Option<HistoryPage>,
}

#[derive(Debug, Deserialize)]
struct HistoryPage {
    #[serde(default)]
    list: Vec<HistoryEntry>,
}

#[derive(Debug, Deserialize)]
struct HistoryEntry {
    issue: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl ResultClient {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ResultSource for ResultClient {
    async fn try_fetch(&self) -> Result<Vec<RoundResult>> {
        let resp = self.http.get(&self.url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BotError::Fetch(format!("{} returned {}", self.url, status)));
        }

        let body = resp.text().await?;
        let rounds = parse_history(&body)?;
        debug!("Fetched {} rounds", rounds.len());
        Ok(rounds)
    }
}

/// Parse a history page body into rounds, preserving source order.
///
/// Entries without an issue number are dropped; a missing code classifies
/// as unknown.
pub fn parse_history(body: &str) -> Result<Vec<RoundResult>> {
    let resp: HistoryResponse = serde_json::from_str(body)?;
    let entries = resp.data.map(|page| page.list).unwrap_or_default();

    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            let period = entry.issue?;
            Some(RoundResult::from_code(period, entry.code.as_deref().unwrap_or("")))
        })
        .collect())
}
