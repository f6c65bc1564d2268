//! HTTP trade-value source.
//!
//! Reads the value feed through the same-origin relay
//! (`GET {relay_url}?type=dynasty|redraft`), which fronts the upstream
//! value API and adds a day-long cache header.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{LeagueFormat, ValueSource};
use crate::types::{parse_records, TradeValue};

/// Default relay endpoint when running the bundled relay locally.
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3000/api/proxy";

pub struct RelayValueSource {
    http: Client,
    relay_url: String,
}

impl RelayValueSource {
    pub fn new(relay_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("rookie-ledger/0.1.0")
            .build()
            .context("Failed to build HTTP client for trade values")?;

        Ok(Self {
            http,
            relay_url: relay_url.into(),
        })
    }

    fn url_for(&self, format: LeagueFormat) -> String {
        format!("{}?type={}", self.relay_url, format.as_param())
    }
}

#[async_trait]
impl ValueSource for RelayValueSource {
    async fn fetch_values(&self, format: LeagueFormat) -> Result<Vec<TradeValue>> {
        let url = self.url_for(format);
        debug!(url = %url, "Fetching trade values");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("Trade value request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Failed to fetch trade values: {status}: {body}");
        }

        let raw: Vec<serde_json::Value> = resp
            .json()
            .await
            .context("Failed to parse trade value response")?;

        Ok(parse_records(raw, "trade_value"))
    }
}
