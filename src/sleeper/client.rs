//! Sleeper league API client.
//!
//! API: `https://api.sleeper.app/v1` (read-only, no auth)
//! Rate limit: stay under 1000 calls/minute.
//!
//! A missing league comes back either as 404 or as a 200 with a `null`
//! body, depending on the endpoint; both are treated as not found. Rosters
//! and users must exist for any real league, so a 404 there is an error,
//! while traded picks and draft picks read a 404 as "none".

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::LeagueSource;
use crate::types::{
    parse_records, DashboardError, Draft, DraftPick, League, Player, PlayersById, Roster,
    TradedPick, Transaction, User,
};

pub const DEFAULT_BASE_URL: &str = "https://api.sleeper.app/v1";
const SOURCE_NAME: &str = "sleeper";

pub struct SleeperClient {
    http: Client,
    base_url: String,
    /// The player catalog is several megabytes and changes rarely.
    players: OnceCell<Arc<PlayersById>>,
}

impl SleeperClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent("rookie-ledger/0.1.0")
            .build()
            .context("Failed to build HTTP client for Sleeper")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            players: OnceCell::new(),
        })
    }

    // -- Internal helpers ------------------------------------------------

    /// GET a path under the base URL. `Ok(None)` on 404 or a `null` body.
    async fn get_json(&self, path: &str) -> Result<Option<Value>> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "Fetching from Sleeper");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Sleeper request failed: {path}"))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            let status = resp.status();
            return Err(DashboardError::Upstream {
                source_name: SOURCE_NAME.to_string(),
                message: format!("{status} on {path}"),
            }
            .into());
        }

        let body: Value = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse Sleeper response: {path}"))?;

        Ok(if body.is_null() { None } else { Some(body) })
    }

    /// GET a path expected to return a JSON array; anything else is empty.
    async fn get_list(&self, path: &str) -> Result<Vec<Value>> {
        Ok(match self.get_json(path).await? {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        })
    }

    /// Like `get_list`, for endpoints every existing league answers. A 404
    /// here is an upstream error rather than an empty list.
    async fn get_required_list(&self, path: &str) -> Result<Vec<Value>> {
        match self.get_json(path).await? {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Ok(Vec::new()),
            None => Err(DashboardError::Upstream {
                source_name: SOURCE_NAME.to_string(),
                message: format!("nothing found at {path}"),
            }
            .into()),
        }
    }

    fn index_players(raw: HashMap<String, Value>) -> PlayersById {
        raw.into_iter()
            .filter_map(|(id, value)| {
                let mut player: Player = serde_json::from_value(value).ok()?;
                if player.player_id.is_empty() {
                    player.player_id = id.clone();
                }
                Some((id, player))
            })
            .collect()
    }
}

#[async_trait]
impl LeagueSource for SleeperClient {
    async fn league(&self, league_id: &str) -> Result<League> {
        let body = self
            .get_json(&format!("/league/{league_id}"))
            .await?
            .ok_or_else(|| DashboardError::LeagueNotFound(league_id.to_string()))?;

        serde_json::from_value(body).context("Failed to parse league")
    }

    async fn rosters(&self, league_id: &str) -> Result<Vec<Roster>> {
        let raw = self
            .get_required_list(&format!("/league/{league_id}/rosters"))
            .await?;
        Ok(parse_records::<Roster>(raw, "roster")
            .into_iter()
            .map(Roster::normalized)
            .collect())
    }

    async fn users(&self, league_id: &str) -> Result<Vec<User>> {
        let raw = self
            .get_required_list(&format!("/league/{league_id}/users"))
            .await?;
        Ok(parse_records(raw, "user"))
    }

    async fn transactions(&self, league_id: &str, week: u32) -> Result<Vec<Transaction>> {
        let raw = self
            .get_list(&format!("/league/{league_id}/transactions/{week}"))
            .await?;
        Ok(parse_records(raw, "transaction"))
    }

    async fn players(&self) -> Result<Arc<PlayersById>> {
        let players = self
            .players
            .get_or_try_init(|| async {
                let body = self.get_json("/players/nfl").await?.unwrap_or(Value::Null);
                let raw: HashMap<String, Value> = match body {
                    Value::Object(map) => map.into_iter().collect(),
                    _ => anyhow::bail!("Player catalog was not an object"),
                };
                let players = Self::index_players(raw);
                info!(count = players.len(), "Player catalog loaded");
                Ok::<_, anyhow::Error>(Arc::new(players))
            })
            .await?;
        Ok(Arc::clone(players))
    }

    async fn traded_picks(&self, league_id: &str) -> Result<Vec<TradedPick>> {
        let raw = self
            .get_list(&format!("/league/{league_id}/traded_picks"))
            .await?;
        Ok(parse_records::<TradedPick>(raw, "traded_pick")
            .into_iter()
            .filter(TradedPick::is_valid)
            .collect())
    }

    async fn league_drafts(&self, league_id: &str) -> Result<Vec<Draft>> {
        let raw = self.get_list(&format!("/league/{league_id}/drafts")).await?;
        Ok(parse_records(raw, "draft"))
    }

    async fn draft_picks(&self, draft_id: &str) -> Result<Vec<DraftPick>> {
        let raw = self.get_list(&format!("/draft/{draft_id}/picks")).await?;
        Ok(parse_records::<DraftPick>(raw, "draft_pick")
            .into_iter()
            .filter(DraftPick::is_complete)
            .collect())
    }

    async fn user_id(&self, username: &str) -> Result<String> {
        let body = self
            .get_json(&format!("/user/{}", urlencoding::encode(username)))
            .await?
            .ok_or_else(|| DashboardError::UserNotFound(username.to_string()))?;

        body.get("user_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .context("Could not retrieve user ID")
    }

    async fn user_leagues(&self, user_id: &str, season: Option<i32>) -> Result<Vec<League>> {
        let path = match season {
            Some(season) => format!("/user/{user_id}/leagues/nfl/{season}"),
            None => format!("/user/{user_id}/leagues/nfl"),
        };
        let raw = self.get_list(&path).await?;
        Ok(parse_records(raw, "league"))
    }
}
