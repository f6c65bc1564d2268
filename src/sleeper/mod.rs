//! League data sources.
//!
//! Defines the `LeagueSource` trait over the upstream fantasy league REST
//! API, with the multi-request walks (all transaction weeks, the
//! previous-season chain, drafts across seasons) provided on top of the
//! single-endpoint methods.

pub mod client;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::types::{
    Draft, DraftPick, League, PlayersById, Roster, TradedPick, Transaction, User,
};

/// One season of a league: settings, teams, and members.
#[derive(Debug, Clone)]
pub struct SeasonData {
    pub league: League,
    pub rosters: Vec<Roster>,
    pub users: Vec<User>,
}

/// Abstraction over the league API.
///
/// Implementors return already-validated records: malformed rows are
/// dropped before they reach the caller.
#[async_trait]
pub trait LeagueSource: Send + Sync {
    /// Fetch a league. Missing leagues are `DashboardError::LeagueNotFound`.
    async fn league(&self, league_id: &str) -> Result<League>;

    async fn rosters(&self, league_id: &str) -> Result<Vec<Roster>>;

    async fn users(&self, league_id: &str) -> Result<Vec<User>>;

    /// Transactions processed in one week of the season.
    async fn transactions(&self, league_id: &str, week: u32) -> Result<Vec<Transaction>>;

    /// The full player catalog. Large; implementations fetch it once.
    async fn players(&self) -> Result<Arc<PlayersById>>;

    /// Future picks that have changed hands. Empty when the league has none.
    async fn traded_picks(&self, league_id: &str) -> Result<Vec<TradedPick>>;

    /// Drafts attached to a single league season.
    async fn league_drafts(&self, league_id: &str) -> Result<Vec<Draft>>;

    /// Selections made in a draft. Empty for unknown drafts.
    async fn draft_picks(&self, draft_id: &str) -> Result<Vec<DraftPick>>;

    /// Resolve a username. Unknown names are `DashboardError::UserNotFound`.
    async fn user_id(&self, username: &str) -> Result<String>;

    /// A user's football leagues, optionally for one season.
    async fn user_leagues(&self, user_id: &str, season: Option<i32>) -> Result<Vec<League>>;

    /// Every week's transactions, fetched in parallel, newest first.
    /// A week that fails to load contributes nothing.
    async fn all_transactions(&self, league_id: &str, total_weeks: u32) -> Vec<Transaction> {
        let weeks = join_all((1..=total_weeks).map(|week| self.transactions(league_id, week))).await;

        let mut all: Vec<Transaction> = Vec::new();
        for (week, result) in (1..=total_weeks).zip(weeks) {
            match result {
                Ok(batch) => all.extend(batch),
                Err(e) => debug!(league_id, week, error = %e, "Transaction week unavailable"),
            }
        }

        all.sort_by(|a, b| b.status_updated.cmp(&a.status_updated));
        all
    }

    /// Follow `previous_league_id` back up to `max_years` seasons. Stops at
    /// the first season that fails to load.
    async fn league_history(&self, league_id: &str, max_years: usize) -> Vec<SeasonData> {
        let mut history = Vec::new();
        let mut current = Some(league_id.to_string());

        while let Some(id) = current.take() {
            if history.len() >= max_years {
                break;
            }
            let loaded = tokio::try_join!(self.league(&id), self.rosters(&id), self.users(&id));
            match loaded {
                Ok((league, rosters, users)) => {
                    current = league.previous_league().map(str::to_string);
                    history.push(SeasonData { league, rosters, users });
                }
                Err(e) => {
                    warn!(league_id = %id, error = %e, "League history walk stopped");
                    break;
                }
            }
        }
        history
    }

    /// One draft per season along the previous-season chain, up to
    /// `max_years` seasons. Drafts without an order are skipped.
    async fn drafts(&self, league_id: &str, max_years: usize) -> Vec<Draft> {
        let mut drafts = Vec::new();
        let mut seen_seasons: HashSet<String> = HashSet::new();
        let mut current = Some(league_id.to_string());

        while let Some(id) = current.take() {
            if seen_seasons.len() >= max_years {
                break;
            }
            let league = match self.league(&id).await {
                Ok(league) => league,
                Err(e) => {
                    warn!(league_id = %id, error = %e, "Draft walk stopped");
                    break;
                }
            };

            match self.league_drafts(&id).await {
                Ok(batch) => {
                    for draft in batch {
                        if draft.draft_order.is_none() || draft.draft_id.is_empty() {
                            continue;
                        }
                        if seen_seasons.insert(draft.season.clone()) {
                            drafts.push(draft);
                        }
                    }
                }
                Err(e) => debug!(league_id = %id, error = %e, "No drafts for season"),
            }

            current = league.previous_league().map(str::to_string);
        }
        drafts
    }

    /// Look a username up and list their leagues.
    async fn leagues_by_username(&self, username: &str, season: Option<i32>) -> Result<Vec<League>> {
        let user_id = self.user_id(username).await?;
        self.user_leagues(&user_id, season).await
    }
}
