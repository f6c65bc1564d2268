//! League loader — assembles everything the dashboard shows for a league.
//!
//! League, rosters and users are fetched in parallel and are required.
//! Traded picks and valuations are follow-ups: each can fail on its own and
//! the snapshot is still produced, with untraded picks only or with no
//! valuations respectively.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::league::valuation_mode;
use crate::picks::{reconcile, PickSettings};
use crate::sleeper::LeagueSource;
use crate::types::{DashboardError, League, RookiePick, Roster, User};
use crate::values::calculator::Valuator;
use crate::values::ValuationMode;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Trade values for the rostered players of one league.
#[derive(Debug, Clone)]
pub struct RosterValuations {
    pub mode: ValuationMode,
    /// Roster id → summed value of its players.
    pub by_roster: HashMap<u32, f64>,
    /// Player id → value, for rostered players the feed knows.
    pub by_player: HashMap<String, f64>,
}

/// Everything loaded for one league, recomputed on every refresh.
#[derive(Debug, Clone)]
pub struct LeagueSnapshot {
    pub league: League,
    pub rosters: Vec<Roster>,
    pub users: Vec<User>,
    pub picks: Vec<RookiePick>,
    /// `None` when the value feed or player catalog was unavailable.
    pub valuations: Option<RosterValuations>,
}

impl LeagueSnapshot {
    /// Picks a roster holds, by season, then round, then slot.
    pub fn picks_for_roster(&self, roster_id: u32) -> Vec<&RookiePick> {
        let mut held: Vec<&RookiePick> = self
            .picks
            .iter()
            .filter(|pick| pick.roster_id == roster_id)
            .collect();
        held.sort_by(|a, b| {
            (a.season.as_str(), a.round, a.original_slot)
                .cmp(&(b.season.as_str(), b.round, b.original_slot))
        });
        held
    }

    pub fn display_name(&self, user_id: &str) -> Option<&str> {
        self.users
            .iter()
            .find(|user| user.user_id == user_id)
            .map(User::label)
    }

    /// Display name of whoever owns `roster_id` now.
    pub fn roster_owner_name(&self, roster_id: u32) -> Option<&str> {
        self.rosters
            .iter()
            .find(|roster| roster.roster_id == roster_id)
            .and_then(Roster::owner)
            .and_then(|user_id| self.display_name(user_id))
    }

    /// "Received from" label for a traded pick.
    pub fn received_from(&self, pick: &RookiePick) -> Option<&str> {
        pick.owner_id.as_deref().and_then(|user_id| self.display_name(user_id))
    }

    pub fn roster_value(&self, roster_id: u32) -> Option<f64> {
        self.valuations
            .as_ref()
            .and_then(|v| v.by_roster.get(&roster_id).copied())
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

pub struct LeagueLoader {
    source: Arc<dyn LeagueSource>,
    valuator: Option<Arc<Valuator>>,
    settings: PickSettings,
}

impl LeagueLoader {
    pub fn new(source: Arc<dyn LeagueSource>, settings: PickSettings) -> Self {
        Self {
            source,
            valuator: None,
            settings,
        }
    }

    /// Attach trade values. Without a valuator, snapshots carry none.
    pub fn with_valuator(mut self, valuator: Arc<Valuator>) -> Self {
        self.valuator = Some(valuator);
        self
    }

    pub async fn load(&self, league_id: &str) -> Result<LeagueSnapshot> {
        let league_id = league_id.trim();
        if league_id.is_empty() {
            return Err(DashboardError::InvalidInput("league id is empty".into()).into());
        }

        info!(league_id, "Loading league");

        let (league, rosters, users) = tokio::try_join!(
            self.source.league(league_id),
            self.source.rosters(league_id),
            self.source.users(league_id),
        )?;

        let (picks, valuations) = tokio::join!(
            self.load_picks(league_id, &rosters),
            self.load_valuations(&league, &rosters),
        );

        info!(
            league = %league.name,
            rosters = rosters.len(),
            users = users.len(),
            picks = picks.len(),
            valued = valuations.is_some(),
            "League loaded"
        );

        Ok(LeagueSnapshot {
            league,
            rosters,
            users,
            picks,
            valuations,
        })
    }

    async fn load_picks(&self, league_id: &str, rosters: &[Roster]) -> Vec<RookiePick> {
        let traded = match self.source.traded_picks(league_id).await {
            Ok(traded) => traded,
            Err(e) => {
                warn!(league_id, error = %e, "Traded picks unavailable, projecting originals only");
                Vec::new()
            }
        };
        reconcile(&traded, rosters, &self.settings)
    }

    async fn load_valuations(&self, league: &League, rosters: &[Roster]) -> Option<RosterValuations> {
        let valuator = self.valuator.as_ref()?;
        let mode = valuation_mode(league);

        let players = match self.source.players().await {
            Ok(players) => players,
            Err(e) => {
                warn!(error = %e, "Player catalog unavailable, skipping trade values");
                return None;
            }
        };

        let by_roster = match valuator.roster_values(rosters, &players, mode).await {
            Ok(totals) => totals,
            Err(e) => {
                warn!(error = %e, "Trade values unavailable");
                return None;
            }
        };

        let rostered = rosters
            .iter()
            .flat_map(|roster| roster.players.iter())
            .filter_map(|id| players.get(id));
        let by_player = valuator.player_values(rostered, mode).await.ok()?;

        Some(RosterValuations {
            mode,
            by_roster,
            by_player,
        })
    }
}
