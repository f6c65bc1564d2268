//! Shared types for the league dashboard core.
//!
//! These mirror the upstream league API's JSON shapes, but with explicit
//! optional fields. Feeds are ingested record-by-record: a record that fails
//! to deserialize or validate is skipped, never propagated half-formed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

// ---------------------------------------------------------------------------
// Deserialization helpers
// ---------------------------------------------------------------------------

/// Treat an explicit JSON `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Seasons arrive as `"2026"` from most endpoints and as `2026` from a few.
fn season_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSeason {
        Text(String),
        Number(i64),
    }

    match RawSeason::deserialize(deserializer)? {
        RawSeason::Text(s) => Ok(s.trim().to_string()),
        RawSeason::Number(n) => Ok(n.to_string()),
    }
}

/// Deserialize each raw JSON value into `T`, dropping the ones that don't fit.
pub fn parse_records<T: DeserializeOwned>(raw: Vec<serde_json::Value>, kind: &str) -> Vec<T> {
    let total = raw.len();
    let records: Vec<T> = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<T>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(kind, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect();

    if records.len() < total {
        debug!(kind, kept = records.len(), skipped = total - records.len(), "Feed ingested");
    }
    records
}

// ---------------------------------------------------------------------------
// League
// ---------------------------------------------------------------------------

/// A league as returned by `/league/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct League {
    pub league_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "season_string")]
    pub season: String,
    #[serde(default, deserialize_with = "nullable")]
    pub total_rosters: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub sport: String,
    #[serde(default)]
    pub previous_league_id: Option<String>,
    /// Loosely-typed numeric settings (`type`, `draft_rounds`, ...).
    #[serde(default, deserialize_with = "nullable")]
    pub settings: HashMap<String, serde_json::Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub roster_positions: Vec<String>,
}

impl League {
    /// Read an integer-valued setting, if present and numeric.
    pub fn setting(&self, key: &str) -> Option<i64> {
        self.settings.get(key).and_then(|v| v.as_i64())
    }

    /// The previous season's league id, ignoring empty and `"0"` placeholders.
    pub fn previous_league(&self) -> Option<&str> {
        self.previous_league_id
            .as_deref()
            .filter(|id| !id.is_empty() && *id != "0")
    }
}

// ---------------------------------------------------------------------------
// Rosters and users
// ---------------------------------------------------------------------------

/// A team: one league member's collection of players.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Roster {
    pub roster_id: u32,
    /// The owning user's id. `None` for orphaned rosters.
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub league_id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub players: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub starters: Vec<String>,
}

impl Roster {
    /// The owning user id, treating an empty string as unowned.
    pub fn owner(&self) -> Option<&str> {
        self.owner_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Enforce `starters ⊆ players`. Empty lineup slots come through as
    /// `"0"` and are dropped along with anything not on the roster.
    pub fn normalized(mut self) -> Self {
        let players = &self.players;
        self.starters.retain(|id| players.contains(id));
        self
    }
}

/// A league member, from `/league/{id}/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub username: String,
    #[serde(default, deserialize_with = "nullable")]
    pub display_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub metadata: UserMetadata,
    #[serde(default)]
    pub is_owner: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserMetadata {
    #[serde(default)]
    pub team_name: Option<String>,
}

impl User {
    /// Team name if the user set one, otherwise display name, otherwise username.
    pub fn label(&self) -> &str {
        self.metadata
            .team_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| Some(self.display_name.as_str()).filter(|n| !n.is_empty()))
            .unwrap_or(self.username.as_str())
    }
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// A player from the `/players/nfl` catalog.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Player {
    #[serde(default, deserialize_with = "nullable")]
    pub player_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub first_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub last_name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub position: String,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Player {
    pub fn display_name(&self) -> String {
        match self.full_name.as_deref() {
            Some(full) if !full.trim().is_empty() => full.to_string(),
            _ => format!("{} {}", self.first_name, self.last_name).trim().to_string(),
        }
    }
}

/// Player catalog keyed by player id.
pub type PlayersById = HashMap<String, Player>;

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    /// "trade" | "waiver" | "free_agent" | "commissioner"
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "nullable")]
    pub creator: String,
    #[serde(default, deserialize_with = "nullable")]
    pub created: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub status_updated: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub leg: u32,
    /// Player id → receiving roster id.
    #[serde(default)]
    pub adds: Option<HashMap<String, u32>>,
    /// Player id → releasing roster id.
    #[serde(default)]
    pub drops: Option<HashMap<String, u32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub roster_ids: Vec<u32>,
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub draft_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub league_id: String,
    #[serde(deserialize_with = "season_string")]
    pub season: String,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub draft_type: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    #[serde(default)]
    pub start_time: Option<i64>,
    /// User id → draft slot. Absent until the order is set.
    #[serde(default)]
    pub draft_order: Option<HashMap<String, u32>>,
    #[serde(default)]
    pub slot_to_roster_id: Option<HashMap<String, u32>>,
}

/// A selection made in a completed or in-progress draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPick {
    #[serde(default, deserialize_with = "nullable")]
    pub player_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub picked_by: String,
    #[serde(default, deserialize_with = "nullable")]
    pub roster_id: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub round: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub draft_slot: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub pick_no: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub metadata: DraftPickMetadata,
    #[serde(default)]
    pub is_keeper: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub draft_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DraftPickMetadata {
    #[serde(default, deserialize_with = "nullable")]
    pub first_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub last_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub position: String,
    #[serde(default, deserialize_with = "nullable")]
    pub team: String,
}

impl DraftPick {
    /// Whether the pick carries enough to be shown on a draft board.
    pub fn is_complete(&self) -> bool {
        !self.metadata.first_name.is_empty()
            && !self.metadata.last_name.is_empty()
            && !self.metadata.position.is_empty()
            && self.draft_slot > 0
            && self.round > 0
            && !self.picked_by.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Traded picks
// ---------------------------------------------------------------------------

/// Deepest round a traded-pick record may name. Anything past this is
/// treated as malformed.
pub const MAX_DRAFT_ROUNDS: u32 = 25;

/// A future draft pick that has changed hands, from `/league/{id}/traded_picks`.
///
/// `owner_id` is a roster id (the current holder), not a user id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TradedPick {
    #[serde(deserialize_with = "season_string")]
    pub season: String,
    pub round: u32,
    /// Roster the pick originally belonged to.
    pub roster_id: u32,
    /// Roster currently holding the pick.
    pub owner_id: u32,
    #[serde(default)]
    pub previous_owner_id: Option<u32>,
    #[serde(default)]
    pub original_slot: Option<u32>,
}

impl TradedPick {
    /// Draft-order position the pick corresponds to. The feed usually omits
    /// it, in which case it is the original roster's own slot.
    pub fn original_slot(&self) -> u32 {
        self.original_slot.unwrap_or(self.roster_id)
    }

    /// The pick sits with someone other than its original team.
    pub fn is_traded_away(&self) -> bool {
        self.owner_id != self.roster_id
    }

    /// A usable record: a numeric season and a round in `1..=MAX_DRAFT_ROUNDS`.
    pub fn is_valid(&self) -> bool {
        (1..=MAX_DRAFT_ROUNDS).contains(&self.round)
            && !self.season.is_empty()
            && self.season.chars().all(|c| c.is_ascii_digit())
    }
}

// ---------------------------------------------------------------------------
// Rookie picks (derived)
// ---------------------------------------------------------------------------

/// A future rookie-draft pick as held after reconciliation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct RookiePick {
    pub season: String,
    pub round: u32,
    pub original_slot: u32,
    /// Team the pick was created for.
    pub original_roster_id: u32,
    /// Team currently holding the pick.
    pub roster_id: u32,
    /// User id of the original team's owner; only set on picks received in a trade.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl RookiePick {
    pub fn is_received(&self) -> bool {
        self.roster_id != self.original_roster_id
    }
}

impl fmt::Display for RookiePick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} R{} (slot {})", self.season, self.round, self.original_slot)
    }
}

// ---------------------------------------------------------------------------
// Trade values
// ---------------------------------------------------------------------------

/// One row of the player trade-value feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeValue {
    pub name_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub trade_value: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub sf_trade_value: f64,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("League not found: {0}")]
    LeagueNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Upstream error ({source_name}): {message}")]
    Upstream { source_name: String, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
