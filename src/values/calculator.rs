//! Per-player and per-roster trade values.
//!
//! A player with no matching feed row has no value (`None`), which is not
//! the same as a value of zero. Roster totals count such players as zero.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::cache::{ValuationError, ValueCache, ValueMap};
use super::matcher::{NameIdMatcher, PlayerMatcher};
use super::ValuationMode;
use crate::types::{Player, PlayersById, Roster};

/// A player's value under `mode`, if the feed knows them.
pub fn value_in(
    map: &ValueMap,
    player: &Player,
    mode: ValuationMode,
    matcher: &dyn PlayerMatcher,
) -> Option<f64> {
    map.lookup(player, matcher).map(|row| mode.select(row))
}

/// Sum of known values over a roster's player ids. Ids missing from the
/// catalog and players missing from the feed add nothing.
pub fn roster_total(
    map: &ValueMap,
    player_ids: &[String],
    players: &PlayersById,
    mode: ValuationMode,
    matcher: &dyn PlayerMatcher,
) -> f64 {
    player_ids
        .iter()
        .filter_map(|id| players.get(id))
        .filter_map(|player| value_in(map, player, mode, matcher))
        .sum()
}

/// Trade-value lookups backed by a shared [`ValueCache`].
pub struct Valuator {
    cache: Arc<ValueCache>,
    matcher: Arc<dyn PlayerMatcher>,
}

impl Valuator {
    pub fn new(cache: Arc<ValueCache>) -> Self {
        Self::with_matcher(cache, Arc::new(NameIdMatcher))
    }

    pub fn with_matcher(cache: Arc<ValueCache>, matcher: Arc<dyn PlayerMatcher>) -> Self {
        Self { cache, matcher }
    }

    /// A single player's value. A feed failure reads as "no value".
    pub async fn value_of(&self, player: &Player, mode: ValuationMode) -> Option<f64> {
        match self.cache.get(mode).await {
            Ok(map) => value_in(&map, player, mode, &*self.matcher),
            Err(e) => {
                warn!(player = %player.display_name(), error = %e, "No trade values available");
                None
            }
        }
    }

    /// Values for every matchable player, keyed by player id.
    pub async fn player_values<'a, I>(
        &self,
        players: I,
        mode: ValuationMode,
    ) -> Result<HashMap<String, f64>, ValuationError>
    where
        I: IntoIterator<Item = &'a Player>,
    {
        let map = self.cache.get(mode).await?;
        let mut total = 0usize;
        let values: HashMap<String, f64> = players
            .into_iter()
            .inspect(|_| total += 1)
            .filter_map(|player| {
                value_in(&map, player, mode, &*self.matcher).map(|v| (player.player_id.clone(), v))
            })
            .collect();

        info!(matched = values.len(), total, %mode, "Matched players with trade values");
        Ok(values)
    }

    /// Total value of one roster. A feed failure yields zero.
    pub async fn roster_value(
        &self,
        player_ids: &[String],
        players: &PlayersById,
        mode: ValuationMode,
    ) -> f64 {
        match self.cache.get(mode).await {
            Ok(map) => roster_total(&map, player_ids, players, mode, &*self.matcher),
            Err(e) => {
                warn!(error = %e, "Roster value unavailable");
                0.0
            }
        }
    }

    /// Totals for every roster off a single snapshot, keyed by roster id.
    pub async fn roster_values(
        &self,
        rosters: &[Roster],
        players: &PlayersById,
        mode: ValuationMode,
    ) -> Result<HashMap<u32, f64>, ValuationError> {
        let map = self.cache.get(mode).await?;
        Ok(rosters
            .iter()
            .map(|roster| {
                let total = roster_total(&map, &roster.players, players, mode, &*self.matcher);
                (roster.roster_id, total)
            })
            .collect())
    }
}
