//! Traded rookie-pick reconciliation.
//!
//! Merges the league's traded-pick feed with the current rosters to give
//! every team the full set of future picks it actually holds. Each original
//! pick (season, round, original team) ends up in exactly one place: with
//! the team that holds it now.
//!
//! The traded-pick feed is a current-state snapshot, not an event log. If
//! the same original pick shows up more than once, the record that comes
//! last in the feed wins.

use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

use crate::types::{Roster, RookiePick, TradedPick};

/// Rounds assumed for a season that never appears in the traded-pick feed.
pub const DEFAULT_MAX_ROUND: u32 = 4;

/// Inputs to reconciliation that don't come from the league feeds.
#[derive(Debug, Clone, PartialEq)]
pub struct PickSettings {
    pub max_round_default: u32,
    /// Seasons to project original picks for, in display order.
    pub future_seasons: Vec<String>,
}

/// (season, round, original roster)
type OriginKey<'a> = (&'a str, u32, u32);

/// (season, round, original roster, current holder)
type PickKey = (String, u32, u32, u32);

/// Per-season round ceiling: the deepest round seen in the feed for that
/// season, never shallower than `max_round_default`.
///
/// Every projected season gets an entry; seasons that only appear in the
/// feed are included too.
pub fn round_ceilings(traded: &[TradedPick], settings: &PickSettings) -> HashMap<String, u32> {
    let mut ceilings: HashMap<String, u32> = settings
        .future_seasons
        .iter()
        .map(|season| (season.clone(), settings.max_round_default))
        .collect();

    for pick in traded.iter().filter(|p| p.is_valid()) {
        let ceiling = ceilings
            .entry(pick.season.clone())
            .or_insert(settings.max_round_default);
        *ceiling = (*ceiling).max(pick.round);
    }
    ceilings
}

/// Compute the complete list of future rookie picks, one per
/// (season, round, original team, current holder).
///
/// Traded picks are attributed to their current holder and, when they have
/// left their original team, carry the original owner's user id for
/// "received from" display. Every owned roster then gets its own untraded
/// picks for each projected season up to that season's round ceiling.
///
/// Output is ordered by season, round, original roster, then holder.
pub fn reconcile(
    traded: &[TradedPick],
    rosters: &[Roster],
    settings: &PickSettings,
) -> Vec<RookiePick> {
    let owners: HashMap<u32, Option<&str>> = rosters
        .iter()
        .map(|roster| (roster.roster_id, roster.owner()))
        .collect();

    // Index the feed. Later records for the same original pick replace
    // earlier ones, so a pick that changed hands twice resolves to its
    // latest holder.
    let mut latest: HashMap<OriginKey<'_>, &TradedPick> = HashMap::new();
    let mut skipped = 0usize;
    for pick in traded {
        if !pick.is_valid() {
            debug!(season = %pick.season, round = pick.round, "Skipping invalid traded pick");
            skipped += 1;
            continue;
        }
        latest.insert((pick.season.as_str(), pick.round, pick.roster_id), pick);
    }

    let traded_away: HashSet<OriginKey<'_>> = latest
        .iter()
        .filter(|(_, pick)| pick.is_traded_away())
        .map(|(key, _)| *key)
        .collect();

    let ceilings = round_ceilings(traded, settings);
    let mut ledger: BTreeMap<PickKey, RookiePick> = BTreeMap::new();

    for pick in latest.values() {
        let owner_id = if pick.is_traded_away() {
            owners
                .get(&pick.roster_id)
                .copied()
                .flatten()
                .map(str::to_string)
        } else {
            None
        };

        ledger.insert(
            (pick.season.clone(), pick.round, pick.roster_id, pick.owner_id),
            RookiePick {
                season: pick.season.clone(),
                round: pick.round,
                original_slot: pick.original_slot(),
                original_roster_id: pick.roster_id,
                roster_id: pick.owner_id,
                owner_id,
            },
        );
    }

    // Orphaned rosters don't get projected picks of their own, but may
    // still hold picks traded to them above.
    for roster in rosters.iter().filter(|r| r.roster_id > 0 && r.owner().is_some()) {
        let id = roster.roster_id;
        for season in &settings.future_seasons {
            let ceiling = ceilings
                .get(season)
                .copied()
                .unwrap_or(settings.max_round_default);

            for round in 1..=ceiling {
                if traded_away.contains(&(season.as_str(), round, id)) {
                    continue;
                }
                ledger.insert(
                    (season.clone(), round, id, id),
                    RookiePick {
                        season: season.clone(),
                        round,
                        original_slot: id,
                        original_roster_id: id,
                        roster_id: id,
                        owner_id: None,
                    },
                );
            }
        }
    }

    debug!(
        traded = latest.len(),
        traded_away = traded_away.len(),
        skipped,
        picks = ledger.len(),
        "Rookie picks reconciled"
    );

    ledger.into_values().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
