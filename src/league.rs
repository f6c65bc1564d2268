//! League format detection and season arithmetic.
//!
//! The upstream league API encodes format loosely: dynasty-ness lives in
//! `settings.type` (0 = redraft, 1 = keeper, 2 = dynasty) and superflex is
//! only visible through the roster slot list.

use chrono::{Datelike, NaiveDate};

use crate::types::League;
use crate::values::{LeagueFormat, QbFormat, ValuationMode};

/// Dynasty or keeper leagues carry rosters across seasons.
pub fn is_dynasty_league(league: &League) -> bool {
    matches!(league.setting("type"), Some(kind) if kind != 0)
}

/// A league is superflex if it has a `SUPER_FLEX` slot, or a `FLEX` slot
/// alongside more than one dedicated `QB` slot.
pub fn is_superflex_league(league: &League) -> bool {
    let positions = &league.roster_positions;
    if positions.iter().any(|p| p == "SUPER_FLEX") {
        return true;
    }
    let has_flex = positions.iter().any(|p| p == "FLEX");
    let qb_slots = positions.iter().filter(|p| *p == "QB").count();
    has_flex && qb_slots > 1
}

/// Pick the trade-value feed and field that fit this league.
pub fn valuation_mode(league: &League) -> ValuationMode {
    ValuationMode {
        format: if is_dynasty_league(league) {
            LeagueFormat::Dynasty
        } else {
            LeagueFormat::Redraft
        },
        qb: if is_superflex_league(league) {
            QbFormat::Superflex
        } else {
            QbFormat::SingleQb
        },
    }
}

/// Seasons whose rookie picks are projected: the next two calendar years.
pub fn future_draft_seasons(today: NaiveDate) -> Vec<String> {
    let year = today.year();
    vec![(year + 1).to_string(), (year + 2).to_string()]
}

/// Seasons to search when looking a user's leagues up: this year and last,
/// so leagues that straddle the new year are still found.
pub fn search_seasons(today: NaiveDate) -> Vec<i32> {
    let year = today.year();
    vec![year, year - 1]
}
