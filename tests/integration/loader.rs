//! League loader end to end over the mock league source.

use std::sync::Arc;

use rookie_ledger::engine::LeagueLoader;
use rookie_ledger::picks::PickSettings;
use rookie_ledger::types::DashboardError;
use rookie_ledger::values::cache::ValueCache;
use rookie_ledger::values::calculator::Valuator;
use rookie_ledger::values::{LeagueFormat, QbFormat, ValuationMode};

use crate::mock_league::{trade_value, FixedValues, MockLeague};

fn settings() -> PickSettings {
    PickSettings {
        max_round_default: 4,
        future_seasons: vec!["2027".into(), "2028".into()],
    }
}

fn valued_loader(mock: MockLeague, values: Arc<FixedValues>) -> LeagueLoader {
    let cache = Arc::new(ValueCache::new(values));
    LeagueLoader::new(Arc::new(mock), settings()).with_valuator(Arc::new(Valuator::new(cache)))
}

fn feed() -> Vec<rookie_ledger::types::TradeValue> {
    vec![
        trade_value("joshallenqb", 6000.0, 9500.0),
        trade_value("jamarrchasewr", 8000.0, 8200.0),
    ]
}

#[tokio::test]
async fn test_load_builds_full_snapshot() {
    let values = Arc::new(FixedValues::new(feed()));
    let loader = valued_loader(MockLeague::two_team_dynasty(), Arc::clone(&values));

    let snapshot = loader.load("L1").await.unwrap();
    assert_eq!(snapshot.league.name, "Dynasty Degenerates");
    assert_eq!(snapshot.rosters.len(), 2);
    assert_eq!(snapshot.picks.len(), 16);

    let bobs = snapshot.picks_for_roster(2);
    assert_eq!(bobs.len(), 9);
    assert_eq!(bobs[0].to_string(), "2027 R1 (slot 1)");
    assert_eq!(snapshot.received_from(bobs[0]), Some("Tank Commanders"));
    assert_eq!(bobs[1].to_string(), "2027 R1 (slot 2)");
    assert_eq!(snapshot.received_from(bobs[1]), None);

    assert_eq!(snapshot.picks_for_roster(1).len(), 7);
    assert_eq!(snapshot.roster_owner_name(1), Some("Tank Commanders"));
    assert_eq!(snapshot.roster_owner_name(2), Some("Bob"));
    assert_eq!(snapshot.display_name("U2"), Some("Bob"));
    assert_eq!(snapshot.display_name("nobody"), None);

    let valuations = snapshot.valuations.as_ref().unwrap();
    assert_eq!(
        valuations.mode,
        ValuationMode::new(LeagueFormat::Dynasty, QbFormat::Superflex)
    );
    assert_eq!(snapshot.roster_value(1), Some(9500.0));
    assert_eq!(snapshot.roster_value(2), Some(8200.0));
    assert_eq!(valuations.by_player.len(), 2);
    assert!(!valuations.by_player.contains_key("9999"));

    // Roster totals and player values come off one fetch.
    assert_eq!(values.fetches(), 1);
}

#[tokio::test]
async fn test_reload_reuses_cached_values() {
    let values = Arc::new(FixedValues::new(feed()));
    let loader = valued_loader(MockLeague::two_team_dynasty(), Arc::clone(&values));

    loader.load("L1").await.unwrap();
    loader.load("L1").await.unwrap();
    assert_eq!(values.fetches(), 1);
}

#[tokio::test]
async fn test_traded_picks_failure_projects_originals() {
    let mock = MockLeague::two_team_dynasty();
    mock.fail("traded_picks");
    let loader = valued_loader(mock, Arc::new(FixedValues::new(feed())));

    let snapshot = loader.load("L1").await.unwrap();
    assert_eq!(snapshot.picks.len(), 16);
    assert!(snapshot.picks.iter().all(|p| !p.is_received()));
    assert!(snapshot.valuations.is_some());
}

#[tokio::test]
async fn test_value_feed_failure_leaves_no_valuations() {
    let loader = valued_loader(MockLeague::two_team_dynasty(), Arc::new(FixedValues::failing()));

    let snapshot = loader.load("L1").await.unwrap();
    assert!(snapshot.valuations.is_none());
    assert_eq!(snapshot.roster_value(1), None);
    assert_eq!(snapshot.picks.len(), 16);
}

#[tokio::test]
async fn test_player_catalog_failure_leaves_no_valuations() {
    let mock = MockLeague::two_team_dynasty();
    mock.fail("players");
    let values = Arc::new(FixedValues::new(feed()));
    let loader = valued_loader(mock, Arc::clone(&values));

    let snapshot = loader.load("L1").await.unwrap();
    assert!(snapshot.valuations.is_none());
    assert_eq!(values.fetches(), 0);
}

#[tokio::test]
async fn test_without_valuator_skips_catalog() {
    let mock = Arc::new(MockLeague::two_team_dynasty());
    let loader = LeagueLoader::new(mock.clone(), settings());

    let snapshot = loader.load("L1").await.unwrap();
    assert!(snapshot.valuations.is_none());
    assert_eq!(mock.calls("players"), 0);
}

#[tokio::test]
async fn test_required_fetch_failure_is_an_error() {
    let mock = MockLeague::two_team_dynasty();
    mock.fail("rosters");
    let loader = valued_loader(mock, Arc::new(FixedValues::new(feed())));

    assert!(loader.load("L1").await.is_err());
}

#[tokio::test]
async fn test_unknown_league() {
    let loader = valued_loader(MockLeague::two_team_dynasty(), Arc::new(FixedValues::new(feed())));

    let err = loader.load("nope").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DashboardError>(),
        Some(DashboardError::LeagueNotFound(id)) if id == "nope"
    ));
}

#[tokio::test]
async fn test_blank_league_id_rejected() {
    let mock = Arc::new(MockLeague::two_team_dynasty());
    let loader = LeagueLoader::new(mock.clone(), settings());

    let err = loader.load("   ").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DashboardError>(),
        Some(DashboardError::InvalidInput(_))
    ));
    assert_eq!(mock.calls("league"), 0);
}
