//! Multi-request walks provided by `LeagueSource`.

use serde_json::json;

use rookie_ledger::sleeper::LeagueSource;
use rookie_ledger::types::DashboardError;

use crate::mock_league::{draft, league, roster, transaction, MockLeague};

/// Three chained seasons: L1 (2026) → L0 (2025) → LP (2024).
fn chained() -> MockLeague {
    let mut mock = MockLeague::two_team_dynasty();
    mock.leagues.insert(
        "L0".into(),
        league(json!({"league_id": "L0", "name": "Dynasty Degenerates", "season": 2025,
                      "previous_league_id": "LP"})),
    );
    mock.leagues.insert(
        "LP".into(),
        league(json!({"league_id": "LP", "name": "Founding Year", "season": "2024",
                      "previous_league_id": "0"})),
    );
    mock.rosters.insert("L0".into(), vec![roster(json!({"roster_id": 1, "owner_id": "U1"}))]);
    mock
}

#[tokio::test]
async fn test_history_follows_previous_seasons() {
    let mock = chained();
    let history = mock.league_history("L1", 5).await;

    let seasons: Vec<&str> = history.iter().map(|s| s.league.season.as_str()).collect();
    assert_eq!(seasons, vec!["2026", "2025", "2024"]);
    assert_eq!(history[1].rosters.len(), 1);
    assert!(history[2].rosters.is_empty());
}

#[tokio::test]
async fn test_history_respects_year_limit() {
    let mock = chained();
    let history = mock.league_history("L1", 2).await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].league.league_id, "L0");
}

#[tokio::test]
async fn test_history_stops_at_missing_season() {
    let mut mock = chained();
    mock.leagues.remove("LP");
    let history = mock.league_history("L1", 5).await;
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn test_drafts_one_per_season() {
    let mut mock = chained();
    mock.drafts.insert(
        "L1".into(),
        vec![
            draft(json!({"draft_id": "D1", "season": "2026", "status": "complete",
                         "draft_order": {"U1": 1, "U2": 2}})),
            draft(json!({"draft_id": "D1b", "season": "2026", "status": "complete",
                         "draft_order": {"U1": 2, "U2": 1}})),
        ],
    );
    mock.drafts.insert(
        "L0".into(),
        vec![
            draft(json!({"draft_id": "D0-pending", "season": "2025", "status": "pre_draft"})),
            draft(json!({"draft_id": "D0", "season": "2025", "status": "complete",
                         "draft_order": {"U1": 1}})),
        ],
    );

    let drafts = mock.drafts("L1", 5).await;
    let ids: Vec<&str> = drafts.iter().map(|d| d.draft_id.as_str()).collect();
    assert_eq!(ids, vec!["D1", "D0"]);
}

#[tokio::test]
async fn test_all_transactions_newest_first_skipping_failed_weeks() {
    let mut mock = MockLeague::two_team_dynasty();
    mock.transactions.insert(
        ("L1".into(), 1),
        vec![transaction(json!({"transaction_id": "t1", "type": "waiver", "status_updated": 100}))],
    );
    mock.transactions.insert(
        ("L1".into(), 2),
        vec![transaction(json!({"transaction_id": "t2", "type": "trade", "status_updated": 300}))],
    );
    mock.transactions.insert(
        ("L1".into(), 3),
        vec![transaction(json!({"transaction_id": "t3", "type": "free_agent", "status_updated": 200}))],
    );
    mock.fail("transactions/3");

    let all = mock.all_transactions("L1", 4).await;
    let ids: Vec<&str> = all.iter().map(|t| t.transaction_id.as_str()).collect();
    assert_eq!(ids, vec!["t2", "t1"]);
    assert_eq!(mock.calls("transactions/4"), 1);
}

#[tokio::test]
async fn test_leagues_by_username() {
    let mut mock = MockLeague::two_team_dynasty();
    mock.usernames.insert("alice".into(), "U1".into());
    let l1 = mock.leagues["L1"].clone();
    mock.user_leagues.insert("U1".into(), vec![l1]);

    let leagues = mock.leagues_by_username("alice", Some(2026)).await.unwrap();
    assert_eq!(leagues.len(), 1);
    assert_eq!(leagues[0].league_id, "L1");

    let err = mock.leagues_by_username("mallory", None).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DashboardError>(),
        Some(DashboardError::UserNotFound(_))
    ));
}
