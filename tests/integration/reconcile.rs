//! Reconciliation against generated leagues.
//!
//! Feeds are produced by a small deterministic generator so every run
//! sees the same trade histories.

use std::collections::{HashMap, HashSet};

use rookie_ledger::picks::{reconcile, round_ceilings, PickSettings};
use rookie_ledger::types::{Roster, RookiePick, TradedPick};

/// Linear congruential generator; good enough to shuffle picks around.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

fn roster(id: u32, owner: Option<&str>) -> Roster {
    Roster {
        roster_id: id,
        owner_id: owner.map(String::from),
        league_id: Some("L1".into()),
        players: Vec::new(),
        starters: Vec::new(),
    }
}

fn settings() -> PickSettings {
    PickSettings {
        max_round_default: 4,
        future_seasons: vec!["2027".into(), "2028".into()],
    }
}

/// A league of `teams` rosters, each owned unless `orphan` names it.
fn league(teams: u32, orphan: Option<u32>) -> Vec<Roster> {
    (1..=teams)
        .map(|id| {
            let owner = format!("U{id}");
            roster(id, (Some(id) != orphan).then_some(owner.as_str()))
        })
        .collect()
}

/// A random sequence of trades, written the way the feed reports them:
/// one record per pick that moved, possibly repeated as it moves again.
fn random_feed(rng: &mut Lcg, teams: u32, trades: usize, rounds: u32) -> Vec<TradedPick> {
    let seasons = ["2027", "2028"];
    let mut holder: HashMap<(usize, u32, u32), u32> = HashMap::new();
    let mut feed = Vec::new();

    for _ in 0..trades {
        let season = rng.below(2) as usize;
        let round = rng.below(rounds as u64) as u32 + 1;
        let original = rng.below(teams as u64) as u32 + 1;
        let to = rng.below(teams as u64) as u32 + 1;
        let from = *holder.get(&(season, round, original)).unwrap_or(&original);
        holder.insert((season, round, original), to);
        feed.push(TradedPick {
            season: seasons[season].to_string(),
            round,
            roster_id: original,
            owner_id: to,
            previous_owner_id: Some(from),
            original_slot: None,
        });
    }
    feed
}

fn origin(pick: &RookiePick) -> (String, u32, u32) {
    (pick.season.clone(), pick.round, pick.original_roster_id)
}

#[test]
fn test_every_original_pick_appears_once() {
    let mut rng = Lcg(7);
    for case in 0..50 {
        let teams = 4 + (case % 9) as u32;
        let rosters = league(teams, None);
        let feed = random_feed(&mut rng, teams, 5 + case * 3, 5);
        let settings = settings();

        let picks = reconcile(&feed, &rosters, &settings);
        let ceilings = round_ceilings(&feed, &settings);

        let mut seen: HashSet<(String, u32, u32)> = HashSet::new();
        for pick in &picks {
            assert!(seen.insert(origin(pick)), "case {case}: duplicate {pick:?}");
        }

        for season in &settings.future_seasons {
            for id in 1..=teams {
                for round in 1..=ceilings[season] {
                    assert!(
                        seen.contains(&(season.clone(), round, id)),
                        "case {case}: missing {season} R{round} of roster {id}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_traded_away_picks_leave_the_original_team() {
    let mut rng = Lcg(42);
    let rosters = league(10, None);
    let feed = random_feed(&mut rng, 10, 60, 4);
    let picks = reconcile(&feed, &rosters, &settings());

    let mut final_holder: HashMap<(String, u32, u32), u32> = HashMap::new();
    for record in &feed {
        final_holder.insert(
            (record.season.clone(), record.round, record.roster_id),
            record.owner_id,
        );
    }

    for pick in &picks {
        if let Some(holder) = final_holder.get(&origin(pick)) {
            assert_eq!(pick.roster_id, *holder, "{pick:?} should be with roster {holder}");
        } else {
            assert_eq!(pick.roster_id, pick.original_roster_id);
        }
    }
}

#[test]
fn test_received_picks_carry_the_original_owner() {
    let mut rng = Lcg(99);
    let rosters = league(8, None);
    let feed = random_feed(&mut rng, 8, 40, 4);

    for pick in reconcile(&feed, &rosters, &settings()) {
        if pick.is_received() {
            let expected = format!("U{}", pick.original_roster_id);
            assert_eq!(pick.owner_id.as_deref(), Some(expected.as_str()));
        } else {
            assert_eq!(pick.owner_id, None);
        }
    }
}

#[test]
fn test_reconcile_is_deterministic() {
    let mut rng = Lcg(3);
    let rosters = league(12, Some(5));
    let feed = random_feed(&mut rng, 12, 80, 5);

    let first = reconcile(&feed, &rosters, &settings());
    let second = reconcile(&feed, &rosters, &settings());
    assert_eq!(first, second);
}

#[test]
fn test_sixteen_picks_for_two_teams_without_trades() {
    let rosters = league(2, None);
    let picks = reconcile(&[], &rosters, &settings());

    assert_eq!(picks.len(), 16);
    for id in [1, 2] {
        let held: Vec<_> = picks.iter().filter(|p| p.roster_id == id).collect();
        assert_eq!(held.len(), 8);
        assert!(held.iter().all(|p| !p.is_received() && p.original_slot == id));
    }
}

#[test]
fn test_orphaned_original_still_resolves_to_holder() {
    // Roster 3 has no owner. Its traded 2027 second goes to roster 1 with
    // no owner attribution, and it gets no projected picks of its own.
    let rosters = league(3, Some(3));
    let feed = vec![TradedPick {
        season: "2027".into(),
        round: 2,
        roster_id: 3,
        owner_id: 1,
        previous_owner_id: Some(3),
        original_slot: None,
    }];

    let picks = reconcile(&feed, &rosters, &settings());
    let received: Vec<_> = picks.iter().filter(|p| p.original_roster_id == 3).collect();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].roster_id, 1);
    assert_eq!(received[0].owner_id, None);
    assert!(picks.iter().all(|p| p.roster_id != 3));
}
