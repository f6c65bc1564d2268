//! ROOKIE LEDGER — dynasty league dashboard core
//!
//! Entry point. Loads configuration, initialises structured logging, and
//! either runs the trade-value relay (`serve`, the default) or prints a
//! league report to stdout:
//!
//! ```text
//! rookie-ledger [serve]
//! rookie-ledger picks <league_id>
//! rookie-ledger leagues <username>
//! rookie-ledger history <league_id>
//! ```

use anyhow::{bail, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use rookie_ledger::config::{self, AppConfig};
use rookie_ledger::engine::{LeagueLoader, LeagueSnapshot};
use rookie_ledger::league::search_seasons;
use rookie_ledger::relay;
use rookie_ledger::relay::routes::RelayState;
use rookie_ledger::sleeper::client::SleeperClient;
use rookie_ledger::sleeper::LeagueSource;
use rookie_ledger::values::cache::{SystemClock, ValueCache};
use rookie_ledger::values::calculator::Valuator;
use rookie_ledger::values::client::RelayValueSource;

const USAGE: &str = "usage: rookie-ledger [serve | picks <league_id> | leagues <username> | history <league_id>]";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let path = std::env::var("ROOKIE_LEDGER_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let cfg = AppConfig::load_or_default(&path)?;

    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["serve"] => serve(&cfg).await,
        ["picks", league_id] => print_picks(&cfg, league_id).await,
        ["leagues", username] => print_leagues(&cfg, username).await,
        ["history", league_id] => print_history(&cfg, league_id).await,
        _ => bail!("{USAGE}"),
    }
}

async fn serve(cfg: &AppConfig) -> Result<()> {
    info!(
        port = cfg.relay.port,
        upstream = %cfg.relay.upstream_base_url,
        max_age_secs = cfg.relay.cache_max_age_secs,
        "ROOKIE LEDGER relay starting up"
    );
    let state = Arc::new(RelayState::new(
        &cfg.relay.upstream_base_url,
        cfg.relay.cache_max_age_secs,
    )?);
    relay::serve(state, cfg.relay.port).await
}

fn sleeper(cfg: &config::SleeperConfig) -> Result<Arc<SleeperClient>> {
    Ok(Arc::new(SleeperClient::new(&cfg.base_url, cfg.timeout_secs)?))
}

async fn print_picks(cfg: &AppConfig, league_id: &str) -> Result<()> {
    let source = sleeper(&cfg.sleeper)?;
    let cache = ValueCache::with_clock(
        Arc::new(RelayValueSource::new(&cfg.values.relay_url)?),
        Arc::new(SystemClock),
        chrono::Duration::hours(cfg.values.cache_ttl_hours),
    );
    let valuator = Valuator::new(Arc::new(cache));

    let loader = LeagueLoader::new(source, cfg.picks.settings(Utc::now().date_naive()))
        .with_valuator(Arc::new(valuator));
    let snapshot = loader.load(league_id).await?;

    print_snapshot(&snapshot);
    Ok(())
}

fn print_snapshot(snapshot: &LeagueSnapshot) {
    println!("{} ({})", snapshot.league.name, snapshot.league.season);
    if let Some(valuations) = &snapshot.valuations {
        println!("Trade values: {}", valuations.mode);
    }

    let mut rosters: Vec<_> = snapshot.rosters.iter().collect();
    rosters.sort_by_key(|roster| roster.roster_id);

    for roster in rosters {
        let owner = snapshot.roster_owner_name(roster.roster_id).unwrap_or("(unowned)");
        match snapshot.roster_value(roster.roster_id) {
            Some(total) => println!("\n#{} {owner}: value {total:.0}", roster.roster_id),
            None => println!("\n#{} {owner}", roster.roster_id),
        }

        let picks = snapshot.picks_for_roster(roster.roster_id);
        if picks.is_empty() {
            println!("  no future picks");
        }
        for pick in picks {
            match snapshot.received_from(pick) {
                Some(from) => println!("  {pick}  via {from}"),
                None if pick.is_received() => println!("  {pick}  via roster #{}", pick.original_roster_id),
                None => println!("  {pick}"),
            }
        }
    }
}

async fn print_leagues(cfg: &AppConfig, username: &str) -> Result<()> {
    let source = sleeper(&cfg.sleeper)?;
    let user_id = source.user_id(username).await?;

    for season in search_seasons(Utc::now().date_naive()) {
        let leagues = source.user_leagues(&user_id, Some(season)).await?;
        if leagues.is_empty() {
            continue;
        }
        println!("{season}");
        for league in leagues {
            println!("  {}  {} ({} teams)", league.league_id, league.name, league.total_rosters);
        }
    }
    Ok(())
}

async fn print_history(cfg: &AppConfig, league_id: &str) -> Result<()> {
    let source = sleeper(&cfg.sleeper)?;

    let (history, drafts, transactions) = tokio::join!(
        source.league_history(league_id, cfg.sleeper.history_years),
        source.drafts(league_id, cfg.sleeper.history_years),
        source.all_transactions(league_id, cfg.sleeper.total_weeks),
    );
    if history.is_empty() {
        bail!("League {league_id} could not be loaded");
    }

    for season in &history {
        println!(
            "{} {}: {} rosters, {} members",
            season.league.season,
            season.league.name,
            season.rosters.len(),
            season.users.len()
        );
    }
    for draft in &drafts {
        let picks = source.draft_picks(&draft.draft_id).await?;
        println!("Draft {} ({}): {} selections", draft.season, draft.status, picks.len());
    }
    println!("{} transactions this season", transactions.len());
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rookie_ledger=info"));

    let json_logging = std::env::var("ROOKIE_LEDGER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
