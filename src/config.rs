//! Configuration loading from TOML.
//!
//! Reads `config.toml` into strongly-typed structs. Every section and key
//! has a default, so a missing section falls back to the public endpoints
//! and the stock pick/cache settings.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;

use crate::league::future_draft_seasons;
use crate::picks::{PickSettings, DEFAULT_MAX_ROUND};
use crate::relay::routes::{DEFAULT_CACHE_MAX_AGE_SECS, DEFAULT_UPSTREAM_BASE_URL};
use crate::sleeper::client::DEFAULT_BASE_URL;
use crate::types::{DashboardError, MAX_DRAFT_ROUNDS};

/// Upper bound on the value cache TTL: one year.
const MAX_CACHE_TTL_HOURS: i64 = 24 * 365;
use crate::values::cache::DEFAULT_TTL_HOURS;
use crate::values::client::DEFAULT_RELAY_URL;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub sleeper: SleeperConfig,
    pub picks: PicksConfig,
    pub values: ValuesConfig,
    pub relay: RelayConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SleeperConfig {
    pub base_url: String,
    /// Weeks walked when collecting a season's transactions.
    pub total_weeks: u32,
    /// Seasons followed back through `previous_league_id`.
    pub history_years: usize,
    pub timeout_secs: u64,
}

impl Default for SleeperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            total_weeks: 18,
            history_years: 3,
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PicksConfig {
    pub max_round_default: u32,
    /// Fixed projection seasons. When unset, the next two seasons after
    /// today are used.
    pub future_seasons: Option<Vec<String>>,
}

impl Default for PicksConfig {
    fn default() -> Self {
        Self {
            max_round_default: DEFAULT_MAX_ROUND,
            future_seasons: None,
        }
    }
}

impl PicksConfig {
    /// Reconciliation settings as of `today`.
    pub fn settings(&self, today: NaiveDate) -> PickSettings {
        PickSettings {
            max_round_default: self.max_round_default,
            future_seasons: self
                .future_seasons
                .clone()
                .unwrap_or_else(|| future_draft_seasons(today)),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ValuesConfig {
    pub relay_url: String,
    pub cache_ttl_hours: i64,
}

impl Default for ValuesConfig {
    fn default() -> Self {
        Self {
            relay_url: DEFAULT_RELAY_URL.to_string(),
            cache_ttl_hours: DEFAULT_TTL_HOURS,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RelayConfig {
    pub port: u16,
    pub upstream_base_url: String,
    pub cache_max_age_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            cache_max_age_secs: DEFAULT_CACHE_MAX_AGE_SECS,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=MAX_DRAFT_ROUNDS).contains(&self.picks.max_round_default) {
            return Err(DashboardError::Config(format!(
                "picks.max_round_default must be between 1 and {MAX_DRAFT_ROUNDS}"
            ))
            .into());
        }
        if !(1..=MAX_CACHE_TTL_HOURS).contains(&self.values.cache_ttl_hours) {
            return Err(DashboardError::Config(format!(
                "values.cache_ttl_hours must be between 1 and {MAX_CACHE_TTL_HOURS}"
            ))
            .into());
        }
        Ok(())
    }

    /// Load `path` if it exists, otherwise run on defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if std::path::Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
