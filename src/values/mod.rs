//! Player trade values.
//!
//! Values come from a third-party feed keyed by a name-derived id rather
//! than the league API's numeric player ids. The `matcher` bridges the two,
//! the `cache` keeps one snapshot per valuation mode, and the `calculator`
//! turns snapshots into per-player and per-roster numbers.

pub mod cache;
pub mod calculator;
pub mod client;
pub mod matcher;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

use crate::types::TradeValue;

/// Dynasty and redraft values come from different feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeagueFormat {
    Dynasty,
    Redraft,
}

impl LeagueFormat {
    /// The relay's `type` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            LeagueFormat::Dynasty => "dynasty",
            LeagueFormat::Redraft => "redraft",
        }
    }

    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "dynasty" => Some(LeagueFormat::Dynasty),
            "redraft" => Some(LeagueFormat::Redraft),
            _ => None,
        }
    }
}

/// Which value field applies: quarterbacks are worth more in superflex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QbFormat {
    SingleQb,
    Superflex,
}

/// A valuation mode: which feed, and which field of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValuationMode {
    pub format: LeagueFormat,
    pub qb: QbFormat,
}

impl ValuationMode {
    pub fn new(format: LeagueFormat, qb: QbFormat) -> Self {
        Self { format, qb }
    }

    /// Pick this mode's number out of a feed row.
    pub fn select(&self, value: &TradeValue) -> f64 {
        match self.qb {
            QbFormat::SingleQb => value.trade_value,
            QbFormat::Superflex => value.sf_trade_value,
        }
    }
}

impl fmt::Display for ValuationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qb = match self.qb {
            QbFormat::SingleQb => "1QB",
            QbFormat::Superflex => "SF",
        };
        write!(f, "{}/{}", self.format.as_param(), qb)
    }
}

/// Abstraction over the trade-value feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ValueSource: Send + Sync {
    /// Fetch the full value list for one league format.
    async fn fetch_values(&self, format: LeagueFormat) -> Result<Vec<TradeValue>>;
}
