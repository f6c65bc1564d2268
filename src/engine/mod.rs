//! Core engine — turns raw league feeds into a dashboard snapshot.

pub mod loader;

pub use loader::{LeagueLoader, LeagueSnapshot, RosterValuations};
