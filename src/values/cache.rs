//! Trade-value cache.
//!
//! Holds one snapshot of the value feed per valuation mode, each with the
//! time it was fetched. A snapshot older than the TTL is refetched on the
//! next read. Concurrent readers of a stale or empty slot share a single
//! in-flight fetch. A failed fetch is reported to every waiter and the
//! stale snapshot is not served in its place.

use chrono::{DateTime, Duration, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::matcher::PlayerMatcher;
use super::{ValuationMode, ValueSource};
use crate::types::{Player, TradeValue};

/// Default snapshot lifetime.
pub const DEFAULT_TTL_HOURS: i64 = 24;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Time source for snapshot ageing.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ---------------------------------------------------------------------------
// Value map
// ---------------------------------------------------------------------------

/// The value feed indexed by `name_id`.
#[derive(Debug, Clone, Default)]
pub struct ValueMap {
    by_name_id: HashMap<String, TradeValue>,
}

impl ValueMap {
    /// Index a feed. Rows without a `name_id` are dropped; a repeated
    /// `name_id` keeps the last row.
    pub fn from_values(values: Vec<TradeValue>) -> Self {
        let by_name_id = values
            .into_iter()
            .filter(|v| !v.name_id.is_empty())
            .map(|v| (v.name_id.clone(), v))
            .collect();
        Self { by_name_id }
    }

    pub fn get(&self, name_id: &str) -> Option<&TradeValue> {
        self.by_name_id.get(name_id)
    }

    /// First row matching any of the player's candidate keys, in order.
    pub fn lookup(&self, player: &Player, matcher: &dyn PlayerMatcher) -> Option<&TradeValue> {
        matcher
            .candidate_keys(player)
            .iter()
            .find_map(|key| self.by_name_id.get(key))
    }

    pub fn len(&self) -> usize {
        self.by_name_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name_id.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Cloneable so one failed fetch can be handed to every waiter.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValuationError {
    #[error("Trade value fetch failed ({mode}): {message}")]
    Fetch { mode: ValuationMode, message: String },
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<ValueMap>, ValuationError>>>;

struct Snapshot {
    values: Arc<ValueMap>,
    fetched_at: DateTime<Utc>,
}

#[derive(Default)]
struct Slot {
    snapshot: Option<Snapshot>,
    /// Generation tag and the fetch currently running for this mode.
    in_flight: Option<(u64, SharedFetch)>,
    generation: u64,
}

pub struct ValueCache {
    source: Arc<dyn ValueSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    slots: Mutex<HashMap<ValuationMode, Slot>>,
}

impl ValueCache {
    /// A cache on the system clock with the default 24-hour TTL.
    pub fn new(source: Arc<dyn ValueSource>) -> Self {
        Self::with_clock(source, Arc::new(SystemClock), Duration::hours(DEFAULT_TTL_HOURS))
    }

    pub fn with_clock(source: Arc<dyn ValueSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn is_fresh(&self, snapshot: &Snapshot) -> bool {
        self.clock.now() - snapshot.fetched_at < self.ttl
    }

    /// The value map for `mode`, fetching it if missing or expired.
    pub async fn get(&self, mode: ValuationMode) -> Result<Arc<ValueMap>, ValuationError> {
        let (generation, fetch) = {
            let mut slots = self.slots.lock().await;
            let slot = slots.entry(mode).or_default();

            if let Some(snapshot) = &slot.snapshot {
                if self.is_fresh(snapshot) {
                    return Ok(Arc::clone(&snapshot.values));
                }
            }

            let running = slot
                .in_flight
                .as_ref()
                .map(|(generation, fetch)| (*generation, fetch.clone()));
            match running {
                Some(joined) => {
                    debug!(%mode, "Joining in-flight trade value fetch");
                    joined
                }
                None => {
                    slot.generation += 1;
                    let fetch = self.start_fetch(mode);
                    slot.in_flight = Some((slot.generation, fetch.clone()));
                    (slot.generation, fetch)
                }
            }
        };

        let result = fetch.await;

        // Whichever waiter gets here first settles the slot.
        let mut slots = self.slots.lock().await;
        let slot = slots.entry(mode).or_default();
        if matches!(&slot.in_flight, Some((current, _)) if *current == generation) {
            slot.in_flight = None;
            match &result {
                Ok(values) => {
                    info!(%mode, players = values.len(), "Trade values cached");
                    slot.snapshot = Some(Snapshot {
                        values: Arc::clone(values),
                        fetched_at: self.clock.now(),
                    });
                }
                Err(e) => warn!(%mode, error = %e, "Trade value fetch failed"),
            }
        }
        result
    }

    fn start_fetch(&self, mode: ValuationMode) -> SharedFetch {
        let source = Arc::clone(&self.source);
        debug!(%mode, "Starting trade value fetch");
        async move {
            match source.fetch_values(mode.format).await {
                Ok(values) => Ok(Arc::new(ValueMap::from_values(values))),
                Err(e) => Err(ValuationError::Fetch {
                    mode,
                    message: format!("{e:#}"),
                }),
            }
        }
        .boxed()
        .shared()
    }

    /// Whether the next `get` for `mode` would have to fetch.
    pub async fn is_stale(&self, mode: ValuationMode) -> bool {
        let slots = self.slots.lock().await;
        match slots.get(&mode).and_then(|slot| slot.snapshot.as_ref()) {
            Some(snapshot) => !self.is_fresh(snapshot),
            None => true,
        }
    }

    /// Drop the snapshot for `mode`. A fetch already running is left alone.
    pub async fn invalidate(&self, mode: ValuationMode) {
        let mut slots = self.slots.lock().await;
        if let Some(slot) = slots.get_mut(&mode) {
            slot.snapshot = None;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
