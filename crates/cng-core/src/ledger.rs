//! Trip ledger abstraction
//!
//! The ledger is an append-only-with-delete store of [`Trip`] records:
//!
//! - `insert` assigns a fresh id and stamps the insert time
//! - `delete` removes a set of ids, ignoring ids that are not present
//! - `list_all` returns every trip ordered by timestamp (ties by id)
//!
//! # Implementations
//!
//! - [`Database`](crate::db::Database) stores trips in SQLite
//! - [`MemoryLedger`] keeps trips in a `Vec` behind a mutex
//!
//! The ledger never validates business semantics; metrics records come from
//! [`compute_trip_metrics`](crate::savings::compute_trip_metrics).

use std::collections::BTreeSet;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Trip, TripId, TripMetrics};

/// Storage interface for trip records
pub trait TripLedger: Send + Sync {
    /// Append a metrics record, returning its newly assigned id
    fn insert(&self, metrics: &TripMetrics) -> Result<TripId>;

    /// Remove every trip whose id is in `ids`, returning how many rows were removed.
    ///
    /// Unknown ids are ignored. Rows are removed one id at a time; if the
    /// backend fails part way, rows already removed stay removed and the
    /// call reports [`Error::StorageUnavailable`].
    fn delete(&self, ids: &[TripId]) -> Result<usize>;

    /// All trips ordered by timestamp ascending, ties broken by id
    fn list_all(&self) -> Result<Vec<Trip>>;
}

/// Collapse duplicate ids while keeping a stable order
pub(crate) fn unique_ids(ids: &[TripId]) -> Vec<TripId> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Sort trips into ledger order
pub(crate) fn sort_trips(trips: &mut [Trip]) {
    trips.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at).then(a.id.cmp(&b.id)));
}

#[derive(Default)]
struct MemoryState {
    last_id: TripId,
    trips: Vec<Trip>,
}

/// In-process ledger
///
/// Ids are never reused after deletion, matching the SQLite ledger.
#[derive(Default)]
pub struct MemoryLedger {
    state: Mutex<MemoryState>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert with an explicit timestamp (backfills and tests)
    pub fn insert_at(&self, metrics: &TripMetrics, recorded_at: DateTime<Utc>) -> Result<TripId> {
        let mut state = self.lock()?;
        state.last_id += 1;
        let id = state.last_id;
        state.trips.push(Trip {
            id,
            recorded_at,
            metrics: *metrics,
        });
        info!(trip_id = id, savings = metrics.savings, "Recorded trip");
        Ok(id)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| Error::StorageUnavailable("memory ledger lock poisoned".to_string()))
    }
}

impl TripLedger for MemoryLedger {
    fn insert(&self, metrics: &TripMetrics) -> Result<TripId> {
        self.insert_at(metrics, Utc::now())
    }

    fn delete(&self, ids: &[TripId]) -> Result<usize> {
        let ids = unique_ids(ids);
        let mut state = self.lock()?;
        let before = state.trips.len();
        state.trips.retain(|t| ids.binary_search(&t.id).is_err());
        let removed = before - state.trips.len();
        info!(requested = ids.len(), removed, "Deleted trips");
        Ok(removed)
    }

    fn list_all(&self) -> Result<Vec<Trip>> {
        let mut trips = self.lock()?.trips.clone();
        sort_trips(&mut trips);
        debug!(count = trips.len(), "Listed trips");
        Ok(trips)
    }
}
