//! Entry points used by the presentation shells
//!
//! Each call is independent: compute-and-persist, delete, and history refresh
//! share nothing beyond the ledger handle.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::ledger::TripLedger;
use crate::models::{Trip, TripId, TripInputs, TripMetrics};
use crate::savings::compute_trip_metrics;
use crate::summary::{summarize, TripSummary};

/// Metrics of a just-persisted trip, for immediate display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedTrip {
    pub id: TripId,
    pub metrics: TripMetrics,
}

/// Full ordered history plus the aggregates derived from it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripHistory {
    pub trips: Vec<Trip>,
    pub summary: TripSummary,
}

/// Savings tracker over any ledger
pub struct Tracker<L> {
    ledger: L,
}

impl<L: TripLedger> Tracker<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Compute metrics and store them.
    ///
    /// Invalid input is rejected before the ledger is touched.
    pub fn compute_and_persist(&self, inputs: &TripInputs) -> Result<RecordedTrip> {
        let metrics = compute_trip_metrics(inputs).inspect_err(|e| {
            warn!(error = %e, "Rejected trip inputs");
        })?;
        let id = self.ledger.insert(&metrics)?;
        Ok(RecordedTrip { id, metrics })
    }

    /// Remove trips by id; unknown ids are ignored
    pub fn delete_trips(&self, ids: &[TripId]) -> Result<usize> {
        self.ledger.delete(ids)
    }

    /// Reload the ordered history and its aggregates
    pub fn history(&self) -> Result<TripHistory> {
        let trips = self.ledger.list_all()?;
        let summary = summarize(&trips);
        Ok(TripHistory { trips, summary })
    }
}
