//! Trip ledger operations

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, info, warn};

use super::{format_timestamp, parse_timestamp, Database};
use crate::error::{Error, Result};
use crate::ledger::{unique_ids, TripLedger};
use crate::models::{Trip, TripId, TripMetrics};

const TRIP_COLUMNS: &str = "id, recorded_at, cng_price_per_kg, total_cng_cost, cng_amount_filled, \
     distance_covered, cng_mileage, petrol_price, petrol_mileage, cng_fuel_cost, \
     petrol_fuel_cost, savings, cng_price_per_km, petrol_price_per_km";

fn trip_from_row(row: &Row<'_>) -> rusqlite::Result<Trip> {
    let recorded_at_str: String = row.get(1)?;
    let recorded_at = parse_timestamp(&recorded_at_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Trip {
        id: row.get(0)?,
        recorded_at,
        metrics: TripMetrics {
            cng_price_per_kg: row.get(2)?,
            total_cng_cost: row.get(3)?,
            cng_amount_filled: row.get(4)?,
            distance_covered: row.get(5)?,
            cng_mileage: row.get(6)?,
            petrol_price: row.get(7)?,
            petrol_mileage: row.get(8)?,
            cng_fuel_cost: row.get(9)?,
            petrol_fuel_cost: row.get(10)?,
            savings: row.get(11)?,
            cng_price_per_km: row.get(12)?,
            petrol_price_per_km: row.get(13)?,
        },
    })
}

impl Database {
    /// Insert a metrics record with an explicit timestamp
    pub fn insert_trip_at(&self, metrics: &TripMetrics, recorded_at: DateTime<Utc>) -> Result<TripId> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO trips (recorded_at, cng_price_per_kg, total_cng_cost, cng_amount_filled,
                distance_covered, cng_mileage, petrol_price, petrol_mileage, cng_fuel_cost,
                petrol_fuel_cost, savings, cng_price_per_km, petrol_price_per_km)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                format_timestamp(&recorded_at),
                metrics.cng_price_per_kg,
                metrics.total_cng_cost,
                metrics.cng_amount_filled,
                metrics.distance_covered,
                metrics.cng_mileage,
                metrics.petrol_price,
                metrics.petrol_mileage,
                metrics.cng_fuel_cost,
                metrics.petrol_fuel_cost,
                metrics.savings,
                metrics.cng_price_per_km,
                metrics.petrol_price_per_km,
            ],
        )?;

        let id = conn.last_insert_rowid();
        info!(trip_id = id, savings = metrics.savings, "Recorded trip");
        Ok(id)
    }

    /// Insert a metrics record stamped with the current time
    pub fn insert_trip(&self, metrics: &TripMetrics) -> Result<TripId> {
        self.insert_trip_at(metrics, Utc::now())
    }

    /// Get a trip by ID
    pub fn get_trip(&self, id: TripId) -> Result<Option<Trip>> {
        let conn = self.conn()?;
        let trip = conn
            .query_row(
                &format!("SELECT {} FROM trips WHERE id = ?", TRIP_COLUMNS),
                params![id],
                trip_from_row,
            )
            .optional()?;
        Ok(trip)
    }

    /// List all trips, oldest first
    pub fn list_trips(&self) -> Result<Vec<Trip>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM trips ORDER BY recorded_at ASC, id ASC",
            TRIP_COLUMNS
        ))?;

        let trips = stmt
            .query_map([], trip_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(count = trips.len(), "Listed trips");
        Ok(trips)
    }

    /// Count stored trips
    pub fn count_trips(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM trips", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete trips by ID, one statement per id with no enclosing transaction.
    ///
    /// A failure part way through leaves earlier deletions in place.
    pub fn delete_trips(&self, ids: &[TripId]) -> Result<usize> {
        let ids = unique_ids(ids);
        if ids.is_empty() {
            return Ok(0);
        }

        let conn = self.conn()?;
        let mut removed = 0;
        for id in &ids {
            match conn.execute("DELETE FROM trips WHERE id = ?", params![id]) {
                Ok(n) => removed += n,
                Err(e) => {
                    warn!(trip_id = id, removed, error = %e, "Trip delete failed part way");
                    return Err(Error::StorageUnavailable(format!(
                        "failed to delete trip {} after removing {} of {} requested: {}",
                        id,
                        removed,
                        ids.len(),
                        e
                    )));
                }
            }
        }

        info!(requested = ids.len(), removed, "Deleted trips");
        Ok(removed)
    }
}

impl TripLedger for Database {
    fn insert(&self, metrics: &TripMetrics) -> Result<TripId> {
        self.insert_trip(metrics)
    }

    fn delete(&self, ids: &[TripId]) -> Result<usize> {
        self.delete_trips(ids)
    }

    fn list_all(&self) -> Result<Vec<Trip>> {
        self.list_trips()
    }
}
