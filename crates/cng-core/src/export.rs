//! Export functionality for the trip history
//!
//! Supports:
//! - CSV with one row per trip and every stored column
//! - Pretty-printed JSON array of trips

use std::io::Write;
use std::str::FromStr;

use serde::Serialize;

use crate::db::format_timestamp;
use crate::error::{Error, Result};
use crate::models::Trip;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::InvalidInput(format!(
                "unknown export format '{}' (expected csv or json)",
                other
            ))),
        }
    }
}

/// Flat CSV row; `Trip` flattens its metrics which the csv writer can't handle
#[derive(Serialize)]
struct TripCsvRow {
    id: i64,
    recorded_at: String,
    cng_price_per_kg: f64,
    total_cng_cost: f64,
    cng_amount_filled: f64,
    distance_covered: f64,
    cng_mileage: f64,
    petrol_price: f64,
    petrol_mileage: f64,
    cng_fuel_cost: f64,
    petrol_fuel_cost: f64,
    savings: f64,
    cng_price_per_km: f64,
    petrol_price_per_km: f64,
}

impl From<&Trip> for TripCsvRow {
    fn from(trip: &Trip) -> Self {
        let m = &trip.metrics;
        Self {
            id: trip.id,
            recorded_at: format_timestamp(&trip.recorded_at),
            cng_price_per_kg: m.cng_price_per_kg,
            total_cng_cost: m.total_cng_cost,
            cng_amount_filled: m.cng_amount_filled,
            distance_covered: m.distance_covered,
            cng_mileage: m.cng_mileage,
            petrol_price: m.petrol_price,
            petrol_mileage: m.petrol_mileage,
            cng_fuel_cost: m.cng_fuel_cost,
            petrol_fuel_cost: m.petrol_fuel_cost,
            savings: m.savings,
            cng_price_per_km: m.cng_price_per_km,
            petrol_price_per_km: m.petrol_price_per_km,
        }
    }
}

/// Write trips as CSV with a header row
pub fn export_trips_csv<W: Write>(trips: &[Trip], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if trips.is_empty() {
        // serialize() only emits headers alongside the first record
        wtr.write_record([
            "id",
            "recorded_at",
            "cng_price_per_kg",
            "total_cng_cost",
            "cng_amount_filled",
            "distance_covered",
            "cng_mileage",
            "petrol_price",
            "petrol_mileage",
            "cng_fuel_cost",
            "petrol_fuel_cost",
            "savings",
            "cng_price_per_km",
            "petrol_price_per_km",
        ])?;
    }
    for trip in trips {
        wtr.serialize(TripCsvRow::from(trip))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write trips as a pretty-printed JSON array
pub fn export_trips_json<W: Write>(trips: &[Trip], writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, trips)?;
    Ok(())
}

/// Write trips in the requested format
pub fn export_trips<W: Write>(trips: &[Trip], format: ExportFormat, writer: W) -> Result<()> {
    match format {
        ExportFormat::Csv => export_trips_csv(trips, writer),
        ExportFormat::Json => export_trips_json(trips, writer),
    }
}
