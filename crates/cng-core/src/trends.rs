//! Chart-ready series derived from the trip history
//!
//! One series per dashboard panel, each point keyed by the trip's timestamp.
//! Rendering is left to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Trip, TripMetrics};

/// Histogram bin count used when the caller does not pick one
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub recorded_at: DateTime<Utc>,
    pub value: f64,
}

/// Per-trip series in ledger order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub cumulative_savings: Vec<TrendPoint>,
    pub savings_per_trip: Vec<TrendPoint>,
    pub cng_price_per_kg: Vec<TrendPoint>,
    pub petrol_price: Vec<TrendPoint>,
    pub distance_covered: Vec<TrendPoint>,
    pub cng_mileage: Vec<TrendPoint>,
    pub petrol_mileage: Vec<TrendPoint>,
    pub cng_price_per_km: Vec<TrendPoint>,
    pub petrol_price_per_km: Vec<TrendPoint>,
}

fn series(trips: &[Trip], value: fn(&TripMetrics) -> f64) -> Vec<TrendPoint> {
    trips
        .iter()
        .map(|t| TrendPoint {
            recorded_at: t.recorded_at,
            value: value(&t.metrics),
        })
        .collect()
}

/// Build every trend series from trips already in ledger order
pub fn trend_series(trips: &[Trip]) -> TrendSeries {
    let mut running = 0.0;
    let cumulative_savings = trips
        .iter()
        .map(|t| {
            running += t.metrics.savings;
            TrendPoint {
                recorded_at: t.recorded_at,
                value: running,
            }
        })
        .collect();

    TrendSeries {
        cumulative_savings,
        savings_per_trip: series(trips, |m| m.savings),
        cng_price_per_kg: series(trips, |m| m.cng_price_per_kg),
        petrol_price: series(trips, |m| m.petrol_price),
        distance_covered: series(trips, |m| m.distance_covered),
        cng_mileage: series(trips, |m| m.cng_mileage),
        petrol_mileage: series(trips, |m| m.petrol_mileage),
        cng_price_per_km: series(trips, |m| m.cng_price_per_km),
        petrol_price_per_km: series(trips, |m| m.petrol_price_per_km),
    }
}

/// One equal-width bucket of per-trip savings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Distribution of per-trip savings over `bins` equal-width bins.
///
/// The bins span the observed minimum to maximum; the maximum lands in the
/// last bin. When every trip saved the same amount a single bin holds them all.
pub fn savings_histogram(trips: &[Trip], bins: usize) -> Result<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(Error::InvalidInput(
            "histogram needs at least one bin".to_string(),
        ));
    }
    if trips.is_empty() {
        return Ok(Vec::new());
    }

    let (min, max) = trips
        .iter()
        .map(|t| t.metrics.savings)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if max == min {
        return Ok(vec![HistogramBin {
            lower: min,
            upper: max,
            count: trips.len(),
        }]);
    }

    let width = (max - min) / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for trip in trips {
        let index = (((trip.metrics.savings - min) / width).floor() as usize).min(bins - 1);
        histogram[index].count += 1;
    }

    Ok(histogram)
}
