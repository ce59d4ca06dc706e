//! Derived aggregates over the trip history
//!
//! Computed from a [`TripLedger::list_all`](crate::ledger::TripLedger::list_all)
//! listing, never stored.

use serde::{Deserialize, Serialize};

use crate::models::Trip;

/// Overall analysis of a trip history
///
/// Over an empty history the sums are zero, `cumulative_savings` is empty,
/// and the averages are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub trip_count: usize,
    pub total_savings: f64,
    pub total_distance: f64,
    pub total_cng_cost: f64,
    pub average_savings: Option<f64>,
    pub average_cng_price_per_km: Option<f64>,
    pub average_petrol_price_per_km: Option<f64>,
    /// average_petrol_price_per_km - average_cng_price_per_km
    pub average_price_difference_per_km: Option<f64>,
    /// Running total of savings, one entry per trip in ledger order
    pub cumulative_savings: Vec<f64>,
}

impl TripSummary {
    pub fn is_empty(&self) -> bool {
        self.trip_count == 0
    }
}

fn mean(sum: f64, count: usize) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Summarize trips already in ledger order
pub fn summarize(trips: &[Trip]) -> TripSummary {
    let count = trips.len();

    let mut total_savings = 0.0;
    let mut total_distance = 0.0;
    let mut total_cng_cost = 0.0;
    let mut cng_per_km_sum = 0.0;
    let mut petrol_per_km_sum = 0.0;
    let mut cumulative_savings = Vec::with_capacity(count);

    for trip in trips {
        let m = &trip.metrics;
        total_savings += m.savings;
        total_distance += m.distance_covered;
        total_cng_cost += m.total_cng_cost;
        cng_per_km_sum += m.cng_price_per_km;
        petrol_per_km_sum += m.petrol_price_per_km;
        cumulative_savings.push(total_savings);
    }

    let average_cng_price_per_km = mean(cng_per_km_sum, count);
    let average_petrol_price_per_km = mean(petrol_per_km_sum, count);
    let average_price_difference_per_km = average_petrol_price_per_km
        .zip(average_cng_price_per_km)
        .map(|(petrol, cng)| petrol - cng);

    TripSummary {
        trip_count: count,
        total_savings,
        total_distance,
        total_cng_cost,
        average_savings: mean(total_savings, count),
        average_cng_price_per_km,
        average_petrol_price_per_km,
        average_price_difference_per_km,
        cumulative_savings,
    }
}
