//! Data models for the CNG savings tracker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::savings::{DEFAULT_PETROL_MILEAGE, FIXED_OVERHEAD};

/// Ledger-assigned trip identifier
pub type TripId = i64;

// ========== Engine Models ==========

/// Raw inputs for one refuel, as entered by the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripInputs {
    /// CNG price (currency per kg)
    pub cng_price_per_kg: f64,
    /// Amount paid for the fill (currency)
    pub total_cng_cost: f64,
    /// Distance driven on this fill (km)
    pub distance_covered: f64,
    /// Petrol price used as comparison baseline (currency per litre)
    pub petrol_price: f64,
    /// Petrol mileage used as comparison baseline (km per litre)
    #[serde(default = "default_petrol_mileage")]
    pub petrol_mileage: f64,
}

fn default_petrol_mileage() -> f64 {
    DEFAULT_PETROL_MILEAGE
}

impl TripInputs {
    /// Inputs with the default petrol mileage
    pub fn new(
        cng_price_per_kg: f64,
        total_cng_cost: f64,
        distance_covered: f64,
        petrol_price: f64,
    ) -> Self {
        Self {
            cng_price_per_kg,
            total_cng_cost,
            distance_covered,
            petrol_price,
            petrol_mileage: DEFAULT_PETROL_MILEAGE,
        }
    }

    pub fn with_petrol_mileage(mut self, petrol_mileage: f64) -> Self {
        self.petrol_mileage = petrol_mileage;
        self
    }
}

/// Full metrics record for one refuel: the inputs plus every derived value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripMetrics {
    pub cng_price_per_kg: f64,
    pub total_cng_cost: f64,
    /// Derived: total_cng_cost / cng_price_per_kg (kg)
    pub cng_amount_filled: f64,
    pub distance_covered: f64,
    /// Derived: distance_covered / cng_amount_filled (km per kg)
    pub cng_mileage: f64,
    pub petrol_price: f64,
    pub petrol_mileage: f64,
    /// Same value as total_cng_cost, kept for symmetry with petrol_fuel_cost
    pub cng_fuel_cost: f64,
    /// What the same distance would have cost on petrol
    pub petrol_fuel_cost: f64,
    /// petrol_fuel_cost - cng_fuel_cost - FIXED_OVERHEAD; may be negative
    pub savings: f64,
    pub cng_price_per_km: f64,
    pub petrol_price_per_km: f64,
}

impl TripMetrics {
    /// The inputs this record was computed from
    pub fn inputs(&self) -> TripInputs {
        TripInputs {
            cng_price_per_kg: self.cng_price_per_kg,
            total_cng_cost: self.total_cng_cost,
            distance_covered: self.distance_covered,
            petrol_price: self.petrol_price,
            petrol_mileage: self.petrol_mileage,
        }
    }

    /// Verify the derived fields agree with the inputs within a relative tolerance.
    ///
    /// Returns the name of the first field that disagrees.
    pub fn check_invariants(&self, tolerance: f64) -> std::result::Result<(), &'static str> {
        let close = |actual: f64, expected: f64| {
            let scale = expected.abs().max(1.0);
            (actual - expected).abs() <= tolerance * scale
        };

        let petrol_fuel_cost =
            (self.distance_covered / self.petrol_mileage) * self.petrol_price;

        if !close(
            self.cng_amount_filled,
            self.total_cng_cost / self.cng_price_per_kg,
        ) {
            return Err("cng_amount_filled");
        }
        if !close(
            self.cng_mileage,
            self.distance_covered / self.cng_amount_filled,
        ) {
            return Err("cng_mileage");
        }
        if !close(self.cng_fuel_cost, self.total_cng_cost) {
            return Err("cng_fuel_cost");
        }
        if !close(self.petrol_fuel_cost, petrol_fuel_cost) {
            return Err("petrol_fuel_cost");
        }
        if !close(
            self.savings,
            petrol_fuel_cost - self.total_cng_cost - FIXED_OVERHEAD,
        ) {
            return Err("savings");
        }
        if !close(
            self.cng_price_per_km,
            self.total_cng_cost / self.distance_covered,
        ) {
            return Err("cng_price_per_km");
        }
        if !close(
            self.petrol_price_per_km,
            petrol_fuel_cost / self.distance_covered,
        ) {
            return Err("petrol_price_per_km");
        }
        Ok(())
    }
}

// ========== Ledger Models ==========

/// A stored trip: ledger id and insert timestamp plus the metrics record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    /// Set by the ledger at insert time
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub metrics: TripMetrics,
}
