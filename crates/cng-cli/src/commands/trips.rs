//! Trip commands: record, preview, list and delete

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use cng_core::{compute_trip_metrics, Database, Tracker, TripId, TripInputs, TripMetrics};

fn print_metrics(m: &TripMetrics) {
    println!("   CNG filled:        {:>10.2} kg", m.cng_amount_filled);
    println!("   CNG mileage:       {:>10.2} km/kg", m.cng_mileage);
    println!("   CNG fuel cost:     {:>10.2}", m.cng_fuel_cost);
    println!("   Petrol fuel cost:  {:>10.2}", m.petrol_fuel_cost);
    println!("   CNG per km:        {:>10.2}", m.cng_price_per_km);
    println!("   Petrol per km:     {:>10.2}", m.petrol_price_per_km);
    if m.savings >= 0.0 {
        println!("   💰 Savings:        {:>10.2}", m.savings);
    } else {
        println!("   📉 Loss:           {:>10.2}", -m.savings);
    }
}

/// Compute metrics for a refuel and record it
pub fn cmd_add(db: &Database, inputs: &TripInputs) -> Result<()> {
    let tracker = Tracker::new(db.clone());
    let recorded = tracker
        .compute_and_persist(inputs)
        .context("Failed to record trip")?;

    println!("✅ Recorded trip #{}", recorded.id);
    print_metrics(&recorded.metrics);
    Ok(())
}

/// Compute metrics without touching the ledger
pub fn cmd_calc(inputs: &TripInputs) -> Result<()> {
    let metrics = compute_trip_metrics(inputs).context("Invalid trip inputs")?;
    println!("🧮 Trip estimate (not recorded)");
    print_metrics(&metrics);
    Ok(())
}

pub fn cmd_list(db: &Database) -> Result<()> {
    let trips = db.list_trips().context("Failed to load trips")?;

    if trips.is_empty() {
        println!("No trips recorded yet. Add one with: cng add --cng-price 75 --cost 300 --distance 120");
        return Ok(());
    }

    println!(
        "{:>5}  {:<20}  {:>8}  {:>9}  {:>8}  {:>9}  {:>9}  {:>10}",
        "ID", "Recorded", "CNG/kg", "Cost", "Km", "Km/kg", "Petrol", "Savings"
    );
    println!("{}", "-".repeat(92));
    for trip in &trips {
        let m = &trip.metrics;
        println!(
            "{:>5}  {:<20}  {:>8.2}  {:>9.2}  {:>8.1}  {:>9.2}  {:>9.2}  {:>10.2}",
            trip.id,
            trip.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            m.cng_price_per_kg,
            m.total_cng_cost,
            m.distance_covered,
            m.cng_mileage,
            m.petrol_price,
            m.savings,
        );
    }
    println!();
    println!("{} trip(s)", trips.len());
    Ok(())
}

/// Requested ids that matched nothing; repeated ids count once
pub(crate) fn count_missing(ids: &[TripId], deleted: usize) -> usize {
    let unique: BTreeSet<_> = ids.iter().collect();
    unique.len().saturating_sub(deleted)
}

pub fn cmd_delete(db: &Database, ids: &[TripId]) -> Result<()> {
    let tracker = Tracker::new(db.clone());
    let deleted = tracker
        .delete_trips(ids)
        .context("Failed to delete trips")?;

    let missing = count_missing(ids, deleted);
    println!("🗑️  Deleted {} trip(s)", deleted);
    if missing > 0 {
        println!("   {} id(s) were not present", missing);
    }
    Ok(())
}
