//! CNG Core Library
//!
//! Shared functionality for the CNG savings tracker:
//! - Savings engine turning one refuel's inputs into a full metrics record
//! - Trip ledger abstraction with SQLite (optionally SQLCipher) and in-memory stores
//! - Derived aggregates over the trip history
//! - Chart-ready trend series and savings histogram
//! - CSV / JSON export of the history

pub mod db;
pub mod error;
pub mod export;
pub mod ledger;
pub mod models;
pub mod savings;
pub mod summary;
pub mod tracker;
pub mod trends;

pub use db::Database;
pub use error::{Error, Result};
pub use export::ExportFormat;
pub use ledger::{MemoryLedger, TripLedger};
pub use models::{Trip, TripId, TripInputs, TripMetrics};
pub use savings::{compute_trip_metrics, DEFAULT_PETROL_MILEAGE, DEFAULT_PETROL_PRICE, FIXED_OVERHEAD};
pub use summary::{summarize, TripSummary};
pub use tracker::{RecordedTrip, Tracker, TripHistory};
pub use trends::{savings_histogram, trend_series, HistogramBin, TrendPoint, TrendSeries};
