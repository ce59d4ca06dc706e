//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Database setup (init) and the shared `open_db` helper
//! - `trips` - Recording, previewing, listing and deleting refuels
//! - `reports` - Summary, trend series and export
//! - `serve` - Web server command

pub mod core;
pub mod reports;
pub mod serve;
pub mod trips;

// Re-export command functions for main.rs
pub use core::*;
pub use reports::*;
pub use serve::*;
pub use trips::*;
