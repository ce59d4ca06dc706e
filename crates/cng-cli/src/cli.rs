//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cng_core::{TripInputs, DEFAULT_PETROL_MILEAGE, DEFAULT_PETROL_PRICE};

/// cng - Track how much running on CNG saves over petrol
#[derive(Parser)]
#[command(name = "cng")]
#[command(about = "Personal CNG vs petrol savings tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "cng.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set CNG_DB_KEY environment variable with your passphrase.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Inputs for one refuel
#[derive(Args, Debug, Clone)]
pub struct TripArgs {
    /// CNG price per kg
    #[arg(long)]
    pub cng_price: f64,

    /// Total amount paid for the CNG fill
    #[arg(long)]
    pub cost: f64,

    /// Distance covered on this fill (km)
    #[arg(long)]
    pub distance: f64,

    /// Petrol price per litre to compare against
    #[arg(long, default_value_t = DEFAULT_PETROL_PRICE)]
    pub petrol_price: f64,

    /// Petrol mileage (km per litre) to compare against
    #[arg(long, default_value_t = DEFAULT_PETROL_MILEAGE)]
    pub petrol_mileage: f64,
}

impl TripArgs {
    pub fn to_inputs(&self) -> TripInputs {
        TripInputs::new(self.cng_price, self.cost, self.distance, self.petrol_price)
            .with_petrol_mileage(self.petrol_mileage)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Calculate savings for a refuel and record it
    Add {
        #[command(flatten)]
        trip: TripArgs,
    },

    /// Calculate savings for a refuel without recording it
    Calc {
        #[command(flatten)]
        trip: TripArgs,
    },

    /// Show the trip history
    List,

    /// Remove trips by ID
    Delete {
        /// Trip IDs to remove
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Show overall analysis (totals and per-km averages)
    Summary,

    /// Print chart series and savings histogram as JSON
    Trends {
        /// Number of histogram bins
        #[arg(long, default_value_t = cng_core::trends::DEFAULT_HISTOGRAM_BINS)]
        bins: usize,
    },

    /// Export the trip history
    Export {
        /// Output format: csv or json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., a dashboard build)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Extra CORS origin to allow (repeatable)
        #[arg(long = "allow-origin")]
        allowed_origins: Vec<String>,
    },
}
