//! Core command implementations and shared utilities

use std::path::Path;

use anyhow::{Context, Result};
use cng_core::{db::DB_KEY_ENV, Database};
use tracing::debug;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    debug!(path = path_str, encrypted = !no_encrypt, "Opening database");
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;
    let count = db.count_trips().context("Failed to read trip ledger")?;
    println!("   Trips recorded: {}", count);

    if db.is_encrypted() {
        println!("   🔒 Encryption: ENABLED (key from {})", DB_KEY_ENV);
    } else {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record a refuel: cng add --cng-price 75 --cost 300 --distance 120");
    println!("  2. Start web UI: cng serve");

    Ok(())
}
