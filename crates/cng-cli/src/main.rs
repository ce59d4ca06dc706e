//! cng CLI - CNG vs petrol savings tracker
//!
//! Usage:
//!   cng init                                          Initialize database
//!   cng add --cng-price 75 --cost 300 --distance 120  Record a refuel
//!   cng list                                          Show history
//!   cng serve --port 3000                             Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Add { trip } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_add(&db, &trip.to_inputs())
        }
        Commands::Calc { trip } => commands::cmd_calc(&trip.to_inputs()),
        Commands::List => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_list(&db)
        }
        Commands::Delete { ids } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_delete(&db, &ids)
        }
        Commands::Summary => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_summary(&db)
        }
        Commands::Trends { bins } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_trends(&db, bins)
        }
        Commands::Export { format, output } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_export(&db, &format, output.as_deref())
        }
        Commands::Serve {
            port,
            host,
            static_dir,
            allowed_origins,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                cli.no_encrypt,
                static_dir.as_deref(),
                allowed_origins,
            )
            .await
        }
    }
}
