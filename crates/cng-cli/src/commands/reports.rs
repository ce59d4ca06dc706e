//! Report commands: overall analysis, chart series and export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use cng_core::export::export_trips;
use cng_core::{savings_histogram, trend_series, Database, ExportFormat, Tracker};

fn fmt_avg(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

pub fn cmd_summary(db: &Database) -> Result<()> {
    let history = Tracker::new(db.clone())
        .history()
        .context("Failed to load trip history")?;
    let s = &history.summary;

    println!("📊 Overall analysis");
    println!();
    if s.is_empty() {
        println!("   No trips recorded yet.");
        return Ok(());
    }

    println!("   Trips:                      {}", s.trip_count);
    println!("   Total distance:             {:.1} km", s.total_distance);
    println!("   Total CNG spend:            {:.2}", s.total_cng_cost);
    println!("   Total savings:              {:.2}", s.total_savings);
    println!("   Average savings per trip:   {}", fmt_avg(s.average_savings));
    println!();
    println!(
        "   Avg CNG price per km:       {}",
        fmt_avg(s.average_cng_price_per_km)
    );
    println!(
        "   Avg petrol price per km:    {}",
        fmt_avg(s.average_petrol_price_per_km)
    );
    println!(
        "   Difference per km:          {}",
        fmt_avg(s.average_price_difference_per_km)
    );
    Ok(())
}

/// Print chart series and the savings histogram as JSON
pub fn cmd_trends(db: &Database, bins: usize) -> Result<()> {
    let trips = db.list_trips().context("Failed to load trips")?;
    let histogram = savings_histogram(&trips, bins)?;

    let out = serde_json::json!({
        "series": trend_series(&trips),
        "savings_histogram": histogram,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

pub fn cmd_export(db: &Database, format: &str, output: Option<&Path>) -> Result<()> {
    let format: ExportFormat = format.parse()?;
    let trips = db.list_trips().context("Failed to load trips")?;

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            export_trips(&trips, format, &mut writer)?;
            writer.flush()?;
            eprintln!(
                "✅ Exported {} trip(s) as {} to {}",
                trips.len(),
                format.as_str(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            export_trips(&trips, format, &mut handle)?;
            if format == ExportFormat::Json {
                writeln!(handle)?;
            }
        }
    }
    Ok(())
}
