/// Sales Dashboard Example
///
/// This example demonstrates:
/// - Loading an order export (a path argument, or the bundled sample)
/// - Masking buyer names and enriching sale dates
/// - Building every dashboard chart as JSON for a front end
///
/// Run with `RUST_LOG=debug cargo run --example dashboard -- orders.csv`
/// to see what each transform did.

use chrono::NaiveDate;
use salestable::{Dashboard, DashboardConfig, Table};
use std::path::PathBuf;

const SAMPLE: &str = include_str!("data/sample_orders.csv");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = DashboardConfig::default();
    let dashboard = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Dashboard::open(config, Some(path.as_path()))?,
        None => {
            // The bundled sample is already masked
            let table = Table::from_csv_str("sample_orders", SAMPLE)?;
            Dashboard::load(&table, config, false)?
        }
    };

    println!("=== SalesTable Dashboard ===\n");

    println!("1. Data preview ({} of {} rows):", dashboard.preview().len(), dashboard.orders().len());
    println!("{}\n", dashboard.preview().to_json()?);

    println!("2. Number of sold items by month:");
    let monthly = dashboard.monthly()?;
    for (row, point) in monthly.data.rows().iter().zip(&monthly.chart.points) {
        println!(
            "   {:>2}: {:>4}  {}",
            row.month,
            row.quantity,
            point.annotation.as_deref().unwrap_or("")
        );
    }
    println!();

    println!("3. Weekday vs weekend:");
    let weekpart = dashboard.weekpart()?;
    for point in &weekpart.chart.points {
        println!("   {}: {}", point.label, point.annotation.as_deref().unwrap_or(""));
    }
    println!();

    println!("4. Top {} states:", dashboard.config().top_n_states);
    let states = dashboard.states(None)?;
    println!("{}\n", serde_json::to_string_pretty(&states.chart)?);

    println!("5. Daily sales, first quarter:");
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).ok_or("bad start date")?;
    let end = NaiveDate::from_ymd_opt(2022, 3, 31).ok_or("bad end date")?;
    match dashboard.daily(Some((start, end))) {
        Ok(daily) => println!(
            "   {} days, {} items sold, chart '{}'",
            daily.data.len(),
            daily.data.total(),
            daily.chart.title
        ),
        Err(e) => println!("   Could not build daily series: {}", e),
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
