/// State Breakdown Example
///
/// This example demonstrates:
/// - Counting distinct orders per US state
/// - Cleaning the counts onto the 56 USPS codes
/// - Folding the tail into "Others" for several N

use salestable::{
    clean_orders_by_state, orders_by_state, percent_shares, top_n_with_others, DashboardConfig, Table,
};

const SAMPLE: &str = include_str!("data/sample_orders.csv");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    println!("=== SalesTable State Breakdown Example ===\n");

    let config = DashboardConfig::default();
    let orders = Table::from_csv_str("sample_orders", SAMPLE)?;

    // 1. Raw per-state counts, including codes that are not US states
    let raw = orders_by_state(&orders, &config.columns, &config.domestic_country)?;
    println!("1. Raw counts for {} distinct state values:", raw.len());
    for entry in &raw {
        println!("   {}: {}", entry.label, entry.count);
    }
    println!();

    // 2. Cleaned onto the fixed code list
    let cleaned = clean_orders_by_state(&raw);
    let with_orders = cleaned.iter().filter(|c| c.count > 0).count();
    println!(
        "2. Cleaned: {} codes, {} with at least one order\n",
        cleaned.len(),
        with_orders
    );

    // 3. Top-N plus Others
    for n in [0, 3, 10] {
        let top = top_n_with_others(&cleaned, n, &config.others_label);
        let counts: Vec<i64> = top.iter().map(|c| c.count).collect();
        let shares = percent_shares(&counts);
        let summary: Vec<String> = top
            .iter()
            .zip(shares)
            .map(|(c, share)| format!("{}={} ({:.1}%)", c.label, c.count, share))
            .collect();
        println!("3. Top {}: {}", n, summary.join(", "));
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
