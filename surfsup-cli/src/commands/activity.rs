use anyhow::{Context, Result};
use surfsup::ClimateStore;

pub async fn run(store: &ClimateStore) -> Result<()> {
    let activity = store
        .station_activity()
        .await
        .context("Failed to count measurements")?;

    if activity.is_empty() {
        println!("No measurements found");
        return Ok(());
    }

    println!("{:<12} {:>12}", "STATION", "OBSERVATIONS");
    println!("{}", "-".repeat(25));

    for entry in &activity {
        println!("{:<12} {:>12}", entry.station, entry.observations);
    }

    let total: i64 = activity.iter().map(|a| a.observations).sum();
    println!();
    println!("Most active: {}", activity[0].station);
    println!("Total measurements: {}", total);

    Ok(())
}
