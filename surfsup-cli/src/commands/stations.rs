use anyhow::{Context, Result};
use surfsup::ClimateStore;

pub async fn run(store: &ClimateStore) -> Result<()> {
    let stations = store.stations().await.context("Failed to read stations")?;

    if stations.is_empty() {
        println!("No stations found");
        return Ok(());
    }

    println!(
        "{:<12} {:<40} {:>9} {:>10} {:>9}",
        "STATION", "NAME", "LAT", "LON", "ELEV"
    );
    println!("{}", "-".repeat(84));

    for station in &stations {
        println!(
            "{:<12} {:<40} {:>9.4} {:>10.4} {:>9.1}",
            station.station,
            truncate(&station.name, 40),
            station.latitude,
            station.longitude,
            station.elevation
        );
    }

    println!();
    println!("Total stations: {}", stations.len());

    Ok(())
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}
