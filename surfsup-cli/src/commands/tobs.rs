use anyhow::{Context, Result};
use surfsup::ClimateStore;

pub async fn run(store: &ClimateStore, json: bool) -> Result<()> {
    let window = store
        .last_year_of_tobs()
        .await
        .context("Failed to read temperature observations")?;

    let Some(window) = window else {
        if json {
            println!("[]");
        } else {
            println!("No measurements found");
        }
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string(&window)?);
        return Ok(());
    }

    println!(
        "Most active station: {} ({} to {})",
        window.station, window.start, window.end
    );
    println!("{:<12} {:>6}", "DATE", "TOBS");
    println!("{}", "-".repeat(19));
    for observation in &window.observations {
        println!("{:<12} {:>6.1}", observation.date, observation.tobs);
    }
    println!();
    println!("Observations: {}", window.observations.len());

    Ok(())
}
