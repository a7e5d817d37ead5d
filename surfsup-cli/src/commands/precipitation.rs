use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use surfsup::ClimateStore;

pub async fn run(store: &ClimateStore, output: Option<PathBuf>) -> Result<()> {
    let by_date = store
        .precipitation()
        .await
        .context("Failed to read precipitation")?;

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_csv(BufWriter::new(file), &by_date)?;
            eprintln!("Wrote {} dates to {}", by_date.len(), path.display());
        }
        None => write_csv(io::stdout().lock(), &by_date)?,
    }

    Ok(())
}

/// Write `date,prcp` rows; missing precipitation is left empty.
fn write_csv<W: Write>(writer: W, by_date: &BTreeMap<String, Option<f64>>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["date", "prcp"])?;

    for (date, prcp) in by_date {
        let value = prcp.map(|p| p.to_string()).unwrap_or_default();
        writer.write_record([date.as_str(), value.as_str()])?;
    }

    writer.flush()?;
    Ok(())
}
