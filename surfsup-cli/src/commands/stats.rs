use anyhow::{Context, Result};
use serde::Serialize;
use surfsup::{ClimateStore, TemperatureStats};

#[derive(Serialize)]
struct StatsOutput<'a> {
    start: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<&'a str>,
    #[serde(rename = "TMIN")]
    tmin: Option<f64>,
    #[serde(rename = "TAVG")]
    tavg: Option<f64>,
    #[serde(rename = "TMAX")]
    tmax: Option<f64>,
}

pub async fn run(store: &ClimateStore, start: &str, end: Option<&str>, json: bool) -> Result<()> {
    let stats = store
        .temperature_stats(start, end)
        .await
        .context("Failed to compute temperature statistics")?;

    if json {
        let output = StatsOutput {
            start,
            end,
            tmin: stats.min,
            tavg: stats.avg,
            tmax: stats.max,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if stats.is_empty() {
        println!("No measurements between {} and {}", start, end.unwrap_or("end of data"));
    } else {
        println!("{}", format_stats(&stats));
    }

    Ok(())
}

fn format_stats(stats: &TemperatureStats) -> String {
    let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |t| format!("{:.1}°F", t));
    format!(
        "TMIN: {}  TAVG: {}  TMAX: {}",
        fmt(stats.min),
        fmt(stats.avg),
        fmt(stats.max)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_stats() {
        let stats = TemperatureStats {
            min: Some(56.0),
            avg: Some(74.59),
            max: Some(87.0),
        };
        assert_eq!(
            format_stats(&stats),
            "TMIN: 56.0°F  TAVG: 74.6°F  TMAX: 87.0°F"
        );
    }

    #[test]
    fn test_stats_output_omits_missing_end() {
        let output = StatsOutput {
            start: "2017-01-01",
            end: None,
            tmin: None,
            tavg: None,
            tmax: None,
        };
        let json = serde_json::to_string(&output).unwrap();
        assert_eq!(
            json,
            r#"{"start":"2017-01-01","TMIN":null,"TAVG":null,"TMAX":null}"#
        );
    }
}
