//! Entity and result types for the climate dataset.
//!
//! The `measurement` and `station` tables are populated by an external loader.
//! Their shapes are declared here explicitly rather than discovered from the
//! database at startup.

use serde::Serialize;
use sqlx::FromRow;

/// One weather reading from a station.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Measurement {
    /// Identifier of the reporting station.
    pub station: String,
    /// Observation date as stored, e.g. `2017-08-23`.
    pub date: String,
    /// Precipitation in inches, if recorded.
    pub prcp: Option<f64>,
    /// Temperature observation in degrees Fahrenheit, read as `REAL`
    /// whatever the column's declared type.
    pub tobs: f64,
}

/// One observation site.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Station {
    /// Unique station identifier, e.g. `USC00519281`.
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Elevation in feet.
    pub elevation: f64,
}

/// A single `(date, tobs)` pair for one station.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct TemperatureObservation {
    pub date: String,
    /// Degrees Fahrenheit; integer columns are widened to `f64`.
    pub tobs: f64,
}

/// Number of measurements recorded by a station.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct StationActivity {
    pub station: String,
    pub observations: i64,
}

/// Minimum, average and maximum temperature over a date range.
///
/// All three fields are `None` when no measurement falls in the range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TemperatureStats {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

impl TemperatureStats {
    /// Whether the range matched no measurements.
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.avg.is_none() && self.max.is_none()
    }
}

/// Last year of temperature observations for the most active station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TobsWindow {
    /// The most active station.
    pub station: String,
    /// First date included (latest date minus 365 days).
    pub start: String,
    /// Latest date recorded by the station.
    pub end: String,
    /// Observations in ascending date order.
    pub observations: Vec<TemperatureObservation>,
}
