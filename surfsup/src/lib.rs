//! # SurfsUp - Station Climate Observations
//!
//! Read-only access to a dataset of daily weather measurements (precipitation
//! and temperature) recorded by a network of observation stations.
//!
//! ## Quick Start
//!
//! ```ignore
//! use surfsup::ClimateStore;
//!
//! let store = ClimateStore::connect("sqlite://Resources/hawaii.sqlite").await?;
//!
//! // Temperature statistics from a start date to the end of the dataset
//! let stats = store.temperature_stats("2017-01-01", None).await?;
//!
//! // Last year of readings for the busiest station
//! if let Some(window) = store.last_year_of_tobs().await? {
//!     println!("{}: {} readings", window.station, window.observations.len());
//! }
//! ```
//!
//! ## Dataset Layout
//!
//! The dataset is a SQLite database with two tables:
//!
//! - **measurement**: `station`, `date` (`YYYY-MM-DD` text), `prcp` (inches,
//!   nullable), `tobs` (°F)
//! - **station**: `station`, `name`, `latitude`, `longitude`, `elevation`
//!
//! Dates are zero-padded ISO-8601 strings, so date ranges are filtered with
//! plain text comparison.

pub mod dates;
pub mod error;
pub mod model;
pub mod store;

// Re-export main types at crate root for convenience
pub use error::{ClimateError, Result};
pub use model::{
    Measurement, Station, StationActivity, TemperatureObservation, TemperatureStats, TobsWindow,
};
pub use store::{ClimateStore, ClimateStoreBuilder};
