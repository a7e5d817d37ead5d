//! Read-only query layer over the climate dataset.
//!
//! This module provides [`ClimateStore`], which owns a SQLite connection pool
//! and exposes the bounded range and aggregate queries used by the API.
//!
//! ```ignore
//! use surfsup::ClimateStoreBuilder;
//!
//! let store = ClimateStoreBuilder::new("sqlite://Resources/hawaii.sqlite")
//!     .max_connections(5)
//!     .build()
//!     .await?;
//!
//! let stats = store.temperature_stats("2017-01-01", Some("2017-01-31")).await?;
//! println!("TMIN={:?} TAVG={:?} TMAX={:?}", stats.min, stats.avg, stats.max);
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::dates::one_year_before;
use crate::error::{ClimateError, Result};
use crate::model::{
    Measurement, Station, StationActivity, TemperatureObservation, TemperatureStats, TobsWindow,
};

/// Default location of the dataset when `SURFSUP_DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://Resources/hawaii.sqlite";

/// Default number of pooled connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Read-only handle to the `measurement` and `station` tables.
///
/// Cloning is cheap; clones share the same pool.
#[derive(Debug, Clone)]
pub struct ClimateStore {
    pool: SqlitePool,
}

impl ClimateStore {
    /// Open the dataset at `database_url` with default settings.
    pub async fn connect(database_url: &str) -> Result<Self> {
        ClimateStoreBuilder::new(database_url).build().await
    }

    /// Create a builder for more configuration options.
    pub fn builder(database_url: impl Into<String>) -> ClimateStoreBuilder {
        ClimateStoreBuilder::new(database_url)
    }

    /// Check that the store answers a trivial query.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// All measurement rows in storage order.
    pub async fn measurements(&self) -> Result<Vec<Measurement>> {
        let rows = sqlx::query_as::<_, Measurement>(
            "SELECT station, date, CAST(prcp AS REAL) AS prcp, CAST(tobs AS REAL) AS tobs \
             FROM measurement ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Precipitation keyed by date.
    ///
    /// When several stations report on the same date, the row read last wins.
    /// Values are not aggregated across stations.
    pub async fn precipitation(&self) -> Result<BTreeMap<String, Option<f64>>> {
        let by_date = self
            .measurements()
            .await?
            .into_iter()
            .map(|m| (m.date, m.prcp))
            .collect();
        Ok(by_date)
    }

    /// Identifiers of every station, in ascending order.
    pub async fn station_ids(&self) -> Result<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>("SELECT station FROM station ORDER BY station")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    /// Full station records, in ascending identifier order.
    pub async fn stations(&self) -> Result<Vec<Station>> {
        let stations = sqlx::query_as::<_, Station>(
            "SELECT station, name, \
                    CAST(latitude AS REAL) AS latitude, \
                    CAST(longitude AS REAL) AS longitude, \
                    CAST(elevation AS REAL) AS elevation \
             FROM station ORDER BY station",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(stations)
    }

    /// Measurement counts per station, most active first.
    ///
    /// Stations with equal counts are ordered by identifier.
    pub async fn station_activity(&self) -> Result<Vec<StationActivity>> {
        let activity = sqlx::query_as::<_, StationActivity>(
            "SELECT station, COUNT(*) AS observations FROM measurement \
             GROUP BY station ORDER BY observations DESC, station ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(activity)
    }

    /// The station with the most measurements, or `None` if there are none.
    pub async fn most_active_station(&self) -> Result<Option<StationActivity>> {
        let top = sqlx::query_as::<_, StationActivity>(
            "SELECT station, COUNT(*) AS observations FROM measurement \
             GROUP BY station ORDER BY observations DESC, station ASC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(top)
    }

    /// Most recent date recorded by `station`.
    pub async fn latest_date(&self, station: &str) -> Result<Option<String>> {
        let latest = sqlx::query_scalar::<_, Option<String>>(
            "SELECT MAX(date) FROM measurement WHERE station = ?1",
        )
        .bind(station)
        .fetch_one(&self.pool)
        .await?;
        Ok(latest)
    }

    /// Temperature observations of `station` on or after `since`, oldest first.
    pub async fn temperature_observations(
        &self,
        station: &str,
        since: &str,
    ) -> Result<Vec<TemperatureObservation>> {
        let observations = sqlx::query_as::<_, TemperatureObservation>(
            "SELECT date, CAST(tobs AS REAL) AS tobs FROM measurement \
             WHERE station = ?1 AND date >= ?2 ORDER BY date ASC",
        )
        .bind(station)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(observations)
    }

    /// The last 365 days of observations for the most active station.
    ///
    /// The window ends at the station's latest date and starts exactly 365
    /// calendar days earlier, inclusive. Returns `None` when the measurement
    /// table is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::InvalidDate`] if the station's latest date is
    /// not a `YYYY-MM-DD` string.
    pub async fn last_year_of_tobs(&self) -> Result<Option<TobsWindow>> {
        let Some(top) = self.most_active_station().await? else {
            return Ok(None);
        };
        let Some(end) = self.latest_date(&top.station).await? else {
            return Ok(None);
        };

        let start = one_year_before(&end)?;
        let observations = self.temperature_observations(&top.station, &start).await?;

        Ok(Some(TobsWindow {
            station: top.station,
            start,
            end,
            observations,
        }))
    }

    /// Minimum, average and maximum temperature across all stations.
    ///
    /// Covers `start <= date`, and `date <= end` when `end` is given. Bounds
    /// are compared as text and are not validated, so malformed or inverted
    /// bounds produce empty stats rather than an error.
    pub async fn temperature_stats(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<TemperatureStats> {
        let row: (Option<f64>, Option<f64>, Option<f64>) = match end {
            Some(end) => {
                sqlx::query_as(
                    "SELECT CAST(MIN(tobs) AS REAL), AVG(tobs), CAST(MAX(tobs) AS REAL) \
                     FROM measurement WHERE date >= ?1 AND date <= ?2",
                )
                .bind(start)
                .bind(end)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT CAST(MIN(tobs) AS REAL), AVG(tobs), CAST(MAX(tobs) AS REAL) \
                     FROM measurement WHERE date >= ?1",
                )
                .bind(start)
                .fetch_one(&self.pool)
                .await?
            }
        };

        let (min, avg, max) = row;
        Ok(TemperatureStats { min, avg, max })
    }
}

/// Builder for creating a [`ClimateStore`] with custom configuration.
#[derive(Debug, Clone)]
pub struct ClimateStoreBuilder {
    database_url: String,
    max_connections: u32,
}

impl ClimateStoreBuilder {
    /// Create a new builder for the dataset at `database_url`.
    ///
    /// Accepts a `sqlite:` URL or a plain file path.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SURFSUP_DATABASE_URL` | SQLite URL or path of the dataset | `sqlite://Resources/hawaii.sqlite` |
    /// | `SURFSUP_MAX_CONNECTIONS` | Pool size | 5 |
    pub fn from_env() -> Self {
        let database_url = std::env::var("SURFSUP_DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let max_connections = std::env::var("SURFSUP_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Self {
            database_url,
            max_connections,
        }
    }

    /// Set the maximum number of pooled connections.
    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    /// The configured database location.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Open the pool.
    ///
    /// Connections are opened read-only. The database must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::Config`] if the URL cannot be parsed and
    /// [`ClimateError::Database`] if the database cannot be opened.
    pub async fn build(self) -> Result<ClimateStore> {
        let options = connect_options(&self.database_url)?.read_only(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(options)
            .await?;

        Ok(ClimateStore { pool })
    }
}

fn connect_options(database_url: &str) -> Result<SqliteConnectOptions> {
    if database_url.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(database_url).map_err(|e| ClimateError::Config {
            message: format!("invalid database URL {database_url:?}: {e}"),
        })
    } else {
        Ok(SqliteConnectOptions::new().filename(database_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Create a dataset with the given measurement rows and station ids.
    async fn create_test_db(
        dir: &Path,
        measurements: &[(&str, &str, Option<f64>, i64)],
        stations: &[&str],
    ) -> PathBuf {
        let path = dir.join("climate.sqlite");
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE station (id INTEGER PRIMARY KEY, station TEXT, name TEXT, \
             latitude FLOAT, longitude FLOAT, elevation FLOAT)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "CREATE TABLE measurement (id INTEGER PRIMARY KEY, station TEXT, date TEXT, \
             prcp FLOAT, tobs FLOAT)",
        )
        .execute(&pool)
        .await
        .unwrap();

        for (i, station) in stations.iter().enumerate() {
            sqlx::query(
                "INSERT INTO station (station, name, latitude, longitude, elevation) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(*station)
            .bind(format!("STATION {i}, HI US"))
            .bind(21.0 + i as f64 * 0.1)
            .bind(-157.8)
            .bind(3.0 * (i + 1) as f64)
            .execute(&pool)
            .await
            .unwrap();
        }

        for (station, date, prcp, tobs) in measurements {
            sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, ?2, ?3, ?4)")
                .bind(*station)
                .bind(*date)
                .bind(*prcp)
                .bind(*tobs)
                .execute(&pool)
                .await
                .unwrap();
        }

        pool.close().await;
        path
    }

    async fn open(path: &Path) -> ClimateStore {
        ClimateStoreBuilder::new(path.to_str().unwrap())
            .max_connections(2)
            .build()
            .await
            .unwrap()
    }

    fn sample_rows() -> Vec<(&'static str, &'static str, Option<f64>, i64)> {
        vec![
            ("USC00519397", "2016-08-22", Some(0.1), 75),
            ("USC00519281", "2016-08-22", Some(0.4), 77),
            ("USC00519281", "2016-08-23", Some(1.79), 77),
            ("USC00519281", "2017-01-01", None, 62),
            ("USC00519281", "2017-08-18", Some(0.06), 79),
            ("USC00519397", "2017-08-23", Some(0.0), 81),
        ]
    }

    #[tokio::test]
    async fn test_missing_database_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.sqlite");
        let result = ClimateStoreBuilder::new(path.to_str().unwrap()).build().await;
        assert!(matches!(result, Err(ClimateError::Database(_))));
    }

    #[tokio::test]
    async fn test_invalid_url_is_config_error() {
        let result = ClimateStoreBuilder::new("sqlite://db.sqlite?mode=bogus")
            .build()
            .await;
        assert!(matches!(result, Err(ClimateError::Config { .. })));
    }

    #[tokio::test]
    async fn test_sqlite_url_accepted() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_db(temp_dir.path(), &[], &[]).await;
        let url = format!("sqlite://{}", path.display());
        let store = ClimateStore::connect(&url).await.unwrap();
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_store_is_read_only() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_db(temp_dir.path(), &sample_rows(), &[]).await;
        let store = open(&path).await;

        let result = sqlx::query("DELETE FROM measurement").execute(&store.pool).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_precipitation_last_row_wins() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_db(temp_dir.path(), &sample_rows(), &[]).await;
        let store = open(&path).await;

        let prcp = store.precipitation().await.unwrap();

        // One entry per distinct date
        assert_eq!(prcp.len(), 5);
        // 2016-08-22 is reported twice; the later row overwrites
        assert_eq!(prcp["2016-08-22"], Some(0.4));
        assert_eq!(prcp["2017-01-01"], None);
        assert_eq!(prcp["2017-08-23"], Some(0.0));
    }

    #[tokio::test]
    async fn test_measurements_keep_storage_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_db(temp_dir.path(), &sample_rows(), &[]).await;
        let store = open(&path).await;

        let rows = store.measurements().await.unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].station, "USC00519397");
        assert_eq!(rows[0].tobs, 75.0);
        assert_eq!(rows[3].prcp, None);
    }

    #[tokio::test]
    async fn test_station_ids_and_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_db(
            temp_dir.path(),
            &[],
            &["USC00519397", "USC00513117", "USC00519281"],
        )
        .await;
        let store = open(&path).await;

        let ids = store.station_ids().await.unwrap();
        assert_eq!(ids, vec!["USC00513117", "USC00519281", "USC00519397"]);

        let stations = store.stations().await.unwrap();
        assert_eq!(stations.len(), 3);
        assert_eq!(stations[0].station, "USC00513117");
        assert_eq!(stations[0].name, "STATION 1, HI US");
        assert!(stations[0].elevation > 0.0);
    }

    #[tokio::test]
    async fn test_station_ids_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_db(temp_dir.path(), &[], &[]).await;
        let store = open(&path).await;

        assert!(store.station_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_most_active_station() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_db(temp_dir.path(), &sample_rows(), &[]).await;
        let store = open(&path).await;

        let top = store.most_active_station().await.unwrap().unwrap();
        assert_eq!(top.station, "USC00519281");
        assert_eq!(top.observations, 4);

        let activity = store.station_activity().await.unwrap();
        assert_eq!(activity.len(), 2);
        assert_eq!(activity[1].station, "USC00519397");
        assert_eq!(activity[1].observations, 2);
    }

    #[tokio::test]
    async fn test_most_active_station_tie_break() {
        let temp_dir = TempDir::new().unwrap();
        let rows: Vec<(&str, &str, Option<f64>, i64)> = vec![
            ("USC2", "2017-01-01", None, 70),
            ("USC1", "2017-01-01", None, 71),
            ("USC2", "2017-01-02", None, 72),
            ("USC1", "2017-01-02", None, 73),
        ];
        let path = create_test_db(temp_dir.path(), &rows, &[]).await;
        let store = open(&path).await;

        let top = store.most_active_station().await.unwrap().unwrap();
        assert_eq!(top.station, "USC1");
    }

    #[tokio::test]
    async fn test_last_year_of_tobs() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_db(temp_dir.path(), &sample_rows(), &[]).await;
        let store = open(&path).await;

        let window = store.last_year_of_tobs().await.unwrap().unwrap();
        assert_eq!(window.station, "USC00519281");
        assert_eq!(window.end, "2017-08-18");
        assert_eq!(window.start, "2016-08-18");

        let dates: Vec<&str> = window.observations.iter().map(|o| o.date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["2016-08-22", "2016-08-23", "2017-01-01", "2017-08-18"]
        );
        assert!(window.observations.iter().all(|o| o.date >= window.start));
    }

    #[tokio::test]
    async fn test_last_year_of_tobs_excludes_older_rows() {
        let temp_dir = TempDir::new().unwrap();
        let rows: Vec<(&str, &str, Option<f64>, i64)> = vec![
            ("USC1", "2016-08-22", None, 70),
            ("USC1", "2016-08-23", None, 72),
            ("USC1", "2017-08-23", None, 81),
        ];
        let path = create_test_db(temp_dir.path(), &rows, &[]).await;
        let store = open(&path).await;

        let window = store.last_year_of_tobs().await.unwrap().unwrap();
        assert_eq!(window.start, "2016-08-23");
        assert_eq!(window.observations.len(), 2);
        assert_eq!(window.observations[0].date, "2016-08-23");
        assert_eq!(window.observations[1].tobs, 81.0);
    }

    #[tokio::test]
    async fn test_last_year_of_tobs_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_db(temp_dir.path(), &[], &[]).await;
        let store = open(&path).await;

        assert!(store.last_year_of_tobs().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_last_year_of_tobs_bad_stored_date() {
        let temp_dir = TempDir::new().unwrap();
        let rows: Vec<(&str, &str, Option<f64>, i64)> = vec![("USC1", "23/08/2017", None, 81)];
        let path = create_test_db(temp_dir.path(), &rows, &[]).await;
        let store = open(&path).await;

        let result = store.last_year_of_tobs().await;
        assert!(matches!(result, Err(ClimateError::InvalidDate { .. })));
    }

    #[tokio::test]
    async fn test_temperature_stats() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_db(temp_dir.path(), &sample_rows(), &[]).await;
        let store = open(&path).await;

        let stats = store.temperature_stats("2017-01-01", None).await.unwrap();
        assert_eq!(stats.min, Some(62.0));
        assert_eq!(stats.max, Some(81.0));
        let avg = stats.avg.unwrap();
        assert!((avg - (62.0 + 79.0 + 81.0) / 3.0).abs() < 1e-9);

        // Inclusive on both ends
        let stats = store
            .temperature_stats("2016-08-23", Some("2017-08-18"))
            .await
            .unwrap();
        assert_eq!(stats.min, Some(62.0));
        assert_eq!(stats.max, Some(79.0));
    }

    #[tokio::test]
    async fn test_temperature_stats_open_end_matches_late_end() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_db(temp_dir.path(), &sample_rows(), &[]).await;
        let store = open(&path).await;

        for start in ["2016-01-01", "2016-08-23", "2017-08-23"] {
            let open_ended = store.temperature_stats(start, None).await.unwrap();
            let bounded = store
                .temperature_stats(start, Some("9999-12-31"))
                .await
                .unwrap();
            assert_eq!(open_ended, bounded);
        }
    }

    #[tokio::test]
    async fn test_temperature_stats_empty_ranges() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_db(temp_dir.path(), &sample_rows(), &[]).await;
        let store = open(&path).await;

        // Beyond the dataset
        assert!(store
            .temperature_stats("2099-01-01", None)
            .await
            .unwrap()
            .is_empty());
        // Inverted bounds
        assert!(store
            .temperature_stats("2017-08-23", Some("2016-01-01"))
            .await
            .unwrap()
            .is_empty());
        // Not a date at all; compared as text
        assert!(store
            .temperature_stats("not-a-date", None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_integer_tobs_column_reads_as_float() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("integer.sqlite");
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE measurement (id INTEGER PRIMARY KEY, station TEXT, date TEXT, \
             prcp FLOAT, tobs INTEGER)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES ('USC1', '2017-08-23', NULL, 81)")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;

        let store = open(&path).await;

        let window = store.last_year_of_tobs().await.unwrap().unwrap();
        assert_eq!(window.observations[0].tobs, 81.0);

        let stats = store.temperature_stats("2017-01-01", None).await.unwrap();
        assert_eq!(stats.min, Some(81.0));
        assert_eq!(stats.avg, Some(81.0));
        assert_eq!(stats.max, Some(81.0));
    }
}
