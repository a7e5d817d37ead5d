//! HTTP request handlers for the climate API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::AppState;

/// Route listing served by the home page.
pub const HOME_PAGE: &str = "Welcome to the Climate App!<br/>\
Available Routes:<br/>\
/api/v1.0/precipitation<br/>\
/api/v1.0/stations<br/>\
/api/v1.0/tobs<br/>\
/api/v1.0/&lt;start&gt;<br/>\
/api/v1.0/&lt;start&gt;/&lt;end&gt;<br/>\
/health<br/>\
/docs<br/>";

/// Precipitation in inches keyed by `YYYY-MM-DD` date.
///
/// When several stations report on the same date only one value is kept.
#[derive(Debug, Serialize, ToSchema)]
#[schema(value_type = Object)]
pub struct PrecipitationResponse(pub BTreeMap<String, Option<f64>>);

/// One temperature observation.
#[derive(Debug, Serialize, ToSchema)]
pub struct TobsEntry {
    /// Observation date (`YYYY-MM-DD`).
    pub date: String,
    /// Temperature in degrees Fahrenheit.
    ///
    /// Always a JSON float, so an integer reading of 81 is served as `81.0`.
    pub tobs: f64,
}

/// Temperature statistics over a date range.
///
/// Every field is `null` when no measurement falls in the range.
#[derive(Debug, Serialize, ToSchema)]
pub struct TemperatureStatsResponse {
    /// Minimum temperature (°F).
    #[serde(rename = "TMIN")]
    pub tmin: Option<f64>,
    /// Average temperature (°F).
    #[serde(rename = "TAVG")]
    pub tavg: Option<f64>,
    /// Maximum temperature (°F).
    #[serde(rename = "TMAX")]
    pub tmax: Option<f64>,
}

impl From<surfsup::TemperatureStats> for TemperatureStatsResponse {
    fn from(stats: surfsup::TemperatureStats) -> Self {
        Self {
            tmin: stats.min,
            tavg: stats.avg,
            tmax: stats.max,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// List the available routes.
#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses((status = 200, description = "HTML listing of the available routes", body = String, content_type = "text/html"))
)]
pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

/// Precipitation for every date in the dataset.
///
/// # Returns
///
/// - `200 OK` with a date to precipitation map (empty if there are no measurements)
/// - `500 Internal Server Error` if the data store is unavailable
#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    tag = "climate",
    responses(
        (status = 200, description = "Precipitation keyed by date", body = PrecipitationResponse),
        (status = 500, description = "Data store unavailable", body = ErrorResponse)
    )
)]
pub async fn get_precipitation(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::debug!("Precipitation query");

    match state.store.precipitation().await {
        Ok(by_date) => {
            tracing::info!(dates = by_date.len(), "Precipitation returned");
            (StatusCode::OK, Json(PrecipitationResponse(by_date))).into_response()
        }
        Err(e) => error_response("precipitation", e),
    }
}

/// Identifiers of every station.
#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    tag = "climate",
    responses(
        (status = 200, description = "Station identifiers", body = Vec<String>),
        (status = 500, description = "Data store unavailable", body = ErrorResponse)
    )
)]
pub async fn get_stations(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::debug!("Stations query");

    match state.store.station_ids().await {
        Ok(ids) => {
            tracing::info!(stations = ids.len(), "Stations returned");
            (StatusCode::OK, Json(ids)).into_response()
        }
        Err(e) => error_response("stations", e),
    }
}

/// Last year of temperature observations for the most active station.
///
/// The most active station is the one with the most measurements (ties go to
/// the lowest identifier). Observations cover the 365 days up to and
/// including its latest date, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    tag = "climate",
    responses(
        (status = 200, description = "Observations in ascending date order", body = Vec<TobsEntry>),
        (status = 500, description = "Data store unavailable", body = ErrorResponse)
    )
)]
pub async fn get_tobs(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::debug!("Temperature observations query");

    match state.store.last_year_of_tobs().await {
        Ok(Some(window)) => {
            tracing::info!(
                station = %window.station,
                start = %window.start,
                end = %window.end,
                observations = window.observations.len(),
                "Temperature observations returned"
            );
            let entries: Vec<TobsEntry> = window
                .observations
                .into_iter()
                .map(|o| TobsEntry {
                    date: o.date,
                    tobs: o.tobs,
                })
                .collect();
            (StatusCode::OK, Json(entries)).into_response()
        }
        Ok(None) => {
            tracing::info!("No measurements, returning empty observation list");
            (StatusCode::OK, Json(Vec::<TobsEntry>::new())).into_response()
        }
        Err(e) => error_response("tobs", e),
    }
}

/// Temperature statistics from `start` to the end of the dataset.
///
/// `start` is compared as text against the stored `YYYY-MM-DD` dates and is
/// not validated.
#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    tag = "climate",
    params(("start" = String, Path, description = "First date included (YYYY-MM-DD)")),
    responses(
        (status = 200, description = "TMIN, TAVG and TMAX", body = TemperatureStatsResponse),
        (status = 500, description = "Data store unavailable", body = ErrorResponse)
    )
)]
pub async fn get_stats_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> impl IntoResponse {
    tracing::debug!(start = %start, "Temperature stats query");
    temperature_stats(&state, &start, None).await
}

/// Temperature statistics between `start` and `end`, inclusive.
///
/// An inverted range is not an error; it matches nothing and every field is `null`.
#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    tag = "climate",
    params(
        ("start" = String, Path, description = "First date included (YYYY-MM-DD)"),
        ("end" = String, Path, description = "Last date included (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "TMIN, TAVG and TMAX", body = TemperatureStatsResponse),
        (status = 500, description = "Data store unavailable", body = ErrorResponse)
    )
)]
pub async fn get_stats_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> impl IntoResponse {
    tracing::debug!(start = %start, end = %end, "Temperature stats query");
    temperature_stats(&state, &start, Some(end.as_str())).await
}

async fn temperature_stats(
    state: &AppState,
    start: &str,
    end: Option<&str>,
) -> axum::response::Response {
    match state.store.temperature_stats(start, end).await {
        Ok(stats) => {
            tracing::info!(
                start = start,
                end = end,
                tmin = stats.min,
                tavg = stats.avg,
                tmax = stats.max,
                "Temperature stats returned"
            );
            (StatusCode::OK, Json(TemperatureStatsResponse::from(stats))).into_response()
        }
        Err(e) => error_response("temperature stats", e),
    }
}

/// Create an error response for a failed query.
fn error_response(query: &str, e: surfsup::ClimateError) -> axum::response::Response {
    tracing::warn!(query = query, error = %e, "Query failed");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

/// Health check endpoint.
///
/// Returns service status and version once the data store answers.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Data store unavailable", body = ErrorResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
