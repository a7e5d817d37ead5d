//! SurfsUp Service Library
//!
//! HTTP router, handlers and OpenAPI description for the climate API.
//! This library is used by both the surfsup-service binary and integration tests.

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use surfsup::ClimateStore;
use utoipa::OpenApi;

/// Application state shared across handlers.
pub struct AppState {
    /// Read-only handle to the climate dataset.
    pub store: ClimateStore,
}

/// OpenAPI documentation for the climate API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SurfsUp Climate API",
        version = "0.1.0",
        description = "Read-only API over historical precipitation and temperature observations.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::home,
        handlers::get_precipitation,
        handlers::get_stations,
        handlers::get_tobs,
        handlers::get_stats_from,
        handlers::get_stats_between,
        handlers::health_check,
    ),
    components(
        schemas(
            handlers::PrecipitationResponse,
            handlers::TobsEntry,
            handlers::TemperatureStatsResponse,
            handlers::ErrorResponse,
            handlers::HealthResponse,
        )
    ),
    tags(
        (name = "climate", description = "Climate observation endpoints"),
        (name = "system", description = "System and health endpoints")
    )
)]
pub struct ApiDoc;

/// Build the API router.
///
/// Static routes take precedence over the `:start` and `:start/:end`
/// captures, so `/api/v1.0/stations` never reaches the stats handlers.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/api/v1.0/precipitation", get(handlers::get_precipitation))
        .route("/api/v1.0/stations", get(handlers::get_stations))
        .route("/api/v1.0/tobs", get(handlers::get_tobs))
        .route("/api/v1.0/:start", get(handlers::get_stats_from))
        .route("/api/v1.0/:start/:end", get(handlers::get_stats_between))
        .route("/health", get(handlers::health_check))
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{
    ErrorResponse, HealthResponse, PrecipitationResponse, TemperatureStatsResponse, TobsEntry,
};
