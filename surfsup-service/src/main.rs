//! SurfsUp Service - HTTP API for historical station climate observations.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SURFSUP_DATABASE_URL` | SQLite URL or path of the dataset | `sqlite://Resources/hawaii.sqlite` |
//! | `SURFSUP_MAX_CONNECTIONS` | Pool size | 5 |
//! | `SURFSUP_PORT` | HTTP server port | 8080 |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `GET /` - List available routes
//! - `GET /api/v1.0/precipitation` - Precipitation keyed by date
//! - `GET /api/v1.0/stations` - Station identifiers
//! - `GET /api/v1.0/tobs` - Last year of observations for the most active station
//! - `GET /api/v1.0/{start}` - TMIN/TAVG/TMAX from a start date
//! - `GET /api/v1.0/{start}/{end}` - TMIN/TAVG/TMAX for an inclusive date range
//! - `GET /health` - Health check
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use surfsup::ClimateStoreBuilder;
use surfsup_service::{app, ApiDoc, AppState};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "surfsup_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load port from environment (service-specific config)
    let port: u16 = std::env::var("SURFSUP_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    // The library handles SURFSUP_DATABASE_URL and SURFSUP_MAX_CONNECTIONS
    let builder = ClimateStoreBuilder::from_env();
    let database_url = builder.database_url().to_string();
    let store = builder.build().await.map_err(|e| {
        tracing::error!(database_url = %database_url, error = %e, "Failed to open dataset");
        e
    })?;

    tracing::info!(
        database_url = %database_url,
        port = port,
        "Starting SurfsUp service"
    );

    let state = Arc::new(AppState { store });

    let app = app(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        );

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
