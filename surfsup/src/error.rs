//! Error types for the SurfsUp library.

use thiserror::Error;

/// Errors that can occur when querying the climate dataset.
#[derive(Error, Debug)]
pub enum ClimateError {
    /// The data store is unreachable or a query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store configuration could not be used.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A date stored in the dataset is not a `YYYY-MM-DD` string.
    #[error("Invalid date in dataset: {value:?} (expected YYYY-MM-DD)")]
    InvalidDate { value: String },
}

/// Result type alias using [`ClimateError`].
pub type Result<T> = std::result::Result<T, ClimateError>;
