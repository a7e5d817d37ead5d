pub mod activity;
pub mod precipitation;
pub mod stations;
pub mod stats;
pub mod tobs;

use anyhow::{Context, Result};
use surfsup::{ClimateStore, ClimateStoreBuilder};

/// Open the dataset from `--database-url`, falling back to the environment.
pub async fn open_store(database_url: Option<String>) -> Result<ClimateStore> {
    let builder = match database_url {
        Some(url) => ClimateStore::builder(url),
        None => ClimateStoreBuilder::from_env(),
    };

    let location = builder.database_url().to_string();
    builder
        .build()
        .await
        .with_context(|| format!("Failed to open dataset at {location}"))
}
