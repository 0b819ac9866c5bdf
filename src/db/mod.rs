pub mod models;
pub mod pg;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

pub use pg::PgStore;

/// Builds the single shared Postgres pool from DATABASE_URL.
pub async fn connect_pool(database_url: &str, config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(database_url)
        .await
}
