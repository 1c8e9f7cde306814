/// Database access layer
///
/// The post document store trait lives in `post_store` together with the
/// PostgreSQL implementation; `memory` holds the in-process store used by
/// tests and local development.
pub mod memory;
pub mod post_store;

pub use memory::MemoryPostStore;
pub use post_store::{PgPostStore, PostRecord, PostStore};

use crate::config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Create the shared PostgreSQL connection pool.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.url)
        .await
}
