//! Postgres pool construction
//!
//! The caller picks the connection limit; acquiring a connection is bounded
//! so a saturated pool turns into `PoolTimedOut` (503) instead of a hung request.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// How long a request waits for a free connection.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

fn options(max_connections: u32) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Open a pool of at most `max_connections` against `database_url`.
///
/// ```ignore
/// let pool = connect("postgres://localhost/stockroom", 5).await?;
/// ```
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    options(max_connections).connect(database_url).await
}

/// Pool with the schema in place, for tests that need a real database.
#[cfg(test)]
pub(crate) async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = connect(&url, 2).await.expect("pool creation failed");
    super::migrations::run(&pool).await.expect("schema");
    pool
}
