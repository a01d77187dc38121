use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use super::StoreResult;

/// Creates a SQLite connection pool
///
/// Every store operation checks a connection out of this pool and hands it back
/// when the operation's future completes or is dropped.
///
/// An in-memory database only lives as long as its connection, so `:memory:` URLs
/// get a single connection that is never reaped.
pub async fn create_pool(database_url: &str, max_connections: u32) -> StoreResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?
    };

    tracing::debug!(max_connections, "SQLite pool created");

    Ok(pool)
}
