pub mod seed;
pub mod spendings;
pub mod sqlite;

pub use spendings::{SpendingStore, SqliteSpendingStore};
pub use sqlite::create_pool;

#[cfg(test)]
pub use spendings::MockSpendingStore;

/// Errors raised by the spending store
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;
