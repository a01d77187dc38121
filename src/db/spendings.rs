use sqlx::SqlitePool;

use super::StoreResult;
use crate::models::{NewSpending, Transaction};

/// Data-access contract for the `spendings` table
///
/// Every operation is atomic with respect to concurrent callers. Implementations
/// hold no per-request state, so one store can be shared across handlers.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SpendingStore: Send + Sync {
    /// Appends a spending and returns it with its assigned transaction id
    async fn insert(&self, spending: NewSpending) -> StoreResult<Transaction>;

    /// Returns every transaction recorded for the user
    async fn select_by_user(&self, user_id: i64) -> StoreResult<Vec<Transaction>>;

    /// Removes every transaction recorded for the user and returns what was removed
    ///
    /// The read and the delete observe the same rows: nothing inserted concurrently
    /// is dropped without being reported.
    async fn delete_by_user(&self, user_id: i64) -> StoreResult<Vec<Transaction>>;

    async fn count_distinct_users(&self) -> StoreResult<i64>;

    async fn count_distinct_merchants(&self) -> StoreResult<i64>;
}

/// SQLite-backed spending store
#[derive(Clone)]
pub struct SqliteSpendingStore {
    pool: SqlitePool,
}

impl SqliteSpendingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the `spendings` table if it does not exist yet
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::debug!("Spendings schema up to date");
        Ok(())
    }

    /// Inserts a batch of spendings in one transaction
    ///
    /// Either every row lands or none does.
    pub async fn insert_many(&self, spendings: &[NewSpending]) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for spending in spendings {
            inserted += sqlx::query(
                "INSERT INTO spendings (user_id, merchant_id, amount) VALUES (?, ?, ?)",
            )
            .bind(spending.user_id)
            .bind(spending.merchant_id)
            .bind(spending.amount)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;

        tracing::info!(inserted, "Bulk inserted spendings");

        Ok(inserted)
    }
}

#[async_trait::async_trait]
impl SpendingStore for SqliteSpendingStore {
    async fn insert(&self, spending: NewSpending) -> StoreResult<Transaction> {
        let transaction_id =
            sqlx::query("INSERT INTO spendings (user_id, merchant_id, amount) VALUES (?, ?, ?)")
                .bind(spending.user_id)
                .bind(spending.merchant_id)
                .bind(spending.amount)
                .execute(&self.pool)
                .await?
                .last_insert_rowid();

        tracing::debug!(
            transaction_id,
            user_id = spending.user_id,
            merchant_id = spending.merchant_id,
            "Inserted spending"
        );

        Ok(spending.into_transaction(transaction_id))
    }

    async fn select_by_user(&self, user_id: i64) -> StoreResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT transaction_id, user_id, merchant_id, amount
            FROM spendings
            WHERE user_id = ?
            ORDER BY transaction_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn delete_by_user(&self, user_id: i64) -> StoreResult<Vec<Transaction>> {
        // Single statement, so the reported rows are exactly the removed rows
        let mut rows = sqlx::query_as::<_, Transaction>(
            r#"
            DELETE FROM spendings
            WHERE user_id = ?
            RETURNING transaction_id, user_id, merchant_id, amount
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.sort_by_key(|row| row.transaction_id);

        tracing::info!(user_id, deleted = rows.len(), "Deleted spendings for user");

        Ok(rows)
    }

    async fn count_distinct_users(&self) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT user_id) FROM spendings")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_distinct_merchants(&self) -> StoreResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT merchant_id) FROM spendings")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;

    async fn create_test_store() -> SqliteSpendingStore {
        let pool = create_pool("sqlite::memory:", 1).await.unwrap();
        let store = SqliteSpendingStore::new(pool);
        store.migrate().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = create_test_store().await;

        let first = store.insert(NewSpending::new(1, 2, 19.99)).await.unwrap();
        let second = store.insert(NewSpending::new(1, 5, 4.5)).await.unwrap();

        assert!(second.transaction_id > first.transaction_id);
        assert_eq!(first.user_id, 1);
        assert_eq!(first.merchant_id, 2);
        assert_eq!(first.amount, 19.99);
    }

    #[tokio::test]
    async fn test_select_by_user_filters_on_user() {
        let store = create_test_store().await;
        store.insert(NewSpending::new(1, 2, 10.0)).await.unwrap();
        store.insert(NewSpending::new(2, 2, 11.0)).await.unwrap();
        store.insert(NewSpending::new(1, 3, -3.0)).await.unwrap();

        let rows = store.select_by_user(1).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.user_id == 1));
        assert_eq!(rows[1].amount, -3.0);

        assert!(store.select_by_user(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_user_returns_removed_rows() {
        let store = create_test_store().await;
        let kept = store.insert(NewSpending::new(2, 9, 1.0)).await.unwrap();
        let a = store.insert(NewSpending::new(1, 2, 10.0)).await.unwrap();
        let b = store.insert(NewSpending::new(1, 3, 12.0)).await.unwrap();

        let deleted = store.delete_by_user(1).await.unwrap();
        assert_eq!(deleted, vec![a, b]);

        assert!(store.select_by_user(1).await.unwrap().is_empty());
        assert_eq!(store.select_by_user(2).await.unwrap(), vec![kept]);

        // Nothing left to report the second time
        assert!(store.delete_by_user(1).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_delete_by_user_reports_each_row_once_under_concurrent_inserts() {
        const INSERTS: usize = 200;

        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("spendings.db").display());
        let store = SqliteSpendingStore::new(create_pool(&url, 4).await.unwrap());
        store.migrate().await.unwrap();

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                let mut ids = Vec::with_capacity(INSERTS);
                for i in 0..INSERTS {
                    let spending = NewSpending::new(1, (i % 3) as i64, 1.0);
                    ids.push(store.insert(spending).await.unwrap().transaction_id);
                }
                ids
            })
        };

        let deleter = {
            let store = store.clone();
            tokio::spawn(async move {
                let mut deleted = Vec::new();
                for _ in 0..50 {
                    deleted.extend(store.delete_by_user(1).await.unwrap());
                    tokio::task::yield_now().await;
                }
                deleted
            })
        };

        let mut inserted = writer.await.unwrap();
        let mut deleted = deleter.await.unwrap();
        deleted.extend(store.delete_by_user(1).await.unwrap());

        // Every inserted row is reported by exactly one delete
        let mut deleted_ids: Vec<i64> = deleted.iter().map(|row| row.transaction_id).collect();
        deleted_ids.sort_unstable();
        inserted.sort_unstable();
        assert_eq!(deleted_ids, inserted);

        assert!(store.select_by_user(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_distinct_counts() {
        let store = create_test_store().await;
        assert_eq!(store.count_distinct_users().await.unwrap(), 0);
        assert_eq!(store.count_distinct_merchants().await.unwrap(), 0);

        store.insert(NewSpending::new(1, 2, 10.0)).await.unwrap();
        store.insert(NewSpending::new(1, 2, 10.0)).await.unwrap();
        store.insert(NewSpending::new(2, 3, 10.0)).await.unwrap();
        store.insert(NewSpending::new(3, 3, 10.0)).await.unwrap();

        assert_eq!(store.count_distinct_users().await.unwrap(), 3);
        assert_eq!(store.count_distinct_merchants().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_insert_many_is_visible_after_commit() {
        let store = create_test_store().await;
        let batch = vec![
            NewSpending::new(1, 1, 5.0),
            NewSpending::new(1, 2, 6.0),
            NewSpending::new(2, 1, 7.0),
        ];

        let inserted = store.insert_many(&batch).await.unwrap();
        assert_eq!(inserted, 3);
        assert_eq!(store.select_by_user(1).await.unwrap().len(), 2);
        assert_eq!(store.count_distinct_users().await.unwrap(), 2);
    }
}
