use crate::{
    db::SpendingStore,
    error::AppResult,
    models::{DeletedSpending, NewSpending, Transaction},
};

/// Records a spending and returns it with its transaction id
pub async fn record_spending(
    store: &dyn SpendingStore,
    spending: NewSpending,
) -> AppResult<Transaction> {
    Ok(store.insert(spending).await?)
}

/// Lists every spending of a user; empty for unknown users
pub async fn list_spendings(store: &dyn SpendingStore, user_id: i64) -> AppResult<Vec<Transaction>> {
    Ok(store.select_by_user(user_id).await?)
}

/// Deletes every spending of a user and reports what was deleted
pub async fn delete_spendings(
    store: &dyn SpendingStore,
    user_id: i64,
) -> AppResult<Vec<DeletedSpending>> {
    let deleted = store.delete_by_user(user_id).await?;
    Ok(deleted.into_iter().map(DeletedSpending::from).collect())
}
