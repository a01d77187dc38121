use crate::{db::SpendingStore, error::AppResult, models::MatrixShape};

/// Shape of the user × merchant matrix implied by the recorded spendings
///
/// Rows are distinct users, columns are distinct merchants.
pub async fn matrix_shape(store: &dyn SpendingStore) -> AppResult<MatrixShape> {
    let rows = store.count_distinct_users().await?;
    let cols = store.count_distinct_merchants().await?;

    Ok(MatrixShape::new(rows, cols))
}
