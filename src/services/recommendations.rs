use std::collections::BTreeMap;

use crate::{
    db::SpendingStore,
    error::AppResult,
    models::{MerchantVisits, Transaction},
};

/// Recommends the merchant a user frequents most
///
/// Counts the user's transactions per merchant and picks the merchant with the
/// highest count. When several merchants share the highest count, the one with
/// the lowest `merchant_id` wins, regardless of the order the store returns rows in.
///
/// Returns `None` for a user with no transactions. Store failures fail the whole
/// call; nothing is retried.
pub async fn recommend(store: &dyn SpendingStore, user_id: i64) -> AppResult<Option<i64>> {
    let transactions = store.select_by_user(user_id).await?;

    let candidates = top_merchants(&visit_counts(&transactions));
    let recommended = candidates.first().map(|top| top.merchant_id);

    tracing::debug!(
        user_id,
        transactions = transactions.len(),
        tied_candidates = candidates.len(),
        recommended_merchant_id = ?recommended,
        "Computed recommendation"
    );

    Ok(recommended)
}

/// Visit count per merchant, ordered by `merchant_id`
pub fn visit_counts(transactions: &[Transaction]) -> Vec<MerchantVisits> {
    let mut counts: BTreeMap<i64, u64> = BTreeMap::new();
    for transaction in transactions {
        *counts.entry(transaction.merchant_id).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(merchant_id, visits)| MerchantVisits {
            merchant_id,
            visits,
        })
        .collect()
}

/// All merchants sharing the maximum visit count, ordered by `merchant_id`
pub fn top_merchants(counts: &[MerchantVisits]) -> Vec<MerchantVisits> {
    let Some(max_visits) = counts.iter().map(|c| c.visits).max() else {
        return Vec::new();
    };

    let mut top: Vec<MerchantVisits> = counts
        .iter()
        .filter(|c| c.visits == max_visits)
        .copied()
        .collect();
    top.sort_by_key(|c| c.merchant_id);
    top
}
