//! Synthetic spendings for an empty store.
//!
//! Each of 100 users visits one to three of three merchants, a handful of times
//! each, with right-skewed amounts.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{ChiSquared, Distribution, Normal};

use super::{SpendingStore, SqliteSpendingStore};
use crate::models::NewSpending;

const USER_COUNT: i64 = 100;
const MERCHANT_COUNT: i64 = 3;

const BASE_AMOUNT: f64 = 3.0;
const SCALING_FACTOR: f64 = 5.0;
const AMOUNT_DEGREES_OF_FREEDOM: f64 = 3.0;

const MEAN_MERCHANTS_VISITED: f64 = 1.8;
const STD_DEV_MERCHANTS_VISITED: f64 = 0.7;
const MAX_VISITS_PER_MERCHANT: u32 = 20;

/// Generates mock spendings for users `1..=100` across merchants `1..=3`
pub fn generate_mock_spendings<R: Rng + ?Sized>(rng: &mut R) -> anyhow::Result<Vec<NewSpending>> {
    let merchants_visited_dist = Normal::new(MEAN_MERCHANTS_VISITED, STD_DEV_MERCHANTS_VISITED)?;
    let amount_dist = ChiSquared::new(AMOUNT_DEGREES_OF_FREEDOM)?;

    let merchants: Vec<i64> = (1..=MERCHANT_COUNT).collect();
    let mut spendings = Vec::new();

    for user_id in 1..=USER_COUNT {
        let drawn: f64 = merchants_visited_dist.sample(rng);
        let merchants_visited = (drawn.trunc() as i64).clamp(1, MERCHANT_COUNT) as usize;

        for &merchant_id in merchants.choose_multiple(rng, merchants_visited) {
            let visits = rng.gen_range(1..MAX_VISITS_PER_MERCHANT);
            for _ in 0..visits {
                let amount = BASE_AMOUNT + amount_dist.sample(rng) * SCALING_FACTOR;
                spendings.push(NewSpending::new(user_id, merchant_id, amount));
            }
        }
    }

    Ok(spendings)
}

/// Fills the store with mock spendings unless it already holds data
///
/// Returns the number of rows inserted.
pub async fn seed_if_empty(store: &SqliteSpendingStore) -> anyhow::Result<u64> {
    if store.count_distinct_users().await? > 0 {
        tracing::info!("Store already populated, skipping mock data");
        return Ok(0);
    }

    let spendings = generate_mock_spendings(&mut rand::thread_rng())?;
    let inserted = store.insert_many(&spendings).await?;

    tracing::info!(inserted, "Mock data generated");

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn test_mock_spendings_cover_every_user() {
        let mut rng = StdRng::seed_from_u64(7);
        let spendings = generate_mock_spendings(&mut rng).unwrap();

        let users: HashSet<i64> = spendings.iter().map(|s| s.user_id).collect();
        assert_eq!(users.len(), USER_COUNT as usize);
        assert!(users.iter().all(|id| (1..=USER_COUNT).contains(id)));
    }

    #[test]
    fn test_mock_spendings_respect_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let spendings = generate_mock_spendings(&mut rng).unwrap();

        let mut visits: HashMap<(i64, i64), u32> = HashMap::new();
        for spending in &spendings {
            assert!((1..=MERCHANT_COUNT).contains(&spending.merchant_id));
            // chi-squared draws are non-negative
            assert!(spending.amount >= BASE_AMOUNT);
            *visits.entry((spending.user_id, spending.merchant_id)).or_default() += 1;
        }

        assert!(visits
            .values()
            .all(|&count| (1..MAX_VISITS_PER_MERCHANT).contains(&count)));
    }

    #[test]
    fn test_mock_amounts_center_on_chi_squared_mean() {
        let spendings = generate_mock_spendings(&mut StdRng::seed_from_u64(11)).unwrap();
        let mean = spendings.iter().map(|s| s.amount).sum::<f64>() / spendings.len() as f64;

        // E[3 + 5 * chi2(3)] = 18
        assert!((16.0..20.0).contains(&mean), "mean amount was {}", mean);
    }

    #[test]
    fn test_mock_spendings_are_reproducible_for_a_seed() {
        let first = generate_mock_spendings(&mut StdRng::seed_from_u64(3)).unwrap();
        let second = generate_mock_spendings(&mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_seed_if_empty_only_seeds_once() {
        let pool = create_pool("sqlite::memory:", 1).await.unwrap();
        let store = SqliteSpendingStore::new(pool);
        store.migrate().await.unwrap();

        let inserted = seed_if_empty(&store).await.unwrap();
        assert!(inserted > 0);
        assert_eq!(
            store.count_distinct_users().await.unwrap(),
            USER_COUNT
        );

        assert_eq!(seed_if_empty(&store).await.unwrap(), 0);
    }
}
