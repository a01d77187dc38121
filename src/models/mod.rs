use serde::{Deserialize, Serialize};

mod spending;
mod user;

pub use spending::{DeletedSpending, NewSpending, Transaction};
pub use user::{DivideQuery, NameInput, User};

/// Number of transactions a user has at one merchant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MerchantVisits {
    pub merchant_id: i64,
    pub visits: u64,
}

/// Most frequented merchant for a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub user_id: i64,
    /// `None` when the user has no transactions
    pub recommended_merchant_id: Option<i64>,
}

/// Dimensions of the implicit user × merchant spending matrix
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatrixShape {
    pub rows: i64,
    pub cols: i64,
    pub note: String,
}

impl MatrixShape {
    pub fn new(rows: i64, cols: i64) -> Self {
        Self {
            rows,
            cols,
            note: "Rows = users, Columns = merchants".to_string(),
        }
    }
}
