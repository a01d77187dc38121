use serde::{de, Deserialize, Deserializer, Serialize};

/// A single spending record linking a user to a merchant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Transaction {
    /// Identifier assigned by the store, increasing in insertion order
    pub transaction_id: i64,
    pub user_id: i64,
    pub merchant_id: i64,
    /// No sign constraint: refunds are negative
    pub amount: f64,
}

/// Request body for recording a spending
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSpending {
    pub user_id: i64,
    pub merchant_id: i64,
    /// Accepts a JSON number or a numeric string such as `"19.99"`
    #[serde(deserialize_with = "amount_from_number_or_string")]
    pub amount: f64,
}

impl NewSpending {
    pub fn new(user_id: i64, merchant_id: i64, amount: f64) -> Self {
        Self {
            user_id,
            merchant_id,
            amount,
        }
    }

    /// Attaches the identifier the store assigned on insert
    pub fn into_transaction(self, transaction_id: i64) -> Transaction {
        Transaction {
            transaction_id,
            user_id: self.user_id,
            merchant_id: self.merchant_id,
            amount: self.amount,
        }
    }
}

/// A transaction reported back from a delete
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeletedSpending {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub deleted: bool,
}

impl From<Transaction> for DeletedSpending {
    fn from(transaction: Transaction) -> Self {
        Self {
            transaction,
            deleted: true,
        }
    }
}

fn amount_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(value) => Ok(value),
        Amount::Text(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| de::Error::custom(format!("invalid amount: {:?}", text))),
    }
}
