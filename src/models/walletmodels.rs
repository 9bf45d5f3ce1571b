use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Order,
    Refund,
    Bonus,
    Manual,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "transaction_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AdjustDirection {
    Add,
    Subtract,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance: i64,
    pub total_deposit: i64,
    pub total_spent: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Append-only ledger row. `amount` is always signed: credits are positive,
/// debits negative, so `balance_after == previous balance + amount` holds for
/// every completed row regardless of its type.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub user_id: Uuid,
    pub transaction_type: TransactionType,
    pub amount: i64,
    pub balance_after: i64,
    pub status: TransactionStatus,
    pub reference: String,
    pub description: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub fn generate_transaction_reference() -> String {
    format!(
        "BH_{}",
        uuid::Uuid::new_v4()
            .simple()
            .to_string()
            .to_uppercase()[..16]
            .to_string()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_has_prefix_and_length() {
        let reference = generate_transaction_reference();
        assert!(reference.starts_with("BH_"));
        assert_eq!(reference.len(), 19);
    }
}
