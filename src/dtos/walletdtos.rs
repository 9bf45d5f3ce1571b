use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::walletmodels::*;

#[derive(Debug, Serialize, Deserialize)]
pub struct WalletResponseDto {
    pub balance: i64,
    pub total_deposit: i64,
    pub total_spent: i64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Wallet> for WalletResponseDto {
    fn from(wallet: Wallet) -> Self {
        Self {
            balance: wallet.balance,
            total_deposit: wallet.total_deposit,
            total_spent: wallet.total_spent,
            updated_at: wallet.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct DepositRequestDto {
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,

    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TransactionHistoryQueryDto {
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,

    #[validate(range(min = 1))]
    pub page: Option<usize>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponseDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: i64,
    pub balance_after: i64,
    pub status: TransactionStatus,
    pub reference: String,
    pub description: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Transaction> for TransactionResponseDto {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            transaction_type: tx.transaction_type,
            amount: tx.amount,
            balance_after: tx.balance_after,
            status: tx.status,
            reference: tx.reference,
            description: tx.description,
            created_at: tx.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionHistoryData {
    pub transactions: Vec<TransactionResponseDto>,
    pub pagination: super::PaginationMetadata,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct FinanceQueryDto {
    pub status: Option<TransactionStatus>,

    #[validate(range(min = 1))]
    pub page: Option<usize>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

/// Admin adjustment addressed by user id (`/admin/finance/adjust`).
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AdjustBalanceDto {
    pub user_id: Uuid,

    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,

    #[serde(rename = "type")]
    pub direction: AdjustDirection,

    #[validate(length(min = 1, max = 200, message = "Note must be between 1-200 characters"))]
    pub note: String,
}

/// Admin adjustment addressed by route (`/admin/users/{id}/wallet`).
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UserWalletAdjustDto {
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,

    #[serde(rename = "type")]
    pub direction: AdjustDirection,

    #[validate(length(
        min = 1,
        max = 200,
        message = "Description must be between 1-200 characters"
    ))]
    pub description: String,
}
