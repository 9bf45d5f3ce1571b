use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::walletmodels::*;
use crate::service::error::ServiceError;

/// Wallet ledger operations.
///
/// Every mutating method is one database transaction: the wallet row is read
/// under `FOR UPDATE`, the new state is computed, and the wallet update plus
/// the appended transaction row commit or abort together. Concurrent debits
/// against the same wallet serialize on the row lock.
#[async_trait]
pub trait WalletExt {
    async fn get_wallet(&self, user_id: Uuid) -> Result<Option<Wallet>, ServiceError>;

    /// Records a deposit awaiting manual approval: a `pending` transaction
    /// whose `balance_after` is only a projection. No wallet mutation.
    async fn submit_deposit(
        &self,
        user_id: Uuid,
        amount: i64,
        description: String,
    ) -> Result<Transaction, ServiceError>;

    /// Completes a pending deposit. The snapshot is recomputed from the
    /// current balance; the projection recorded at submission time is
    /// ignored. Fails with `AlreadyProcessed` unless the transaction is
    /// still pending.
    async fn approve_deposit(&self, transaction_id: Uuid) -> Result<Transaction, ServiceError>;

    /// Cancels a pending deposit without touching the wallet.
    async fn reject_deposit(&self, transaction_id: Uuid) -> Result<Transaction, ServiceError>;

    /// Admin credit or debit. The subtract path fails closed if it would
    /// drive the balance negative.
    async fn adjust_balance(
        &self,
        user_id: Uuid,
        amount: i64,
        direction: AdjustDirection,
        note: String,
    ) -> Result<Transaction, ServiceError>;

    async fn get_transaction(
        &self,
        transaction_id: Uuid,
    ) -> Result<Option<Transaction>, ServiceError>;

    async fn get_transactions(
        &self,
        user_id: Uuid,
        transaction_type: Option<TransactionType>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, ServiceError>;

    async fn count_transactions(
        &self,
        user_id: Uuid,
        transaction_type: Option<TransactionType>,
    ) -> Result<i64, ServiceError>;

    /// Back-office view across all users, newest first.
    async fn list_transactions(
        &self,
        status: Option<TransactionStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, ServiceError>;

    async fn count_all_transactions(
        &self,
        status: Option<TransactionStatus>,
    ) -> Result<i64, ServiceError>;
}

const TRANSACTION_COLUMNS: &str = r#"
    id, wallet_id, user_id, transaction_type, amount, balance_after,
    status, reference, description, created_at, updated_at
"#;

#[async_trait]
impl WalletExt for DBClient {
    async fn get_wallet(&self, user_id: Uuid) -> Result<Option<Wallet>, ServiceError> {
        let wallet = sqlx::query_as::<_, Wallet>(
            r#"
            SELECT id, user_id, balance, total_deposit, total_spent, created_at, updated_at
            FROM wallets
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(wallet)
    }

    async fn submit_deposit(
        &self,
        user_id: Uuid,
        amount: i64,
        description: String,
    ) -> Result<Transaction, ServiceError> {
        if amount <= 0 {
            return Err(ServiceError::Validation(
                "Deposit amount must be positive".to_string(),
            ));
        }

        let wallet = self
            .get_wallet(user_id)
            .await?
            .ok_or(ServiceError::NotFound("Wallet"))?;

        // Projection only; approval recomputes the snapshot.
        let projected_balance = wallet.balance + amount;

        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            INSERT INTO transactions
            (wallet_id, user_id, transaction_type, amount, balance_after, status, reference, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(wallet.id)
        .bind(user_id)
        .bind(TransactionType::Deposit)
        .bind(amount)
        .bind(projected_balance)
        .bind(TransactionStatus::Pending)
        .bind(generate_transaction_reference())
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(transaction)
    }

    async fn approve_deposit(&self, transaction_id: Uuid) -> Result<Transaction, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1 FOR UPDATE"
        ))
        .bind(transaction_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::NotFound("Transaction"))?;

        if transaction.transaction_type != TransactionType::Deposit {
            return Err(ServiceError::Validation(
                "Only deposit transactions can be approved".to_string(),
            ));
        }
        if transaction.status != TransactionStatus::Pending {
            return Err(ServiceError::AlreadyProcessed(transaction.id));
        }

        let wallet = sqlx::query("SELECT id, balance FROM wallets WHERE id = $1 FOR UPDATE")
            .bind(transaction.wallet_id)
            .fetch_one(&mut *tx)
            .await?;

        let balance_after = wallet.get::<i64, _>("balance") + transaction.amount;

        sqlx::query(
            r#"
            UPDATE wallets
            SET balance = $2, total_deposit = total_deposit + $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(wallet.get::<Uuid, _>("id"))
        .bind(balance_after)
        .bind(transaction.amount)
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            UPDATE transactions
            SET status = $2, balance_after = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(transaction.id)
        .bind(TransactionStatus::Completed)
        .bind(balance_after)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn reject_deposit(&self, transaction_id: Uuid) -> Result<Transaction, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1 FOR UPDATE"
        ))
        .bind(transaction_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::NotFound("Transaction"))?;

        if transaction.status != TransactionStatus::Pending {
            return Err(ServiceError::AlreadyProcessed(transaction.id));
        }

        let updated = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            UPDATE transactions
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(transaction.id)
        .bind(TransactionStatus::Cancelled)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn adjust_balance(
        &self,
        user_id: Uuid,
        amount: i64,
        direction: AdjustDirection,
        note: String,
    ) -> Result<Transaction, ServiceError> {
        if amount <= 0 {
            return Err(ServiceError::Validation(
                "Adjustment amount must be positive".to_string(),
            ));
        }

        let signed_amount = match direction {
            AdjustDirection::Add => amount,
            AdjustDirection::Subtract => -amount,
        };

        let mut tx = self.pool.begin().await?;

        let wallet = sqlx::query("SELECT id, balance FROM wallets WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ServiceError::NotFound("Wallet"))?;

        let balance = wallet.get::<i64, _>("balance");
        let balance_after = balance + signed_amount;
        if balance_after < 0 {
            return Err(ServiceError::InsufficientBalance {
                required: amount,
                available: balance,
            });
        }

        let deposit_bump = match direction {
            AdjustDirection::Add => amount,
            AdjustDirection::Subtract => 0,
        };

        sqlx::query(
            r#"
            UPDATE wallets
            SET balance = $2, total_deposit = total_deposit + $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(wallet.get::<Uuid, _>("id"))
        .bind(balance_after)
        .bind(deposit_bump)
        .execute(&mut *tx)
        .await?;

        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            INSERT INTO transactions
            (wallet_id, user_id, transaction_type, amount, balance_after, status, reference, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(wallet.get::<Uuid, _>("id"))
        .bind(user_id)
        .bind(TransactionType::Manual)
        .bind(signed_amount)
        .bind(balance_after)
        .bind(TransactionStatus::Completed)
        .bind(generate_transaction_reference())
        .bind(note)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(transaction)
    }

    async fn get_transaction(
        &self,
        transaction_id: Uuid,
    ) -> Result<Option<Transaction>, ServiceError> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1"
        ))
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    async fn get_transactions(
        &self,
        user_id: Uuid,
        transaction_type: Option<TransactionType>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, ServiceError> {
        let transactions = match transaction_type {
            Some(kind) => {
                sqlx::query_as::<_, Transaction>(&format!(
                    r#"
                    SELECT {TRANSACTION_COLUMNS}
                    FROM transactions
                    WHERE user_id = $1 AND transaction_type = $2
                    ORDER BY created_at DESC
                    LIMIT $3 OFFSET $4
                    "#
                ))
                .bind(user_id)
                .bind(kind)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Transaction>(&format!(
                    r#"
                    SELECT {TRANSACTION_COLUMNS}
                    FROM transactions
                    WHERE user_id = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#
                ))
                .bind(user_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(transactions)
    }

    async fn count_transactions(
        &self,
        user_id: Uuid,
        transaction_type: Option<TransactionType>,
    ) -> Result<i64, ServiceError> {
        let count = match transaction_type {
            Some(kind) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM transactions WHERE user_id = $1 AND transaction_type = $2",
                )
                .bind(user_id)
                .bind(kind)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM transactions WHERE user_id = $1")
                    .bind(user_id)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count)
    }

    async fn list_transactions(
        &self,
        status: Option<TransactionStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, ServiceError> {
        let transactions = match status {
            Some(status) => {
                sqlx::query_as::<_, Transaction>(&format!(
                    r#"
                    SELECT {TRANSACTION_COLUMNS}
                    FROM transactions
                    WHERE status = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#
                ))
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Transaction>(&format!(
                    r#"
                    SELECT {TRANSACTION_COLUMNS}
                    FROM transactions
                    ORDER BY created_at DESC
                    LIMIT $1 OFFSET $2
                    "#
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(transactions)
    }

    async fn count_all_transactions(
        &self,
        status: Option<TransactionStatus>,
    ) -> Result<i64, ServiceError> {
        let count = match status {
            Some(status) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM transactions WHERE status = $1")
                    .bind(status)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM transactions")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count)
    }
}
