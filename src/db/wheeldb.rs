use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::Row;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::walletmodels::{
    generate_transaction_reference, Transaction, TransactionStatus, TransactionType,
};
use crate::models::wheelmodels::*;
use crate::service::error::ServiceError;
use crate::service::wheel;

const SPIN_COLUMNS: &str = "id, user_id, prize_label, amount, source, created_at";

const CONFIG_COLUMNS: &str =
    "id, is_active, spin_cost, spins_per_day, prizes, created_at, updated_at";

const TRANSACTION_COLUMNS: &str = r#"
    id, wallet_id, user_id, transaction_type, amount, balance_after,
    status, reference, description, created_at, updated_at
"#;

#[async_trait]
pub trait LuckyWheelExt {
    async fn get_wheel_config(&self) -> Result<Option<LuckyWheelConfig>, ServiceError>;

    /// Remaining spins for one user: the daily free quota (derived from
    /// today's spin count) plus the persistent purchased balance.
    async fn get_spin_state(
        &self,
        user_id: Uuid,
        spins_per_day: i32,
    ) -> Result<SpinState, ServiceError>;

    /// Consumes one spin (free first, then purchased), draws a prize,
    /// credits the wallet and appends a bonus ledger row in one atomic unit.
    async fn spin_wheel(
        &self,
        user_id: Uuid,
    ) -> Result<(LuckyWheelSpin, Transaction), ServiceError>;

    /// Debits the spin cost and increments the purchased-spin balance in one
    /// atomic unit. Returns the new purchased balance and the ledger row.
    async fn buy_spins(
        &self,
        user_id: Uuid,
        count: i32,
    ) -> Result<(i32, Transaction), ServiceError>;

    async fn upsert_wheel_config(
        &self,
        is_active: bool,
        spin_cost: i64,
        spins_per_day: i32,
        prizes: Vec<WheelPrize>,
    ) -> Result<LuckyWheelConfig, ServiceError>;
}

async fn count_spins_today(
    conn: &mut sqlx::PgConnection,
    user_id: Uuid,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM lucky_wheel_spins
        WHERE user_id = $1 AND created_at >= date_trunc('day', NOW())
        "#,
    )
    .bind(user_id)
    .fetch_one(conn)
    .await
}

#[async_trait]
impl LuckyWheelExt for DBClient {
    async fn get_wheel_config(&self) -> Result<Option<LuckyWheelConfig>, ServiceError> {
        let config = sqlx::query_as::<_, LuckyWheelConfig>(&format!(
            r#"
            SELECT {CONFIG_COLUMNS}
            FROM lucky_wheel_configs
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(config)
    }

    async fn get_spin_state(
        &self,
        user_id: Uuid,
        spins_per_day: i32,
    ) -> Result<SpinState, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        let today = count_spins_today(&mut *conn, user_id).await?;

        let purchased = sqlx::query_scalar::<_, i32>(
            "SELECT purchased_spins FROM wheel_spin_states WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .unwrap_or(0);

        Ok(SpinState {
            free_spins_left: (spins_per_day as i64 - today).max(0) as i32,
            purchased_spins: purchased,
        })
    }

    async fn spin_wheel(
        &self,
        user_id: Uuid,
    ) -> Result<(LuckyWheelSpin, Transaction), ServiceError> {
        let mut tx = self.pool.begin().await?;

        let config = sqlx::query_as::<_, LuckyWheelConfig>(&format!(
            r#"
            SELECT {CONFIG_COLUMNS}
            FROM lucky_wheel_configs
            WHERE is_active = true
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::NotFound("Lucky wheel"))?;

        // Free quota first; fall back to the purchased balance. The state
        // row is locked so two concurrent spins cannot both consume the
        // last purchased spin.
        let today = count_spins_today(&mut *tx, user_id).await?;
        let source = if today < config.spins_per_day as i64 {
            SpinSource::Free
        } else {
            let purchased = sqlx::query_scalar::<_, i32>(
                "SELECT purchased_spins FROM wheel_spin_states WHERE user_id = $1 FOR UPDATE",
            )
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .unwrap_or(0);

            if purchased <= 0 {
                return Err(ServiceError::NoSpinsLeft);
            }

            sqlx::query(
                r#"
                UPDATE wheel_spin_states
                SET purchased_spins = purchased_spins - 1, updated_at = NOW()
                WHERE user_id = $1
                "#,
            )
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

            SpinSource::Purchased
        };

        let prize = wheel::draw_prize(&config.prizes.0, &mut rand::rng())
            .cloned()
            .ok_or_else(|| {
                ServiceError::Validation("Lucky wheel has no prizes configured".to_string())
            })?;

        let wallet = sqlx::query("SELECT id, balance FROM wallets WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ServiceError::NotFound("Wallet"))?;

        let balance_after = wallet.get::<i64, _>("balance") + prize.amount;

        sqlx::query("UPDATE wallets SET balance = $2, updated_at = NOW() WHERE id = $1")
            .bind(wallet.get::<Uuid, _>("id"))
            .bind(balance_after)
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
        .bind(TransactionType::Bonus)
        .bind(prize.amount)
        .bind(balance_after)
        .bind(TransactionStatus::Completed)
        .bind(generate_transaction_reference())
        .bind(format!("Lucky wheel prize: {}", prize.label))
        .fetch_one(&mut *tx)
        .await?;

        let spin = sqlx::query_as::<_, LuckyWheelSpin>(&format!(
            r#"
            INSERT INTO lucky_wheel_spins (user_id, prize_label, amount, source)
            VALUES ($1, $2, $3, $4)
            RETURNING {SPIN_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&prize.label)
        .bind(prize.amount)
        .bind(source)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((spin, transaction))
    }

    async fn buy_spins(
        &self,
        user_id: Uuid,
        count: i32,
    ) -> Result<(i32, Transaction), ServiceError> {
        if count <= 0 {
            return Err(ServiceError::Validation(
                "Spin count must be positive".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let config = sqlx::query_as::<_, LuckyWheelConfig>(&format!(
            r#"
            SELECT {CONFIG_COLUMNS}
            FROM lucky_wheel_configs
            WHERE is_active = true
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::NotFound("Lucky wheel"))?;

        let cost = config.spin_cost * count as i64;

        let wallet = sqlx::query("SELECT id, balance FROM wallets WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ServiceError::NotFound("Wallet"))?;

        let balance = wallet.get::<i64, _>("balance");
        if balance < cost {
            return Err(ServiceError::InsufficientBalance {
                required: cost,
                available: balance,
            });
        }
        let balance_after = balance - cost;

        sqlx::query(
            r#"
            UPDATE wallets
            SET balance = $2, total_spent = total_spent + $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(wallet.get::<Uuid, _>("id"))
        .bind(balance_after)
        .bind(cost)
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
        .bind(TransactionType::Order)
        .bind(-cost)
        .bind(balance_after)
        .bind(TransactionStatus::Completed)
        .bind(generate_transaction_reference())
        .bind(format!("Lucky wheel spins x{}", count))
        .fetch_one(&mut *tx)
        .await?;

        let purchased = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO wheel_spin_states (user_id, purchased_spins)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET purchased_spins = wheel_spin_states.purchased_spins + $2,
                          updated_at = NOW()
            RETURNING purchased_spins
            "#,
        )
        .bind(user_id)
        .bind(count)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((purchased, transaction))
    }

    async fn upsert_wheel_config(
        &self,
        is_active: bool,
        spin_cost: i64,
        spins_per_day: i32,
        prizes: Vec<WheelPrize>,
    ) -> Result<LuckyWheelConfig, ServiceError> {
        if prizes.is_empty() {
            return Err(ServiceError::Validation(
                "Lucky wheel needs at least one prize".to_string(),
            ));
        }
        if wheel::total_weight(&prizes) <= 0.0 {
            return Err(ServiceError::Validation(
                "Prize weights must sum to a positive value".to_string(),
            ));
        }
        if prizes.iter().any(|p| p.amount < 0) {
            return Err(ServiceError::Validation(
                "Prize amounts cannot be negative".to_string(),
            ));
        }

        let existing = sqlx::query_as::<_, LuckyWheelConfig>(&format!(
            r#"
            UPDATE lucky_wheel_configs
            SET is_active = $1, spin_cost = $2, spins_per_day = $3, prizes = $4,
                updated_at = NOW()
            WHERE id = (SELECT id FROM lucky_wheel_configs ORDER BY created_at DESC LIMIT 1)
            RETURNING {CONFIG_COLUMNS}
            "#
        ))
        .bind(is_active)
        .bind(spin_cost)
        .bind(spins_per_day)
        .bind(Json(&prizes))
        .fetch_optional(&self.pool)
        .await?;

        if let Some(config) = existing {
            return Ok(config);
        }

        let created = sqlx::query_as::<_, LuckyWheelConfig>(&format!(
            r#"
            INSERT INTO lucky_wheel_configs (is_active, spin_cost, spins_per_day, prizes)
            VALUES ($1, $2, $3, $4)
            RETURNING {CONFIG_COLUMNS}
            "#
        ))
        .bind(is_active)
        .bind(spin_cost)
        .bind(spins_per_day)
        .bind(Json(&prizes))
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
