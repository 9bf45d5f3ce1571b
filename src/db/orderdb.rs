use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::catalogmodels::ServiceServer;
use crate::models::ordermodels::{Order, OrderStatus, OrderWithUser};
use crate::models::walletmodels::{
    generate_transaction_reference, TransactionStatus, TransactionType,
};
use crate::service::error::ServiceError;
use crate::utils::pricing::{order_total, quantity_in_bounds, running_balances};

#[derive(Debug, Clone, Deserialize)]
pub struct BulkOrderLine {
    pub server_id: Uuid,
    pub link: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct BulkLineError {
    pub index: usize,
    pub error: String,
}

/// Result of a bulk placement: invalid lines are collected as per-line
/// errors while the remaining lines proceed; the caller must inspect which
/// lines succeeded.
#[derive(Debug, Serialize)]
pub struct BulkOrderOutcome {
    pub orders: Vec<Order>,
    pub errors: Vec<BulkLineError>,
    pub total_charged: i64,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct AdminOrderUpdate {
    pub status: Option<OrderStatus>,
    pub refund_amount: Option<i64>,
    pub start_count: Option<i32>,
    pub remain_quantity: Option<i32>,
}

const ORDER_COLUMNS: &str = r#"
    id, user_id, service_id, server_id, link, quantity, total_price,
    status, start_count, remain_quantity, note, created_at, updated_at
"#;

#[async_trait]
pub trait OrderExt {
    /// Places one order: validates the tier and quantity bounds, prices the
    /// order at the tier's current rate, debits the wallet, appends the
    /// ledger row and inserts the order, all in one atomic unit.
    async fn place_order(
        &self,
        user_id: Uuid,
        service_id: Uuid,
        server_id: Uuid,
        link: String,
        quantity: i32,
        note: Option<String>,
    ) -> Result<Order, ServiceError>;

    /// Places many orders at once. Lines are validated and priced
    /// individually (collecting per-line errors); the wallet is then
    /// checked against the sum of the valid lines and debited once. Each
    /// line's ledger row records the running balance after that specific
    /// line.
    async fn place_bulk_orders(
        &self,
        user_id: Uuid,
        lines: Vec<BulkOrderLine>,
    ) -> Result<BulkOrderOutcome, ServiceError>;

    async fn get_order(&self, order_id: Uuid) -> Result<Option<Order>, ServiceError>;

    async fn get_user_orders(
        &self,
        user_id: Uuid,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, ServiceError>;

    async fn count_user_orders(
        &self,
        user_id: Uuid,
        status: Option<OrderStatus>,
    ) -> Result<i64, ServiceError>;

    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderWithUser>, ServiceError>;

    async fn count_orders(&self, status: Option<OrderStatus>) -> Result<i64, ServiceError>;

    /// Admin update: may force any status transition and update progress
    /// counters. When `refund_amount` is present the user's wallet is
    /// credited in the same unit and the status defaults to `refunded`
    /// unless an explicit status was chosen. The refund amount is an admin
    /// override, deliberately not derived from the order's total price.
    async fn admin_update_order(
        &self,
        order_id: Uuid,
        update: AdminOrderUpdate,
    ) -> Result<Order, ServiceError>;
}

#[async_trait]
impl OrderExt for DBClient {
    async fn place_order(
        &self,
        user_id: Uuid,
        service_id: Uuid,
        server_id: Uuid,
        link: String,
        quantity: i32,
        note: Option<String>,
    ) -> Result<Order, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let server = sqlx::query_as::<_, ServiceServer>(
            r#"
            SELECT id, service_id, name, rate, min_quantity, max_quantity,
                   speed, quality, is_active, created_at, updated_at
            FROM service_servers
            WHERE id = $1 AND service_id = $2 AND is_active = true
            "#,
        )
        .bind(server_id)
        .bind(service_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::NotFound("Service server"))?;

        if !quantity_in_bounds(quantity, server.min_quantity, server.max_quantity) {
            return Err(ServiceError::QuantityOutOfRange {
                min: server.min_quantity,
                max: server.max_quantity,
                got: quantity,
            });
        }

        let total_price = order_total(server.rate, quantity);

        let wallet = sqlx::query("SELECT id, balance FROM wallets WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ServiceError::NotFound("Wallet"))?;

        let balance = wallet.get::<i64, _>("balance");
        if balance < total_price {
            return Err(ServiceError::InsufficientBalance {
                required: total_price,
                available: balance,
            });
        }
        let balance_after = balance - total_price;

        sqlx::query(
            r#"
            UPDATE wallets
            SET balance = $2, total_spent = total_spent + $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(wallet.get::<Uuid, _>("id"))
        .bind(balance_after)
        .bind(total_price)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO transactions
            (wallet_id, user_id, transaction_type, amount, balance_after, status, reference, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(wallet.get::<Uuid, _>("id"))
        .bind(user_id)
        .bind(TransactionType::Order)
        .bind(-total_price)
        .bind(balance_after)
        .bind(TransactionStatus::Completed)
        .bind(generate_transaction_reference())
        .bind(format!("{} x{}", server.name, quantity))
        .execute(&mut *tx)
        .await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders
            (user_id, service_id, server_id, link, quantity, total_price, status, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(service_id)
        .bind(server.id)
        .bind(link)
        .bind(quantity)
        .bind(total_price)
        .bind(OrderStatus::Pending)
        .bind(note)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(order)
    }

    async fn place_bulk_orders(
        &self,
        user_id: Uuid,
        lines: Vec<BulkOrderLine>,
    ) -> Result<BulkOrderOutcome, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let mut valid: Vec<(BulkOrderLine, ServiceServer, i64)> = Vec::new();
        let mut errors: Vec<BulkLineError> = Vec::new();

        for (index, line) in lines.into_iter().enumerate() {
            let server = sqlx::query_as::<_, ServiceServer>(
                r#"
                SELECT id, service_id, name, rate, min_quantity, max_quantity,
                       speed, quality, is_active, created_at, updated_at
                FROM service_servers
                WHERE id = $1 AND is_active = true
                "#,
            )
            .bind(line.server_id)
            .fetch_optional(&mut *tx)
            .await?;

            let server = match server {
                Some(server) => server,
                None => {
                    errors.push(BulkLineError {
                        index,
                        error: ServiceError::NotFound("Service server").to_string(),
                    });
                    continue;
                }
            };

            if !quantity_in_bounds(line.quantity, server.min_quantity, server.max_quantity) {
                errors.push(BulkLineError {
                    index,
                    error: ServiceError::QuantityOutOfRange {
                        min: server.min_quantity,
                        max: server.max_quantity,
                        got: line.quantity,
                    }
                    .to_string(),
                });
                continue;
            }

            let total = order_total(server.rate, line.quantity);
            valid.push((line, server, total));
        }

        if valid.is_empty() {
            return Ok(BulkOrderOutcome {
                orders: Vec::new(),
                errors,
                total_charged: 0,
            });
        }

        let wallet = sqlx::query("SELECT id, balance FROM wallets WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ServiceError::NotFound("Wallet"))?;

        let wallet_id = wallet.get::<Uuid, _>("id");
        let balance = wallet.get::<i64, _>("balance");
        let total_charged: i64 = valid.iter().map(|(_, _, total)| total).sum();

        if balance < total_charged {
            return Err(ServiceError::InsufficientBalance {
                required: total_charged,
                available: balance,
            });
        }

        // The wallet is debited once for the sum, but each line's ledger row
        // records the balance after that specific line so the history still
        // reconciles row by row.
        let totals: Vec<i64> = valid.iter().map(|(_, _, total)| *total).collect();
        let snapshots = running_balances(balance, &totals);
        let mut orders = Vec::with_capacity(valid.len());

        for ((line, server, total), balance_after) in valid.iter().zip(snapshots) {
            sqlx::query(
                r#"
                INSERT INTO transactions
                (wallet_id, user_id, transaction_type, amount, balance_after, status, reference, description)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(wallet_id)
            .bind(user_id)
            .bind(TransactionType::Order)
            .bind(-total)
            .bind(balance_after)
            .bind(TransactionStatus::Completed)
            .bind(generate_transaction_reference())
            .bind(format!("{} x{}", server.name, line.quantity))
            .execute(&mut *tx)
            .await?;

            let order = sqlx::query_as::<_, Order>(&format!(
                r#"
                INSERT INTO orders
                (user_id, service_id, server_id, link, quantity, total_price, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING {ORDER_COLUMNS}
                "#
            ))
            .bind(user_id)
            .bind(server.service_id)
            .bind(server.id)
            .bind(&line.link)
            .bind(line.quantity)
            .bind(total)
            .bind(OrderStatus::Pending)
            .fetch_one(&mut *tx)
            .await?;

            orders.push(order);
        }

        sqlx::query(
            r#"
            UPDATE wallets
            SET balance = $2, total_spent = total_spent + $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(wallet_id)
        .bind(balance - total_charged)
        .bind(total_charged)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(BulkOrderOutcome {
            orders,
            errors,
            total_charged,
        })
    }

    async fn get_order(&self, order_id: Uuid) -> Result<Option<Order>, ServiceError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    async fn get_user_orders(
        &self,
        user_id: Uuid,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, ServiceError> {
        let orders = match status {
            Some(status) => {
                sqlx::query_as::<_, Order>(&format!(
                    r#"
                    SELECT {ORDER_COLUMNS}
                    FROM orders
                    WHERE user_id = $1 AND status = $2
                    ORDER BY created_at DESC
                    LIMIT $3 OFFSET $4
                    "#
                ))
                .bind(user_id)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Order>(&format!(
                    r#"
                    SELECT {ORDER_COLUMNS}
                    FROM orders
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

        Ok(orders)
    }

    async fn count_user_orders(
        &self,
        user_id: Uuid,
        status: Option<OrderStatus>,
    ) -> Result<i64, ServiceError> {
        let count = match status {
            Some(status) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM orders WHERE user_id = $1 AND status = $2",
                )
                .bind(user_id)
                .bind(status)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE user_id = $1")
                    .bind(user_id)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count)
    }

    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderWithUser>, ServiceError> {
        let orders = match status {
            Some(status) => {
                sqlx::query_as::<_, OrderWithUser>(
                    r#"
                    SELECT o.id, o.user_id, o.service_id, o.server_id, o.link, o.quantity,
                           o.total_price, o.status, o.start_count, o.remain_quantity, o.note,
                           o.created_at, o.updated_at,
                           u.username, u.email AS user_email
                    FROM orders o
                    JOIN users u ON u.id = o.user_id
                    WHERE o.status = $1
                    ORDER BY o.created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, OrderWithUser>(
                    r#"
                    SELECT o.id, o.user_id, o.service_id, o.server_id, o.link, o.quantity,
                           o.total_price, o.status, o.start_count, o.remain_quantity, o.note,
                           o.created_at, o.updated_at,
                           u.username, u.email AS user_email
                    FROM orders o
                    JOIN users u ON u.id = o.user_id
                    ORDER BY o.created_at DESC
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(orders)
    }

    async fn count_orders(&self, status: Option<OrderStatus>) -> Result<i64, ServiceError> {
        let count = match status {
            Some(status) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE status = $1")
                    .bind(status)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count)
    }

    async fn admin_update_order(
        &self,
        order_id: Uuid,
        update: AdminOrderUpdate,
    ) -> Result<Order, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
        ))
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ServiceError::NotFound("Order"))?;

        let mut status = update.status;

        if let Some(refund_amount) = update.refund_amount {
            if refund_amount <= 0 {
                return Err(ServiceError::Validation(
                    "Refund amount must be positive".to_string(),
                ));
            }

            let wallet =
                sqlx::query("SELECT id, balance FROM wallets WHERE user_id = $1 FOR UPDATE")
                    .bind(order.user_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or(ServiceError::NotFound("Wallet"))?;

            let balance_after = wallet.get::<i64, _>("balance") + refund_amount;

            sqlx::query(
                r#"
                UPDATE wallets
                SET balance = $2, total_spent = total_spent - $3, updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(wallet.get::<Uuid, _>("id"))
            .bind(balance_after)
            .bind(refund_amount)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO transactions
                (wallet_id, user_id, transaction_type, amount, balance_after, status, reference, description)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(wallet.get::<Uuid, _>("id"))
            .bind(order.user_id)
            .bind(TransactionType::Refund)
            .bind(refund_amount)
            .bind(balance_after)
            .bind(TransactionStatus::Completed)
            .bind(generate_transaction_reference())
            .bind(format!("Refund for order {}", order.id))
            .execute(&mut *tx)
            .await?;

            if status.is_none() {
                status = Some(OrderStatus::Refunded);
            }
        }

        let updated = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET status = COALESCE($2, status),
                start_count = COALESCE($3, start_count),
                remain_quantity = COALESCE($4, remain_quantity),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order.id)
        .bind(status)
        .bind(update.start_count)
        .bind(update.remain_quantity)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }
}
