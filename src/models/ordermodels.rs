use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    InProgress,
    Completed,
    Partial,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// The normal lifecycle: pending -> processing -> in_progress -> one of
    /// the terminal states. Admin tooling may force any transition directly.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed
                | OrderStatus::Partial
                | OrderStatus::Cancelled
                | OrderStatus::Refunded
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub server_id: Uuid,
    pub link: String,
    pub quantity: i32,
    pub total_price: i64,
    pub status: OrderStatus,
    pub start_count: Option<i32>,
    pub remain_quantity: Option<i32>,
    pub note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderWithUser {
    #[sqlx(flatten)]
    pub order: Order,
    pub username: String,
    pub user_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Processing.is_terminal());
        assert!(!OrderStatus::InProgress.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Partial.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Refunded.is_terminal());
    }
}
