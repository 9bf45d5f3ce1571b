use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// One slot on the wheel. `weight` is the configured probability mass; draws
/// are taken over the actual sum of weights, so a configuration that does not
/// add up to 100 stays well-defined.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WheelPrize {
    pub label: String,
    pub amount: i64,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LuckyWheelConfig {
    pub id: Uuid,
    pub is_active: bool,
    pub spin_cost: i64,
    pub spins_per_day: i32,
    pub prizes: Json<Vec<WheelPrize>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "spin_source", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SpinSource {
    Free,
    Purchased,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LuckyWheelSpin {
    pub id: Uuid,
    pub user_id: Uuid,
    pub prize_label: String,
    pub amount: i64,
    pub source: SpinSource,
    pub created_at: Option<DateTime<Utc>>,
}

/// Spin quota as seen by one user: the free quota resets by calendar day,
/// purchased spins persist until consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinState {
    pub free_spins_left: i32,
    pub purchased_spins: i32,
}
