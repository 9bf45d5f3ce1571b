use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A priced fulfillment tier under a service. `rate` is the price per 1000
/// units; the price written on an order is a snapshot taken at order time and
/// is never recomputed from this row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ServiceServer {
    pub id: Uuid,
    pub service_id: Uuid,
    pub name: String,
    pub rate: i64,
    pub min_quantity: i32,
    pub max_quantity: i32,
    pub speed: Option<String>,
    pub quality: Option<String>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
