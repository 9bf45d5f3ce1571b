use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::orderdb::{AdminOrderUpdate, BulkOrderLine};
use crate::models::ordermodels::{Order, OrderStatus};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateOrderDto {
    pub service_id: Uuid,
    pub server_id: Uuid,

    #[validate(url(message = "Link must be a valid URL"))]
    pub link: String,

    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: i32,

    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct BulkOrderLineDto {
    pub server_id: Uuid,

    #[validate(url(message = "Link must be a valid URL"))]
    pub link: String,

    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct BulkOrderDto {
    #[validate(length(min = 1, max = 100, message = "Batch must contain 1-100 orders"))]
    pub orders: Vec<BulkOrderLineDto>,
}

impl From<BulkOrderLineDto> for BulkOrderLine {
    fn from(line: BulkOrderLineDto) -> Self {
        BulkOrderLine {
            server_id: line.server_id,
            link: line.link,
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct OrderHistoryQueryDto {
    pub status: Option<OrderStatus>,

    #[validate(range(min = 1))]
    pub page: Option<usize>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResponseDto {
    pub id: Uuid,
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
}

impl From<Order> for OrderResponseDto {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            service_id: order.service_id,
            server_id: order.server_id,
            link: order.link,
            quantity: order.quantity,
            total_price: order.total_price,
            status: order.status,
            start_count: order.start_count,
            remain_quantity: order.remain_quantity,
            note: order.note,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderListData {
    pub orders: Vec<OrderResponseDto>,
    pub pagination: super::PaginationMetadata,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AdminOrderUpdateDto {
    pub status: Option<OrderStatus>,

    #[validate(range(min = 1, message = "Refund amount must be positive"))]
    pub refund_amount: Option<i64>,

    #[validate(range(min = 0))]
    pub start_count: Option<i32>,

    #[validate(range(min = 0))]
    pub remain_quantity: Option<i32>,
}

impl From<AdminOrderUpdateDto> for AdminOrderUpdate {
    fn from(dto: AdminOrderUpdateDto) -> Self {
        AdminOrderUpdate {
            status: dto.status,
            refund_amount: dto.refund_amount,
            start_count: dto.start_count,
            remain_quantity: dto.remain_quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_a_non_url_link() {
        let dto = CreateOrderDto {
            service_id: Uuid::new_v4(),
            server_id: Uuid::new_v4(),
            link: "not a link".to_string(),
            quantity: 100,
            note: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn rejects_a_zero_quantity() {
        let dto = CreateOrderDto {
            service_id: Uuid::new_v4(),
            server_id: Uuid::new_v4(),
            link: "https://example.com/p/abc".to_string(),
            quantity: 0,
            note: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn rejects_an_empty_batch() {
        let dto = BulkOrderDto { orders: vec![] };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn accepts_a_valid_order() {
        let dto = CreateOrderDto {
            service_id: Uuid::new_v4(),
            server_id: Uuid::new_v4(),
            link: "https://example.com/p/abc".to_string(),
            quantity: 100,
            note: Some("fast please".to_string()),
        };
        assert!(dto.validate().is_ok());
    }
}
