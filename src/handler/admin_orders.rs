use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::orderdb::OrderExt,
    dtos::{
        orderdtos::{AdminOrderUpdateDto, OrderHistoryQueryDto, OrderResponseDto},
        ApiResponse, PaginationMetadata,
    },
    error::HttpError,
    middleware::AuthUser,
    AppState,
};

pub fn admin_orders_handler() -> Router {
    Router::new()
        .route("/", get(list_orders))
        .route("/:order_id", patch(update_order))
}

pub async fn list_orders(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<OrderHistoryQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let limit = query.limit.unwrap_or(10) as i64;
    let page = query.page.unwrap_or(1) as i64;
    let offset = (page - 1) * limit;

    let orders = app_state
        .db_client
        .list_orders(query.status, limit, offset)
        .await
        .map_err(HttpError::from)?;

    let total = app_state
        .db_client
        .count_orders(query.status)
        .await
        .map_err(HttpError::from)?;

    let response = serde_json::json!({
        "orders": orders,
        "pagination": PaginationMetadata::new(total, page, limit),
    });

    Ok(Json(ApiResponse::ok(response)))
}

pub async fn update_order(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(order_id): Path<Uuid>,
    Json(body): Json<AdminOrderUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let refunded = body.refund_amount;

    let order = app_state
        .db_client
        .admin_update_order(order_id, body.into())
        .await
        .map_err(HttpError::from)?;

    if let Some(amount) = refunded {
        tracing::info!(
            "order refunded: admin={} order={} amount={}",
            auth.user.id,
            order.id,
            amount
        );
    }

    let response: OrderResponseDto = order.into();
    Ok(Json(ApiResponse::success("Order updated", response)))
}
