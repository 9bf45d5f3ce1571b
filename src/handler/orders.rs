use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::orderdb::OrderExt,
    dtos::{orderdtos::*, ApiResponse, PaginationMetadata},
    error::HttpError,
    middleware::AuthUser,
    models::usermodel::UserRole,
    AppState,
};

pub fn orders_handler() -> Router {
    Router::new()
        .route("/", post(create_order).get(get_orders))
        .route("/bulk", post(create_bulk_orders))
        .route("/:order_id", get(get_order))
}

pub async fn create_order(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateOrderDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let order = app_state
        .db_client
        .place_order(
            auth.user.id,
            body.service_id,
            body.server_id,
            body.link,
            body.quantity,
            body.note,
        )
        .await
        .map_err(HttpError::from)?;

    tracing::info!(
        "order placed: user={} order={} total={}",
        auth.user.id,
        order.id,
        order.total_price
    );

    let response: OrderResponseDto = order.into();
    Ok(Json(ApiResponse::success("Order placed", response)))
}

pub async fn create_bulk_orders(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<BulkOrderDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;
    for line in &body.orders {
        line.validate()
            .map_err(|e| HttpError::bad_request(e.to_string()))?;
    }

    let lines = body.orders.into_iter().map(Into::into).collect();

    let outcome = app_state
        .db_client
        .place_bulk_orders(auth.user.id, lines)
        .await
        .map_err(HttpError::from)?;

    tracing::info!(
        "bulk order: user={} created={} failed={} charged={}",
        auth.user.id,
        outcome.orders.len(),
        outcome.errors.len(),
        outcome.total_charged
    );

    Ok(Json(ApiResponse::success(
        "Bulk order processed",
        outcome,
    )))
}

pub async fn get_orders(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
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
        .get_user_orders(auth.user.id, query.status, limit, offset)
        .await
        .map_err(HttpError::from)?;

    let total = app_state
        .db_client
        .count_user_orders(auth.user.id, query.status)
        .await
        .map_err(HttpError::from)?;

    let response = OrderListData {
        orders: orders.into_iter().map(Into::into).collect(),
        pagination: PaginationMetadata::new(total, page, limit),
    };

    Ok(Json(ApiResponse::ok(response)))
}

pub async fn get_order(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let order = app_state
        .db_client
        .get_order(order_id)
        .await
        .map_err(HttpError::from)?
        .ok_or_else(|| HttpError::not_found("Order not found"))?;

    if order.user_id != auth.user.id && auth.user.role != UserRole::Admin {
        return Err(HttpError::not_found("Order not found"));
    }

    let response: OrderResponseDto = order.into();
    Ok(Json(ApiResponse::ok(response)))
}
