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
    db::walletdb::WalletExt,
    dtos::{
        walletdtos::{AdjustBalanceDto, FinanceQueryDto, TransactionResponseDto},
        ApiResponse, PaginationMetadata,
    },
    error::HttpError,
    middleware::AuthUser,
    AppState,
};

pub fn admin_finance_handler() -> Router {
    Router::new()
        .route("/", get(list_transactions))
        .route("/:transaction_id/approve", post(approve_deposit))
        .route("/:transaction_id/reject", post(reject_deposit))
        .route("/adjust", post(adjust_balance))
}

pub async fn list_transactions(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<FinanceQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let limit = query.limit.unwrap_or(10) as i64;
    let page = query.page.unwrap_or(1) as i64;
    let offset = (page - 1) * limit;

    let transactions = app_state
        .db_client
        .list_transactions(query.status, limit, offset)
        .await
        .map_err(HttpError::from)?;

    let total = app_state
        .db_client
        .count_all_transactions(query.status)
        .await
        .map_err(HttpError::from)?;

    let response = serde_json::json!({
        "transactions": transactions
            .into_iter()
            .map(TransactionResponseDto::from)
            .collect::<Vec<_>>(),
        "pagination": PaginationMetadata::new(total, page, limit),
    });

    Ok(Json(ApiResponse::ok(response)))
}

pub async fn approve_deposit(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(transaction_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let transaction = app_state
        .db_client
        .approve_deposit(transaction_id)
        .await
        .map_err(HttpError::from)?;

    tracing::info!(
        "deposit approved: admin={} transaction={} amount={}",
        auth.user.id,
        transaction.id,
        transaction.amount
    );

    let response: TransactionResponseDto = transaction.into();
    Ok(Json(ApiResponse::success("Deposit approved", response)))
}

pub async fn reject_deposit(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(transaction_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let transaction = app_state
        .db_client
        .reject_deposit(transaction_id)
        .await
        .map_err(HttpError::from)?;

    tracing::info!(
        "deposit rejected: admin={} transaction={}",
        auth.user.id,
        transaction.id
    );

    let response: TransactionResponseDto = transaction.into();
    Ok(Json(ApiResponse::success("Deposit rejected", response)))
}

pub async fn adjust_balance(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<AdjustBalanceDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let transaction = app_state
        .db_client
        .adjust_balance(body.user_id, body.amount, body.direction, body.note)
        .await
        .map_err(HttpError::from)?;

    tracing::info!(
        "balance adjusted: admin={} user={} amount={}",
        auth.user.id,
        body.user_id,
        transaction.amount
    );

    let response: TransactionResponseDto = transaction.into();
    Ok(Json(ApiResponse::success("Balance adjusted", response)))
}
