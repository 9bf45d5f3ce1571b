use std::sync::Arc;

use axum::{
    extract::Query,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::walletdb::WalletExt,
    dtos::{
        walletdtos::*,
        ApiResponse, PaginationMetadata,
    },
    error::HttpError,
    middleware::AuthUser,
    AppState,
};

pub fn wallet_handler() -> Router {
    Router::new()
        .route("/", get(get_wallet))
        .route("/history", get(get_history))
        .route("/deposit", post(submit_deposit))
}

pub async fn get_wallet(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let wallet = app_state
        .db_client
        .get_wallet(auth.user.id)
        .await
        .map_err(HttpError::from)?
        .ok_or_else(|| HttpError::not_found("Wallet not found"))?;

    let response: WalletResponseDto = wallet.into();
    Ok(Json(ApiResponse::ok(response)))
}

pub async fn get_history(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<TransactionHistoryQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let limit = query.limit.unwrap_or(10) as i64;
    let page = query.page.unwrap_or(1) as i64;
    let offset = (page - 1) * limit;

    let transactions = app_state
        .db_client
        .get_transactions(auth.user.id, query.transaction_type, limit, offset)
        .await
        .map_err(HttpError::from)?;

    let total = app_state
        .db_client
        .count_transactions(auth.user.id, query.transaction_type)
        .await
        .map_err(HttpError::from)?;

    let response = TransactionHistoryData {
        transactions: transactions.into_iter().map(Into::into).collect(),
        pagination: PaginationMetadata::new(total, page, limit),
    };

    Ok(Json(ApiResponse::ok(response)))
}

pub async fn submit_deposit(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<DepositRequestDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let description = body
        .description
        .unwrap_or_else(|| "Balance deposit".to_string());

    let transaction = app_state
        .db_client
        .submit_deposit(auth.user.id, body.amount, description)
        .await
        .map_err(HttpError::from)?;

    tracing::info!(
        "deposit submitted: user={} amount={} reference={}",
        auth.user.id,
        transaction.amount,
        transaction.reference
    );

    let response: TransactionResponseDto = transaction.into();
    Ok(Json(ApiResponse::success(
        "Deposit submitted and awaiting approval",
        response,
    )))
}
