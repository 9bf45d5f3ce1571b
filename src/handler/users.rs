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
    db::{userdb::UserExt, walletdb::WalletExt},
    dtos::{
        userdtos::*,
        walletdtos::{TransactionResponseDto, UserWalletAdjustDto},
        ApiResponse, PaginationMetadata, RequestQueryDto,
    },
    error::HttpError,
    middleware::AuthUser,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new().route("/me", get(get_me))
}

pub fn admin_users_handler() -> Router {
    Router::new()
        .route("/", get(get_users))
        .route("/:user_id", get(get_user))
        .route("/:user_id/wallet", post(adjust_user_wallet))
}

pub async fn get_me(
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(ApiResponse::ok(UserData {
        user: FilterUserDto::filter_user(&auth.user),
    })))
}

pub async fn get_users(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (limit, offset) = query.limit_offset();
    let page = query.page.unwrap_or(1) as i64;

    let users = app_state
        .db_client
        .get_users(limit, offset)
        .await
        .map_err(HttpError::from)?;

    let total = app_state
        .db_client
        .count_users()
        .await
        .map_err(HttpError::from)?;

    let response = UserListData {
        users: users.iter().map(FilterUserDto::filter_user).collect(),
        pagination: PaginationMetadata::new(total, page, limit),
    };

    Ok(Json(ApiResponse::ok(response)))
}

pub async fn get_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .get_user(Some(user_id), None, None)
        .await
        .map_err(HttpError::from)?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    let wallet = app_state
        .db_client
        .get_wallet(user.id)
        .await
        .map_err(HttpError::from)?;

    let response = AdminUserDetailDto {
        user: FilterUserDto::filter_user(&user),
        wallet: wallet.map(Into::into),
    };

    Ok(Json(ApiResponse::ok(response)))
}

pub async fn adjust_user_wallet(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UserWalletAdjustDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let transaction = app_state
        .db_client
        .adjust_balance(user_id, body.amount, body.direction, body.description)
        .await
        .map_err(HttpError::from)?;

    tracing::info!(
        "wallet adjusted: admin={} user={} amount={}",
        auth.user.id,
        user_id,
        transaction.amount
    );

    let response: TransactionResponseDto = transaction.into();
    Ok(Json(ApiResponse::success("Wallet adjusted", response)))
}
