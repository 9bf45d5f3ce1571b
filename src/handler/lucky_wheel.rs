use std::sync::Arc;

use axum::{
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::wheeldb::LuckyWheelExt,
    dtos::{wheeldtos::*, ApiResponse},
    error::HttpError,
    middleware::AuthUser,
    service::wheel,
    AppState,
};

pub fn lucky_wheel_handler() -> Router {
    Router::new()
        .route("/", get(get_wheel))
        .route("/spin", post(spin))
        .route("/buy-spins", post(buy_spins))
}

pub fn admin_wheel_handler() -> Router {
    Router::new().route("/", put(update_wheel))
}

pub async fn get_wheel(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let config = app_state
        .db_client
        .get_wheel_config()
        .await
        .map_err(HttpError::from)?
        .ok_or_else(|| HttpError::not_found("Lucky wheel is not configured"))?;

    let spins = app_state
        .db_client
        .get_spin_state(auth.user.id, config.spins_per_day)
        .await
        .map_err(HttpError::from)?;

    let response = WheelStateData {
        wheel: config.into(),
        spins,
    };

    Ok(Json(ApiResponse::ok(response)))
}

pub async fn spin(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let (spin, transaction) = app_state
        .db_client
        .spin_wheel(auth.user.id)
        .await
        .map_err(HttpError::from)?;

    tracing::info!(
        "wheel spin: user={} prize={} amount={}",
        auth.user.id,
        spin.prize_label,
        spin.amount
    );

    let response = SpinResultData {
        prize: spin.prize_label,
        amount: spin.amount,
        balance_after: transaction.balance_after,
        source: spin.source,
    };

    Ok(Json(ApiResponse::success("You won a prize!", response)))
}

pub async fn buy_spins(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<BuySpinsDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (purchased_spins, transaction) = app_state
        .db_client
        .buy_spins(auth.user.id, body.amount)
        .await
        .map_err(HttpError::from)?;

    let response = BuySpinsData {
        purchased_spins,
        balance_after: transaction.balance_after,
    };

    Ok(Json(ApiResponse::success("Spins purchased", response)))
}

pub async fn update_wheel(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<UpdateWheelConfigDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if wheel::total_weight(&body.prizes) <= 0.0 {
        return Err(HttpError::bad_request(
            "Prize weights must sum to a positive value",
        ));
    }

    let config = app_state
        .db_client
        .upsert_wheel_config(
            body.is_active,
            body.spin_cost,
            body.spins_per_day,
            body.prizes,
        )
        .await
        .map_err(HttpError::from)?;

    let response: WheelConfigDto = config.into();
    Ok(Json(ApiResponse::success("Lucky wheel updated", response)))
}
