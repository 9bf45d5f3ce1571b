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
    db::supportdb::SupportExt,
    dtos::{supportdtos::*, ApiResponse, PaginationMetadata},
    error::HttpError,
    middleware::AuthUser,
    models::{supportmodel::TicketPriority, usermodel::UserRole},
    AppState,
};

pub fn support_handler() -> Router {
    Router::new()
        .route("/", post(create_ticket).get(get_my_tickets))
        .route("/:ticket_id", get(get_ticket))
        .route("/:ticket_id/messages", post(add_message))
}

pub fn admin_support_handler() -> Router {
    Router::new()
        .route("/", get(list_tickets))
        .route("/:ticket_id/reply", post(reply_ticket))
        .route("/:ticket_id/close", post(close_ticket))
}

pub async fn create_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateTicketDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let priority = body.priority.unwrap_or(TicketPriority::Medium);

    let ticket = app_state
        .db_client
        .create_ticket(auth.user.id, body.subject, body.message, priority)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success("Ticket created", ticket)))
}

pub async fn get_my_tickets(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let tickets = app_state
        .db_client
        .get_user_tickets(auth.user.id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::ok(tickets)))
}

pub async fn get_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(ticket_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = app_state
        .db_client
        .get_ticket_with_messages(ticket_id)
        .await
        .map_err(HttpError::from)?
        .ok_or_else(|| HttpError::not_found("Ticket not found"))?;

    if ticket.ticket.user_id != auth.user.id && auth.user.role != UserRole::Admin {
        return Err(HttpError::not_found("Ticket not found"));
    }

    Ok(Json(ApiResponse::ok(ticket)))
}

pub async fn add_message(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<AddMessageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let ticket = app_state
        .db_client
        .get_ticket(ticket_id)
        .await
        .map_err(HttpError::from)?
        .ok_or_else(|| HttpError::not_found("Ticket not found"))?;

    if ticket.user_id != auth.user.id {
        return Err(HttpError::not_found("Ticket not found"));
    }

    let message = app_state
        .db_client
        .add_ticket_message(ticket_id, auth.user.id, body.message, false)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success("Message added", message)))
}

pub async fn list_tickets(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<TicketQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let limit = query.limit.unwrap_or(10) as i64;
    let page = query.page.unwrap_or(1) as i64;
    let offset = (page - 1) * limit;

    let tickets = app_state
        .db_client
        .list_tickets(query.status.clone(), limit, offset)
        .await
        .map_err(HttpError::from)?;

    let total = app_state
        .db_client
        .count_tickets(query.status)
        .await
        .map_err(HttpError::from)?;

    let response = serde_json::json!({
        "tickets": tickets,
        "pagination": PaginationMetadata::new(total, page, limit),
    });

    Ok(Json(ApiResponse::ok(response)))
}

pub async fn reply_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<AddMessageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let message = app_state
        .db_client
        .add_ticket_message(ticket_id, auth.user.id, body.message, true)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success("Reply sent", message)))
}

pub async fn close_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(ticket_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = app_state
        .db_client
        .close_ticket(ticket_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success("Ticket closed", ticket)))
}
