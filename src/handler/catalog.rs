use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::catalogdb::CatalogExt,
    dtos::{catalogdtos::*, ApiResponse},
    error::HttpError,
    AppState,
};

pub fn catalog_handler() -> Router {
    Router::new().route("/", get(list_services))
}

pub fn admin_catalog_handler() -> Router {
    Router::new()
        .route("/services", get(list_all_services).post(create_service))
        .route("/services/:service_id", patch(update_service))
        .route("/servers", post(create_server))
        .route("/servers/:server_id", patch(update_server))
}

/// Storefront catalog: active services with their active tiers.
pub async fn list_services(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let services = app_state
        .db_client
        .list_services(false)
        .await
        .map_err(HttpError::from)?;

    let servers = app_state
        .db_client
        .list_servers(None, false)
        .await
        .map_err(HttpError::from)?;

    let response: Vec<ServiceWithServersDto> = services
        .into_iter()
        .map(|service| {
            let servers = servers
                .iter()
                .filter(|server| server.service_id == service.id)
                .cloned()
                .collect();
            ServiceWithServersDto { service, servers }
        })
        .collect();

    Ok(Json(ApiResponse::ok(response)))
}

/// Back-office catalog: every service and tier, inactive rows included.
pub async fn list_all_services(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let services = app_state
        .db_client
        .list_services(true)
        .await
        .map_err(HttpError::from)?;

    let servers = app_state
        .db_client
        .list_servers(None, true)
        .await
        .map_err(HttpError::from)?;

    let response: Vec<ServiceWithServersDto> = services
        .into_iter()
        .map(|service| {
            let servers = servers
                .iter()
                .filter(|server| server.service_id == service.id)
                .cloned()
                .collect();
            ServiceWithServersDto { service, servers }
        })
        .collect();

    Ok(Json(ApiResponse::ok(response)))
}

pub async fn create_service(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateServiceDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let service = app_state
        .db_client
        .create_service(body.name, body.category, body.description)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success("Service created", service)))
}

pub async fn update_service(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(service_id): Path<Uuid>,
    Json(body): Json<UpdateServiceDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let service = app_state
        .db_client
        .update_service(service_id, body.into())
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success("Service updated", service)))
}

pub async fn create_server(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateServerDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let server = app_state
        .db_client
        .create_server(
            body.service_id,
            body.name,
            body.rate,
            body.min_quantity,
            body.max_quantity,
            body.speed,
            body.quality,
        )
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success("Server created", server)))
}

pub async fn update_server(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(server_id): Path<Uuid>,
    Json(body): Json<UpdateServerDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let server = app_state
        .db_client
        .update_server(server_id, body.into())
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ApiResponse::success("Server updated", server)))
}
