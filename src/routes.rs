use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        admin_finance::admin_finance_handler,
        admin_orders::admin_orders_handler,
        auth::auth_handler,
        catalog::{admin_catalog_handler, catalog_handler},
        lucky_wheel::{admin_wheel_handler, lucky_wheel_handler},
        orders::orders_handler,
        support::{admin_support_handler, support_handler},
        users::{admin_users_handler, users_handler},
        wallet::wallet_handler,
    },
    middleware::{auth, role_check},
    models::usermodel::UserRole,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let admin_routes = Router::new()
        .nest("/finance", admin_finance_handler())
        .nest("/orders", admin_orders_handler())
        .nest("/users", admin_users_handler())
        .nest("/support", admin_support_handler())
        .nest("/lucky-wheel", admin_wheel_handler())
        .merge(admin_catalog_handler())
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }));

    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/services", catalog_handler())
        .nest("/users", users_handler().layer(middleware::from_fn(auth)))
        .nest("/wallet", wallet_handler().layer(middleware::from_fn(auth)))
        .nest("/orders", orders_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/lucky-wheel",
            lucky_wheel_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/support",
            support_handler().layer(middleware::from_fn(auth)),
        )
        .nest("/admin", admin_routes.layer(middleware::from_fn(auth)))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
