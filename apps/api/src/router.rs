use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use admin_cell::router::admin_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "API Working" }))
        .nest("/api/admin", admin_routes(state))
}
