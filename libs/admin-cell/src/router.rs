use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::admin_auth_middleware;

use crate::handlers;

/// Doctor photos are posted inline with the form.
const DOCTOR_UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

pub fn admin_routes(state: Arc<AppConfig>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/login", post(handlers::admin_login));

    // Protected routes (admin token required)
    let protected_routes = Router::new()
        .route(
            "/add-doctor",
            post(handlers::add_doctor).layer(DefaultBodyLimit::max(DOCTOR_UPLOAD_LIMIT)),
        )
        .route("/all-doctors", post(handlers::all_doctors))
        .route("/change-availability", post(handlers::change_availability))
        .route("/appointments", get(handlers::appointments_admin))
        .route("/cancel-appointment", post(handlers::appointment_cancel))
        .route("/dashboard", get(handlers::admin_dashboard))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
