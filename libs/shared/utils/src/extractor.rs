use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
    body::Body,
};
use tracing::debug;

use shared_models::error::AppError;
use shared_config::AppConfig;

use crate::jwt::validate_token;

pub const NOT_AUTHORIZED: &str = "Not Authorized Login Again";

/// The admin panel sends its token in `atoken`; a bearer header is accepted too.
fn extract_admin_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get("atoken").and_then(|v| v.to_str().ok()) {
        return Some(value.to_string());
    }

    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

// Middleware gating every admin route except login
pub async fn admin_auth_middleware(
    State(config): State<Arc<AppConfig>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_admin_token(request.headers())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Auth(NOT_AUTHORIZED.to_string()))?;

    let payload = validate_token(&token, &config.jwt_secret).map_err(|e| {
        debug!("Admin token rejected: {}", e);
        AppError::Auth(NOT_AUTHORIZED.to_string())
    })?;

    if payload != config.admin_token_payload() {
        debug!("Admin token payload does not match configured credentials");
        return Err(AppError::Auth(NOT_AUTHORIZED.to_string()));
    }

    Ok(next.run(request).await)
}
