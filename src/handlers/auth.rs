use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::password::verify_password;
use crate::authz::Role;
use crate::config;
use crate::error::ApiError;
use crate::middleware::auth::extract_bearer;
use crate::state::AppState;
use crate::store::admins;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let (username, password) = match (body.username, body.password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => return Err(ApiError::bad_request("Username and password are required")),
    };

    let admin = admins::find_by_username(&state.pool, &username)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    if !verify_password(&password, &admin.password_hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let role: Role = admin.role.parse().map_err(|e| {
        tracing::error!("corrupt role for admin {}: {}", username, e);
        ApiError::internal("Internal Server Error")
    })?;

    let token = state.tokens.issue(&username, role).map_err(|e| {
        tracing::error!("token generation failed: {}", e);
        ApiError::internal("Internal Server Error")
    })?;

    tracing::info!(admin = %username, "login successful");
    Ok(Json(json!({ "token": token, "message": "Login successful" })))
}

/// POST /logout — revokes the presented token. Idempotent; a second
/// logout with the same token succeeds again.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let token =
        extract_bearer(&headers).map_err(|_| ApiError::bad_request("Token not provided"))?;

    // Keep the entry until the token would have expired on its own. An
    // unverifiable token still gets revoked for the maximum lifetime.
    let expires_at = match state.tokens.verify(&token) {
        Ok(claims) => claims.exp,
        Err(_) => {
            let hours = config::config().security.jwt_expiry_hours;
            (Utc::now() + Duration::hours(hours as i64)).timestamp()
        }
    };

    state.revocations.revoke(&token, expires_at).await;
    Ok((StatusCode::OK, Json(json!({ "message": "Logout successful" }))))
}
