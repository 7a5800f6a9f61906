use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::error::ApiError;
use crate::middleware::AuthToken;
use crate::state::AppState;
use crate::store::{admins, companies};

/// GET /profile — own admin and company info.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Value>, ApiError> {
    let admin = admins::find_by_username(&state.pool, &token.username)
        .await?
        .ok_or_else(|| ApiError::not_found("Admin user not found"))?;

    let company_id = admin.company_id.ok_or_else(|| ApiError::not_found("Company not found"))?;
    let (company_name, company_address) = companies::company_profile(&state.pool, company_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Company not found"))?;

    Ok(Json(json!({
        "admin_fullname": admin.fullname,
        "admin_username": admin.username,
        "company_name": company_name,
        "company_address": company_address,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

/// PUT /password — change the caller's own password.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(token): Extension<AuthToken>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    let (current, new) = match (body.current_password, body.new_password) {
        (Some(c), Some(n)) if !c.is_empty() && !n.is_empty() => (c, n),
        _ => return Err(ApiError::bad_request("Current password and new password are required")),
    };

    if body.confirm_password.as_deref() != Some(new.as_str()) {
        return Err(ApiError::bad_request("New password does not match"));
    }

    if new.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request("Password must be at least 8 characters long"));
    }

    let admin = admins::find_by_username(&state.pool, &token.username)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    if !verify_password(&current, &admin.password_hash) {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    let hash = hash_password(&new).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        ApiError::internal("Failed to update password")
    })?;

    let updated =
        admins::update_password_by_username(&state.pool, &token.username, &hash).await?;
    if updated == 0 {
        return Err(ApiError::internal("Failed to update password"));
    }

    Ok(Json(json!({ "message": "Password successfully updated" })))
}
