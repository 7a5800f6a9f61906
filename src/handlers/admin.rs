use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::password::{hash_password, MIN_PASSWORD_LEN};
use crate::authz::{self, Caller, Role, TargetAdmin};
use crate::error::ApiError;
use crate::models::AdminListRow;
use crate::state::AppState;
use crate::store::admins::{self, AdminUpdate};

#[derive(Debug, Deserialize)]
pub struct AddAdminRequest {
    pub fullname: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "type")]
    pub admin_type: Option<String>,
    #[serde(rename = "companyId")]
    pub company_id: Option<i64>,
}

fn parse_role(value: &str) -> Result<Role, ApiError> {
    value.parse().map_err(|_| ApiError::bad_request("Invalid admin type"))
}

/// POST /admin
pub async fn add(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<AddAdminRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (fullname, username, password, admin_type) =
        match (body.fullname, body.username, body.password, body.admin_type) {
            (Some(f), Some(u), Some(p), Some(t))
                if !f.is_empty() && !u.is_empty() && !p.is_empty() && !t.is_empty() =>
            {
                (f, u, p, t)
            }
            _ => {
                return Err(ApiError::bad_request(
                    "Full name, username, password, and type are required",
                ))
            }
        };

    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request("Password must be at least 8 characters long"));
    }

    let role = parse_role(&admin_type)?;
    let company_id = authz::check_admin_create(&caller, body.company_id, role)?;

    let hash = hash_password(&password).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        ApiError::internal("Error adding account")
    })?;

    admins::insert_admin(&state.pool, &username, &hash, &fullname, role, company_id).await?;

    tracing::info!(admin = %username, role = %role, company_id, "admin account added");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Account added successfully", "admin": username })),
    ))
}

async fn resolve_target(state: &AppState, admin_id: i64) -> Result<TargetAdmin, ApiError> {
    let identity = admins::identity_by_id(&state.pool, admin_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Target admin not found"))?;

    let role = identity.role.parse().map_err(|e| {
        tracing::error!("corrupt role for admin id {}: {}", admin_id, e);
        ApiError::internal("Internal Server Error")
    })?;

    Ok(TargetAdmin { id: identity.id, role, company_id: identity.company_id })
}

/// DELETE /admin/:admin_id
pub async fn remove(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(admin_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let target = resolve_target(&state, admin_id).await?;

    authz::check_self_modification(&caller, target.id)?;
    authz::check_admin_delete(&caller, &target)?;

    let deleted = admins::delete_admin(&state.pool, admin_id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found("Account not found"));
    }
    Ok(Json(json!({ "message": "Account deleted successfully" })))
}

/// GET /admin — scoped listing.
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<AdminListRow>>, ApiError> {
    let scope = authz::read_scope(&caller)?;
    Ok(Json(admins::list_admins(&state.pool, scope).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageAdminRequest {
    pub new_type: Option<String>,
    pub new_password: Option<String>,
}

/// PUT /admin/:admin_id — partial update of role and password.
pub async fn manage(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(admin_id): Path<i64>,
    Json(body): Json<ManageAdminRequest>,
) -> Result<Json<Value>, ApiError> {
    let new_type = match body.new_type {
        Some(t) if !t.is_empty() => t,
        _ => return Err(ApiError::bad_request("Admin ID and new type are required")),
    };

    if let Some(ref password) = body.new_password {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::bad_request("Password must be at least 8 characters long"));
        }
    }

    let target = resolve_target(&state, admin_id).await?;

    authz::check_self_modification(&caller, target.id)?;

    let new_role = parse_role(&new_type)?;
    authz::check_admin_manage(&caller, &target, new_role)?;

    let password_hash = match body.new_password {
        Some(password) => Some(hash_password(&password).map_err(|e| {
            tracing::error!("password hashing failed: {}", e);
            ApiError::internal("Error updating admin")
        })?),
        None => None,
    };

    let update = AdminUpdate { role: Some(new_role), password_hash };
    let updated = admins::update_admin(&state.pool, admin_id, update).await?;
    if updated == 0 {
        return Err(ApiError::not_found("Admin not found"));
    }
    Ok(Json(json!({ "message": "Admin updated successfully" })))
}
