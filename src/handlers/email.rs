use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::password::{hash_password, MIN_PASSWORD_LEN};
use crate::authz::{self, Caller};
use crate::error::ApiError;
use crate::models::MailListRow;
use crate::state::AppState;
use crate::store::{domains, mails};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEmailRequest {
    pub local_part: Option<String>,
    pub domain_id: Option<i64>,
    pub password: Option<String>,
}

/// POST /email
pub async fn add(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<AddEmailRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (local_part, domain_id, password) = match (body.local_part, body.domain_id, body.password)
    {
        (Some(l), Some(d), Some(p)) if !l.is_empty() && !p.is_empty() => (l, d, p),
        _ => return Err(ApiError::bad_request("localPart, domainId, and password are required")),
    };

    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request("Password must be at least 8 characters long"));
    }

    let domain = domains::domain_ref(&state.pool, domain_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Domain not found"))?;

    authz::check_mail_domain_ownership(&caller, domain.company_id)?;

    let address = format!("{}@{}", local_part, domain.name);
    if mails::address_exists(&state.pool, &address).await? {
        return Err(ApiError::conflict("Email address already exists"));
    }

    let hash = hash_password(&password).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        ApiError::internal("Error adding email account")
    })?;

    match mails::insert_mail_checked(
        &state.pool,
        &address,
        &hash,
        caller.id,
        domain_id,
        domain.company_id,
    )
    .await?
    {
        Some(_) => {
            tracing::info!(mail = %address, "email account added");
            Ok((
                StatusCode::CREATED,
                Json(json!({ "message": "Email account added successfully" })),
            ))
        }
        None => {
            Err(ApiError::bad_request("Maximum number of email accounts reached for the company"))
        }
    }
}

/// DELETE /email/:email_id
pub async fn remove(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(email_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let scope = authz::read_scope(&caller)?;
    if !mails::account_in_scope(&state.pool, email_id, scope).await? {
        return Err(ApiError::forbidden(
            "Email not found or you do not have permission to delete it",
        ));
    }

    let deleted = mails::delete_mail(&state.pool, email_id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found("Email not found"));
    }
    Ok(Json(json!({ "message": "Email deleted successfully" })))
}

/// GET /email — scoped listing.
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<MailListRow>>, ApiError> {
    let scope = authz::read_scope(&caller)?;
    Ok(Json(mails::list_mails(&state.pool, scope).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub new_password: Option<String>,
}

/// PUT /password/:email_id — reset a mailbox password.
pub async fn reset_password(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(email_id): Path<i64>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    let new_password = match body.new_password {
        Some(p) if p.len() >= MIN_PASSWORD_LEN => p,
        _ => {
            return Err(ApiError::bad_request(
                "The new password must be at least 8 characters long",
            ))
        }
    };

    let scope = authz::read_scope(&caller)?;
    if !mails::account_in_scope(&state.pool, email_id, scope).await? {
        return Err(ApiError::forbidden(
            "You can only reset passwords for email accounts that belong to your company's domains",
        ));
    }

    let hash = hash_password(&new_password).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        ApiError::internal("Error resetting password")
    })?;

    let updated = mails::update_password(&state.pool, email_id, &hash).await?;
    if updated == 0 {
        return Err(ApiError::not_found("Email account not found"));
    }
    Ok(Json(json!({ "message": "Password reset successfully" })))
}

/// PUT /email-status/:email_id — toggle active⇄suspend.
pub async fn change_status(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(email_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let scope = authz::read_scope(&caller)?;
    if !mails::account_in_scope(&state.pool, email_id, scope).await? {
        return Err(ApiError::forbidden(
            "You can only change the status of emails that belong to your company's domains",
        ));
    }

    match mails::toggle_status(&state.pool, email_id).await? {
        Some(status) => {
            Ok(Json(json!({ "message": format!("Email status changed to {} successfully", status) })))
        }
        None => Err(ApiError::not_found("Email account not found")),
    }
}
