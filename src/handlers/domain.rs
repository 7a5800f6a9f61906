use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use rand::RngCore;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::authz::{self, Caller};
use crate::error::ApiError;
use crate::models::DomainListRow;
use crate::state::AppState;
use crate::store::{companies, domains};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDomainRequest {
    pub domain_name: Option<String>,
    pub company_id: Option<i64>,
}

fn verification_code() -> String {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut bytes);
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("mailgw-domain-verification={}", hex)
}

/// POST /domain
pub async fn add(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<AddDomainRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let name = match body.domain_name {
        Some(n) if !n.is_empty() => n,
        _ => return Err(ApiError::bad_request("Domain name is required")),
    };

    let company_id = authz::create_company(&caller, body.company_id)?;

    if companies::company_limits(&state.pool, company_id).await?.is_none() {
        return Err(ApiError::not_found("Company not found"));
    }

    let code = verification_code();
    match domains::insert_domain_checked(&state.pool, &name, company_id, &code).await? {
        Some(domain_id) => {
            tracing::info!(domain = %name, company_id, "domain added");
            Ok((
                StatusCode::CREATED,
                Json(json!({ "message": "Domain added successfully", "domainId": domain_id })),
            ))
        }
        None => Err(ApiError::bad_request("Maximum domain quota reached")),
    }
}

/// PUT /domain/:domain_id — one-way verification.
pub async fn verify(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(domain_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let domain = domains::ownership(&state.pool, domain_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Domain not found"))?;

    if domain.verified {
        return Err(ApiError::forbidden("Domain is already verified"));
    }

    authz::check_domain_mutation(&caller, domain.company_id, "verify")?;

    let updated = domains::mark_verified(&state.pool, domain_id).await?;
    if updated == 0 {
        return Err(ApiError::not_found("Domain not found"));
    }
    Ok(Json(json!({ "message": "Domain verified successfully" })))
}

/// DELETE /domain/:domain_id — only while unverified.
pub async fn remove(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(domain_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let domain = domains::ownership(&state.pool, domain_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Domain not found"))?;

    if domain.verified {
        return Err(ApiError::forbidden("Domain cannot be deleted because it is already verified"));
    }

    authz::check_domain_mutation(&caller, domain.company_id, "delete")?;

    let deleted = domains::delete_domain(&state.pool, domain_id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found("Domain not found"));
    }
    Ok(Json(json!({ "message": "Domain deleted successfully" })))
}

/// GET /domain — scoped listing, readable by every role.
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<DomainListRow>>, ApiError> {
    let scope = authz::read_scope(&caller)?;
    Ok(Json(domains::list_domains(&state.pool, scope).await?))
}
