use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::models::CompanyRow;
use crate::state::AppState;
use crate::store::companies;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCompanyRequest {
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub max_domain: Option<i64>,
    pub max_mail_account: Option<i64>,
    pub max_mail_quota: Option<i64>,
}

/// POST /company (superadmin only)
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddCompanyRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (name, address, max_domain, max_account, mailbox_quota) = match (
        body.company_name,
        body.company_address,
        body.max_domain,
        body.max_mail_account,
        body.max_mail_quota,
    ) {
        (Some(n), Some(a), Some(d), Some(m), Some(q)) if !n.is_empty() && !a.is_empty() => {
            (n, a, d, m, q)
        }
        _ => return Err(ApiError::bad_request("All fields are required")),
    };

    companies::insert_company(&state.pool, &name, &address, max_domain, max_account, mailbox_quota)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "message": "Company added successfully" }))))
}

/// DELETE /company/:company_id (superadmin only)
pub async fn remove(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let deleted = companies::delete_company(&state.pool, company_id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found("Company not found"));
    }
    Ok(Json(json!({ "message": "Company deleted successfully" })))
}

/// GET /company (superadmin only)
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CompanyRow>>, ApiError> {
    Ok(Json(companies::list_companies(&state.pool).await?))
}
