use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::authz::{Caller, Role};
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{companies, dashboard};

fn bytes_to_gb(bytes: i64) -> String {
    format!("{} GB", bytes / (1024 * 1024 * 1024))
}

/// GET /dashboard — per-company overview. Guests see only the counts;
/// the mail-log panels require admin or superadmin.
pub async fn overview(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Value>, ApiError> {
    let company_id =
        caller.company_id.ok_or_else(|| ApiError::bad_request("Company ID is required"))?;

    let domain_count = dashboard::domain_count(&state.pool, company_id).await?;
    let email_count = dashboard::mail_count(&state.pool, company_id).await?;
    let mailbox_quota = bytes_to_gb(dashboard::sample_mailbox_quota(&state.pool, company_id).await?);
    let limits = companies::company_limits(&state.pool, company_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Company not found"))?;

    let recent_emails = if caller.role != Role::Guest {
        dashboard::recent_accounts(&state.pool, company_id).await?
    } else {
        Vec::new()
    };

    let sees_logs = matches!(caller.role, Role::Superadmin | Role::Admin);
    let email_sent =
        if sees_logs { Some(dashboard::sent_count(&state.pool, company_id).await?) } else { None };
    let recent_sent = if sees_logs {
        dashboard::recent_sent(&state.pool, company_id).await?
    } else {
        Vec::new()
    };
    let recent_inbox = if sees_logs {
        dashboard::recent_inbox(&state.pool, company_id).await?
    } else {
        Vec::new()
    };

    Ok(Json(json!({
        "data": {
            "domainCount": domain_count,
            "emailCount": email_count,
            "mailboxQuota": mailbox_quota,
            "recentEmails": recent_emails,
            "emailSent": email_sent,
            "companyLimits": {
                "maxDomain": limits.max_domain,
                "maxAccount": limits.max_account,
            },
            "emailRecentSent": recent_sent,
            "emailRecentInbox": recent_inbox,
        }
    })))
}
