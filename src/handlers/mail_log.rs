use axum::{extract::State, Extension, Json};

use crate::authz::{self, Caller};
use crate::error::ApiError;
use crate::models::MailLogRow;
use crate::state::AppState;
use crate::store::mail_logs;

/// GET /email-log — scoped sent-mail log, superadmin/admin only.
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<MailLogRow>>, ApiError> {
    let scope = authz::read_scope(&caller)?;
    let rows = mail_logs::list_sent(&state.pool, scope).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found("No email logs found for your company"));
    }
    Ok(Json(rows))
}
