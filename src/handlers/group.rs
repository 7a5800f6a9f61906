use axum::{extract::State, Extension, Json};

use crate::authz::{self, Caller};
use crate::error::ApiError;
use crate::models::GroupRow;
use crate::state::AppState;
use crate::store::groups;

/// GET /group — scoped, read-only.
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<GroupRow>>, ApiError> {
    let scope = authz::read_scope(&caller)?;
    let rows = groups::list_groups(&state.pool, scope).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found("No groups found for your company"));
    }
    Ok(Json(rows))
}
