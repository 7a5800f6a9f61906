use std::future::Future;
use std::pin::Pin;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::authz::{Caller, Role};
use crate::error::ApiError;
use crate::middleware::AuthToken;
use crate::state::AppState;
use crate::store::admins;

/// Load the caller's admin record and attach it as a typed [`Caller`].
/// An authenticated-but-deleted admin fails here with 404, treated the
/// same as unauthenticated downstream.
pub async fn attach_caller(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .extensions()
        .get::<AuthToken>()
        .cloned()
        .ok_or_else(|| ApiError::forbidden("Unauthorized"))?;

    let identity = admins::identity_by_username(&state.pool, &token.username)
        .await?
        .ok_or_else(|| ApiError::not_found("Logged-in admin not found"))?;

    // The stored role is authoritative over the token's claim
    let role: Role = identity
        .role
        .parse()
        .map_err(|e| {
            tracing::error!("corrupt role for admin {}: {}", token.username, e);
            ApiError::internal("Internal Server Error")
        })?;

    request.extensions_mut().insert(Caller {
        id: identity.id,
        username: token.username,
        role,
        company_id: identity.company_id,
    });

    Ok(next.run(request).await)
}

/// Route-level role gate. Runs after [`attach_caller`], so it judges the
/// stored role rather than whatever the token claims.
pub fn require_roles(
    allowed: &'static [Role],
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Result<Response, ApiError>> + Send>>
       + Clone
       + Send
       + 'static {
    move |request: Request, next: Next| {
        Box::pin(async move {
            let caller = request
                .extensions()
                .get::<Caller>()
                .ok_or_else(|| ApiError::forbidden("Unauthorized"))?;

            if !allowed.contains(&caller.role) {
                let names = allowed.iter().map(Role::as_str).collect::<Vec<_>>().join(", ");
                return Err(ApiError::forbidden(format!("Unauthorized - Only {} allowed", names)));
            }

            Ok(next.run(request).await)
        })
    }
}
