use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::authz::Role;
use crate::error::ApiError;
use crate::state::AppState;

/// Verified token attached to the request before identity resolution.
/// Carries the raw token so logout can revoke it.
#[derive(Clone, Debug)]
pub struct AuthToken {
    pub username: String,
    pub role: Role,
    pub raw: String,
    pub expires_at: i64,
}

/// Token verification middleware. The revocation set is consulted before
/// the signature so a revoked token is rejected even while its signature
/// is still valid.
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(&headers)?;

    if state.revocations.is_revoked(&token).await {
        return Err(ApiError::unauthorized("Token has been revoked"));
    }

    let claims = state.tokens.verify(&token).map_err(|e| {
        tracing::debug!("token rejected: {}", e);
        ApiError::unauthorized("Invalid Token")
    })?;

    request.extensions_mut().insert(AuthToken {
        username: claims.sub,
        role: claims.role,
        raw: token,
        expires_at: claims.exp,
    });

    Ok(next.run(request).await)
}

pub fn extract_bearer(headers: &HeaderMap) -> Result<String, ApiError> {
    let header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::forbidden("A token is required for authentication"))?;

    let value = header
        .to_str()
        .map_err(|_| ApiError::forbidden("A token is required for authentication"))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        _ => Err(ApiError::forbidden("A token is required for authentication")),
    }
}
