//! Token service: issuing, verification, and revocation of login tokens.

pub mod password;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::authz::Role;
use crate::config;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the admin username.
    pub sub: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token generation error: {0}")]
    TokenGeneration(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    InvalidSecret,
}

/// Signs and verifies identity tokens. Stateless apart from the secret;
/// revocation lives in [`RevocationStore`].
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    expiry_hours: u64,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, expiry_hours: u64) -> Self {
        Self { secret: secret.into(), expiry_hours }
    }

    pub fn from_config() -> Self {
        let security = &config::config().security;
        Self::new(security.jwt_secret.clone(), security.jwt_expiry_hours)
    }

    pub fn issue(&self, username: &str, role: Role) -> Result<String, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            role,
            exp: (now + Duration::hours(self.expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &DecodingKey::from_secret(self.secret.as_bytes()), &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

/// Set of tokens invalidated before their natural expiry. Injected so a
/// multi-instance deployment can swap in a shared store.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Idempotently revoke a token. `expires_at` is the token's own expiry
    /// timestamp; the entry is worthless once that passes.
    async fn revoke(&self, token: &str, expires_at: i64);

    async fn is_revoked(&self, token: &str) -> bool;
}

/// Process-local revocation set for single-instance deployments. Expired
/// entries are pruned on every insert so the set does not grow without
/// bound across token lifetimes.
#[derive(Default)]
pub struct InMemoryRevocationStore {
    entries: RwLock<HashMap<String, i64>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(&self, token: &str, expires_at: i64) {
        let now = Utc::now().timestamp();
        let mut entries = self.entries.write().await;
        entries.retain(|_, exp| *exp > now);
        entries.insert(token.to_string(), expires_at);
    }

    async fn is_revoked(&self, token: &str) -> bool {
        self.entries.read().await.contains_key(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", 2)
    }

    #[test]
    fn issued_token_verifies() {
        let svc = service();
        let token = svc.issue("alice", Role::Admin).unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = service().issue("alice", Role::Guest).unwrap();
        let other = TokenService::new("other-secret", 2);
        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service();
        let now = Utc::now().timestamp();
        let claims =
            Claims { sub: "alice".to_string(), role: Role::Admin, exp: now - 3600, iat: now - 7200 };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test-secret".as_bytes()),
        )
        .unwrap();
        assert!(matches!(svc.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(service().verify("not-a-token").is_err());
    }

    #[tokio::test]
    async fn revocation_is_idempotent() {
        let store = InMemoryRevocationStore::new();
        let exp = Utc::now().timestamp() + 3600;
        store.revoke("tok", exp).await;
        store.revoke("tok", exp).await;
        assert!(store.is_revoked("tok").await);
        assert!(!store.is_revoked("other").await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn expired_entries_are_pruned_on_insert() {
        let store = InMemoryRevocationStore::new();
        let now = Utc::now().timestamp();
        store.revoke("stale", now - 10).await;
        store.revoke("fresh", now + 3600).await;
        assert!(!store.is_revoked("stale").await);
        assert!(store.is_revoked("fresh").await);
        assert_eq!(store.len().await, 1);
    }
}
