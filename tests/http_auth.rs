//! Router-level tests for the authentication surface. The pool is created
//! lazily and never connected; every request here is resolved before any
//! query would run.

use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use mailgw_admin_api::app::app;
use mailgw_admin_api::auth::{InMemoryRevocationStore, TokenService};
use mailgw_admin_api::authz::Role;
use mailgw_admin_api::state::AppState;

fn test_state() -> AppState {
    AppState {
        pool: PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/mailgw_test")
            .expect("lazy pool"),
        tokens: TokenService::new("integration-test-secret", 2),
        revocations: Arc::new(InMemoryRevocationStore::new()),
    }
}

fn test_app() -> (Router, AppState) {
    let state = test_state();
    (app(state.clone()), state)
}

async fn body_json(response: axum::response::Response) -> Result<serde_json::Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn root_is_public() -> Result<()> {
    let (router, _) = test_app();
    let res = router.oneshot(Request::get("/").body(Body::empty())?).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn missing_token_is_rejected() -> Result<()> {
    let (router, _) = test_app();
    let res = router.oneshot(Request::get("/profile").body(Body::empty())?).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body = body_json(res).await?;
    assert_eq!(body["message"], "A token is required for authentication");
    Ok(())
}

#[tokio::test]
async fn malformed_authorization_header_is_rejected() -> Result<()> {
    let (router, _) = test_app();
    let res = router
        .oneshot(
            Request::get("/domain")
                .header(header::AUTHORIZATION, "Token abc123")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_rejected() -> Result<()> {
    let (router, _) = test_app();
    let res = router
        .oneshot(
            Request::get("/profile")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(res).await?;
    assert_eq!(body["message"], "Invalid Token");
    Ok(())
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() -> Result<()> {
    let (router, _) = test_app();
    let foreign = TokenService::new("some-other-secret", 2);
    let token = foreign.issue("admin", Role::Superadmin)?;

    let res = router
        .oneshot(
            Request::get("/email")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn logout_without_token_is_bad_request() -> Result<()> {
    let (router, _) = test_app();
    let res = router.oneshot(Request::post("/logout").body(Body::empty())?).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = body_json(res).await?;
    assert_eq!(body["message"], "Token not provided");
    Ok(())
}

#[tokio::test]
async fn logout_revokes_and_is_idempotent() -> Result<()> {
    let (router, state) = test_app();
    let token = state.tokens.issue("alice", Role::Admin)?;
    let bearer = format!("Bearer {}", token);

    // First logout succeeds
    let res = router
        .clone()
        .oneshot(
            Request::post("/logout")
                .header(header::AUTHORIZATION, bearer.as_str())
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Second logout with the same token is safe
    let res = router
        .clone()
        .oneshot(
            Request::post("/logout")
                .header(header::AUTHORIZATION, bearer.as_str())
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // The signature is still valid, but the token must now be rejected
    // before any identity lookup happens
    let res = router
        .oneshot(
            Request::get("/domain")
                .header(header::AUTHORIZATION, bearer.as_str())
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(res).await?;
    assert_eq!(body["message"], "Token has been revoked");
    Ok(())
}

#[tokio::test]
async fn login_requires_credentials() -> Result<()> {
    let (router, _) = test_app();
    let res = router
        .oneshot(
            Request::post("/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"username":"alice"}"#))?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = body_json(res).await?;
    assert_eq!(body["message"], "Username and password are required");
    Ok(())
}
