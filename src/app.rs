use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::json;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::authz::Role;
use crate::config;
use crate::handlers::{admin, auth, company, dashboard, domain, email, group, mail_log, profile};
use crate::middleware::{attach_caller, require_auth, require_roles};
use crate::state::AppState;

const SUPERADMIN_ONLY: &[Role] = &[Role::Superadmin];
const MAIL_MANAGERS: &[Role] = &[Role::Superadmin, Role::Admin, Role::Operator];
const ADMIN_MANAGERS: &[Role] = &[Role::Superadmin, Role::Admin];

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .merge(profile_routes(state.clone()))
        .merge(company_routes(state.clone()))
        .merge(domain_routes(state.clone()))
        .merge(email_routes(state.clone()))
        .merge(admin_routes(state.clone()))
        .merge(overview_routes(state.clone()))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    let origins = &config::config().security.cors_origins;
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Authenticated routes that act on the caller's own account; no identity
/// resolution beyond the verified token.
fn profile_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile::get_profile))
        .route("/password", put(profile::change_password))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn company_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/company", post(company::add).get(company::list))
        .route("/company/:company_id", delete(company::remove))
        .route_layer(middleware::from_fn(require_roles(SUPERADMIN_ONLY)))
        .route_layer(middleware::from_fn_with_state(state.clone(), attach_caller))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn domain_routes(state: AppState) -> Router<AppState> {
    let gated = Router::new()
        .route("/domain", post(domain::add))
        .route("/domain/:domain_id", put(domain::verify).delete(domain::remove))
        .route_layer(middleware::from_fn(require_roles(MAIL_MANAGERS)));

    // Listing is open to every role, guests included, scoped by company
    Router::new()
        .merge(gated)
        .route("/domain", get(domain::list))
        .route_layer(middleware::from_fn_with_state(state.clone(), attach_caller))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn email_routes(state: AppState) -> Router<AppState> {
    let gated = Router::new()
        .route("/email", post(email::add))
        .route("/email/:email_id", delete(email::remove))
        .route("/password/:email_id", put(email::reset_password))
        .route("/email-status/:email_id", put(email::change_status))
        .route_layer(middleware::from_fn(require_roles(MAIL_MANAGERS)));

    Router::new()
        .merge(gated)
        .route("/email", get(email::list))
        .route_layer(middleware::from_fn_with_state(state.clone(), attach_caller))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin", post(admin::add).get(admin::list))
        .route("/admin/:admin_id", put(admin::manage).delete(admin::remove))
        .route_layer(middleware::from_fn(require_roles(ADMIN_MANAGERS)))
        .route_layer(middleware::from_fn_with_state(state.clone(), attach_caller))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn overview_routes(state: AppState) -> Router<AppState> {
    let gated = Router::new()
        .route("/email-log", get(mail_log::list))
        .route_layer(middleware::from_fn(require_roles(ADMIN_MANAGERS)));

    Router::new()
        .merge(gated)
        .route("/group", get(group::list))
        .route("/dashboard", get(dashboard::overview))
        .route_layer(middleware::from_fn_with_state(state.clone(), attach_caller))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

async fn root() -> &'static str {
    "Server is running"
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::db::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::Json(json!({ "status": "ok", "timestamp": now, "database": "ok" })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
