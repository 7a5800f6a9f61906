use serde::Serialize;
use sqlx::FromRow;

/// Full admin row, loaded for login and password changes.
#[derive(Debug, Clone, FromRow)]
pub struct AdminRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub fullname: String,
    pub role: String,
    pub company_id: Option<i64>,
}

/// The fields identity resolution needs for caller/target lookups.
#[derive(Debug, Clone, FromRow)]
pub struct AdminIdentityRow {
    pub id: i64,
    pub role: String,
    pub company_id: Option<i64>,
}

/// Listing projection joined with the owning company.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminListRow {
    pub fullname: String,
    pub username: String,
    pub role: String,
    pub company_name: String,
}
