use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Listing projection joined with the owning company. `verified_status`
/// is rendered in SQL as "verified"/"not verified".
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DomainListRow {
    pub id: i64,
    pub name: String,
    pub company_name: String,
    pub insert_date: DateTime<Utc>,
    pub verification_code: String,
    pub verified_status: String,
}

/// Verification flag and owner, checked before verify/delete.
#[derive(Debug, Clone, FromRow)]
pub struct DomainOwnershipRow {
    pub verified: bool,
    pub company_id: i64,
}
