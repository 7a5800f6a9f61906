use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CompanyRow {
    pub id: i64,
    pub name: String,
    pub max_domain: i64,
    pub max_account: i64,
    pub mailbox_quota: i64,
    pub registered_date: DateTime<Utc>,
}
