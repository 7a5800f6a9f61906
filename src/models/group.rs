use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GroupRow {
    pub name: String,
    pub email_address: String,
    pub description: String,
    pub insert_date: DateTime<Utc>,
    pub created_by: String,
}
