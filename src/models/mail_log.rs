use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One sent or received message, joined back to the local account.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MailLogRow {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub from: String,
    pub to: String,
    pub subject: String,
}
