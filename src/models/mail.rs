use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Listing projection joined with the creating admin.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MailListRow {
    pub id: i64,
    pub mail: String,
    pub insert_date: DateTime<Utc>,
    pub created_by: String,
    pub mailbox_quota: i64,
    pub status: String,
}

/// Dashboard projection for recently created accounts.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MailMailboxRow {
    pub id: i64,
    pub mail: String,
    pub insert_date: DateTime<Utc>,
    pub created_by: String,
    pub mailbox_quota: i64,
}
