use chrono::{Duration, Utc};
use sqlx::{PgPool, Row};

use crate::db::StoreError;
use crate::models::{MailLogRow, MailMailboxRow};

pub async fn domain_count(pool: &PgPool, company_id: i64) -> Result<i64, StoreError> {
    let row = sqlx::query("SELECT count(*) AS n FROM mailgw_domain WHERE company_id = $1")
        .bind(company_id)
        .fetch_one(pool)
        .await?;
    Ok(row.get::<i64, _>("n"))
}

pub async fn mail_count(pool: &PgPool, company_id: i64) -> Result<i64, StoreError> {
    let row = sqlx::query(
        "SELECT count(*) AS n FROM mailgw_mail mm \
         JOIN mailgw_domain md ON mm.domain_id = md.domain_id \
         WHERE md.company_id = $1",
    )
    .bind(company_id)
    .fetch_one(pool)
    .await?;
    Ok(row.get::<i64, _>("n"))
}

pub async fn sent_count(pool: &PgPool, company_id: i64) -> Result<i64, StoreError> {
    let row = sqlx::query(
        "SELECT count(*) AS n FROM mailgw_mail_sent ms \
         JOIN mailgw_mail mm ON ms.mail_source_id = mm.id \
         JOIN mailgw_domain md ON mm.domain_id = md.domain_id \
         WHERE md.company_id = $1",
    )
    .bind(company_id)
    .fetch_one(pool)
    .await?;
    Ok(row.get::<i64, _>("n"))
}

/// Mailbox quota of any one account in the company, in bytes. Zero when
/// the company has no accounts yet.
pub async fn sample_mailbox_quota(pool: &PgPool, company_id: i64) -> Result<i64, StoreError> {
    let row = sqlx::query(
        "SELECT mm.mail_mailbox_quota AS quota FROM mailgw_mail mm \
         JOIN mailgw_domain md ON mm.domain_id = md.domain_id \
         WHERE md.company_id = $1 LIMIT 1",
    )
    .bind(company_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| r.get::<i64, _>("quota")).unwrap_or(0))
}

pub async fn recent_accounts(
    pool: &PgPool,
    company_id: i64,
) -> Result<Vec<MailMailboxRow>, StoreError> {
    let since = Utc::now() - Duration::days(2);
    let rows = sqlx::query_as::<_, MailMailboxRow>(
        "SELECT mm.id, mm.mail, mm.mail_insert_date AS insert_date, \
         ma.admin_fullname AS created_by, mm.mail_mailbox_quota AS mailbox_quota \
         FROM mailgw_mail mm \
         JOIN mailgw_domain md ON mm.domain_id = md.domain_id \
         JOIN mailgw_admin ma ON mm.mail_insert_by = ma.admin_id \
         WHERE md.company_id = $1 AND mm.mail_insert_date >= $2 \
         ORDER BY mm.mail_insert_date DESC",
    )
    .bind(company_id)
    .bind(since)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn recent_sent(pool: &PgPool, company_id: i64) -> Result<Vec<MailLogRow>, StoreError> {
    let since = Utc::now() - Duration::days(2);
    let rows = sqlx::query_as::<_, MailLogRow>(
        "SELECT ms.id, ms.sent_date AS date, mm.mail AS \"from\", \
         ms.mail_destination AS \"to\", ms.mail_subject AS subject \
         FROM mailgw_mail_sent ms \
         JOIN mailgw_mail mm ON ms.mail_source_id = mm.id \
         JOIN mailgw_domain md ON mm.domain_id = md.domain_id \
         WHERE md.company_id = $1 AND ms.sent_date >= $2 \
         ORDER BY ms.sent_date DESC",
    )
    .bind(company_id)
    .bind(since)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn recent_inbox(pool: &PgPool, company_id: i64) -> Result<Vec<MailLogRow>, StoreError> {
    let since = Utc::now() - Duration::days(2);
    let rows = sqlx::query_as::<_, MailLogRow>(
        "SELECT mi.id, mi.inbox_date AS date, mi.mail_source AS \"from\", \
         mm.mail AS \"to\", mi.mail_subject AS subject \
         FROM mailgw_mail_inbox mi \
         JOIN mailgw_mail mm ON mi.mail_dest_id = mm.id \
         JOIN mailgw_domain md ON mm.domain_id = md.domain_id \
         WHERE md.company_id = $1 AND mi.inbox_date >= $2 \
         ORDER BY mi.inbox_date DESC",
    )
    .bind(company_id)
    .bind(since)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
