use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::authz::Scope;
use crate::db::StoreError;
use crate::models::MailListRow;

/// Default mailbox quota for new accounts: 10 GiB.
pub const DEFAULT_MAILBOX_QUOTA: i64 = 10 * 1024 * 1024 * 1024;

pub async fn address_exists(pool: &PgPool, address: &str) -> Result<bool, StoreError> {
    let row = sqlx::query("SELECT id FROM mailgw_mail WHERE mail = $1")
        .bind(address)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

const INSERT_MAIL_CHECKED: &str = "INSERT INTO mailgw_mail \
    (mail, password, mail_mailbox_quota, status, mail_insert_by, domain_id, \
     mail_insert_date, mail_last_update) \
    SELECT $1, $2, $3, 'active', $4, $5, now(), now() \
    WHERE (SELECT count(*) FROM mailgw_mail mm \
           JOIN mailgw_domain md ON mm.domain_id = md.domain_id \
           WHERE md.company_id = $6) \
        < (SELECT company_max_account FROM mailgw_company WHERE company_id = $6) \
    RETURNING id";

/// Insert a mail account only while the owning company is under its
/// account quota. Single statement, same rationale and isolation caveat
/// as domain creation. The count spans every domain of the company, not
/// just the target domain.
/// Returns the new account id, or `None` when the quota is reached.
pub async fn insert_mail_checked(
    pool: &PgPool,
    address: &str,
    password_hash: &str,
    created_by: i64,
    domain_id: i64,
    company_id: i64,
) -> Result<Option<i64>, StoreError> {
    let result = sqlx::query(INSERT_MAIL_CHECKED)
        .bind(address)
        .bind(password_hash)
        .bind(DEFAULT_MAILBOX_QUOTA)
        .bind(created_by)
        .bind(domain_id)
        .bind(company_id)
        .fetch_optional(pool)
        .await;

    match result {
        Ok(row) => Ok(row.map(|r| r.get::<i64, _>("id"))),
        Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23505") => {
            Err(StoreError::Conflict("Email address already exists".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Does this mail account exist within the given scope? The ownership
/// join runs even when the caller never supplied the domain id.
fn account_in_scope_query(mail_id: i64, scope: Scope) -> QueryBuilder<'static, Postgres> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT mm.id FROM mailgw_mail mm \
         JOIN mailgw_domain md ON mm.domain_id = md.domain_id \
         WHERE mm.id = ",
    );
    qb.push_bind(mail_id);
    if let Scope::Company(company_id) = scope {
        qb.push(" AND md.company_id = ").push_bind(company_id);
    }
    qb
}

pub async fn account_in_scope(
    pool: &PgPool,
    mail_id: i64,
    scope: Scope,
) -> Result<bool, StoreError> {
    let row = account_in_scope_query(mail_id, scope).build().fetch_optional(pool).await?;
    Ok(row.is_some())
}

pub async fn delete_mail(pool: &PgPool, mail_id: i64) -> Result<u64, StoreError> {
    let result = sqlx::query("DELETE FROM mailgw_mail WHERE id = $1")
        .bind(mail_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

fn list_query(scope: Scope) -> QueryBuilder<'static, Postgres> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT mm.id, mm.mail, mm.mail_insert_date AS insert_date, \
         ma.admin_fullname AS created_by, mm.mail_mailbox_quota AS mailbox_quota, mm.status \
         FROM mailgw_mail mm \
         JOIN mailgw_admin ma ON mm.mail_insert_by = ma.admin_id \
         JOIN mailgw_domain md ON mm.domain_id = md.domain_id",
    );
    if let Scope::Company(company_id) = scope {
        qb.push(" WHERE md.company_id = ").push_bind(company_id);
    }
    qb
}

pub async fn list_mails(pool: &PgPool, scope: Scope) -> Result<Vec<MailListRow>, StoreError> {
    let rows = list_query(scope).build_query_as::<MailListRow>().fetch_all(pool).await?;
    Ok(rows)
}

pub async fn update_password(
    pool: &PgPool,
    mail_id: i64,
    password_hash: &str,
) -> Result<u64, StoreError> {
    let result = sqlx::query(
        "UPDATE mailgw_mail SET password = $1, mail_last_update = now() WHERE id = $2",
    )
    .bind(password_hash)
    .bind(mail_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Flip active⇄suspend in one statement, returning the new status.
pub async fn toggle_status(pool: &PgPool, mail_id: i64) -> Result<Option<String>, StoreError> {
    let row = sqlx::query(
        "UPDATE mailgw_mail \
         SET status = CASE status WHEN 'active' THEN 'suspend' ELSE 'active' END, \
             mail_last_update = now() \
         WHERE id = $1 RETURNING status",
    )
    .bind(mail_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| r.get::<String, _>("status")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_unscoped_has_no_company_clause() {
        let mut qb = list_query(Scope::All);
        assert!(!qb.sql().contains("WHERE"));
    }

    #[test]
    fn list_query_company_scope_filters_by_owner() {
        let mut qb = list_query(Scope::Company(4));
        assert!(qb.sql().ends_with("WHERE md.company_id = $1"));
    }

    #[test]
    fn scope_check_always_joins_ownership() {
        let mut qb = account_in_scope_query(11, Scope::All);
        let sql = qb.sql().to_string();
        assert!(sql.contains("JOIN mailgw_domain md ON mm.domain_id = md.domain_id"));
        assert!(sql.ends_with("WHERE mm.id = $1"));
    }

    #[test]
    fn scope_check_company_scope_adds_owner_filter() {
        let mut qb = account_in_scope_query(11, Scope::Company(4));
        assert!(qb.sql().ends_with("WHERE mm.id = $1 AND md.company_id = $2"));
    }

    #[test]
    fn quota_guard_counts_the_whole_company() {
        assert!(INSERT_MAIL_CHECKED.starts_with("INSERT INTO mailgw_mail"));
        assert!(INSERT_MAIL_CHECKED.contains("WHERE (SELECT count(*) FROM mailgw_mail mm"));
        assert!(INSERT_MAIL_CHECKED.contains("WHERE md.company_id = $6)"));
        assert!(INSERT_MAIL_CHECKED
            .contains("< (SELECT company_max_account FROM mailgw_company WHERE company_id = $6)"));
        assert!(INSERT_MAIL_CHECKED.ends_with("RETURNING id"));
    }
}
