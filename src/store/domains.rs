use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Row};

use crate::authz::Scope;
use crate::db::StoreError;
use crate::models::{DomainListRow, DomainOwnershipRow};

const INSERT_DOMAIN_CHECKED: &str = "INSERT INTO mailgw_domain \
    (domain_name, company_id, domain_verification_code, domain_insert_date, domain_verified) \
    SELECT $1, $2, $3, now(), FALSE \
    WHERE (SELECT count(*) FROM mailgw_domain WHERE company_id = $2) \
        < (SELECT company_max_domain FROM mailgw_company WHERE company_id = $2) \
    RETURNING domain_id";

/// Insert a domain only while the company is under its domain quota.
/// The count guards the insert within one statement, so the check can
/// never be stale relative to rows committed before the statement
/// started. Under READ COMMITTED two simultaneous inserts can each see
/// the pre-insert count and overshoot the quota by one; the guard is
/// exact only at SERIALIZABLE isolation. Returns the new domain id, or
/// `None` when the quota is already reached.
pub async fn insert_domain_checked(
    pool: &PgPool,
    name: &str,
    company_id: i64,
    verification_code: &str,
) -> Result<Option<i64>, StoreError> {
    let row = sqlx::query(INSERT_DOMAIN_CHECKED)
        .bind(name)
        .bind(company_id)
        .bind(verification_code)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.get::<i64, _>("domain_id")))
}

pub async fn ownership(
    pool: &PgPool,
    domain_id: i64,
) -> Result<Option<DomainOwnershipRow>, StoreError> {
    let row = sqlx::query_as::<_, DomainOwnershipRow>(
        "SELECT domain_verified AS verified, company_id FROM mailgw_domain WHERE domain_id = $1",
    )
    .bind(domain_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Company and name of a domain, for mail-account creation.
#[derive(Debug, Clone, FromRow)]
pub struct DomainRef {
    pub company_id: i64,
    pub name: String,
}

pub async fn domain_ref(pool: &PgPool, domain_id: i64) -> Result<Option<DomainRef>, StoreError> {
    let row = sqlx::query_as::<_, DomainRef>(
        "SELECT company_id, domain_name AS name FROM mailgw_domain WHERE domain_id = $1",
    )
    .bind(domain_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn mark_verified(pool: &PgPool, domain_id: i64) -> Result<u64, StoreError> {
    let result = sqlx::query("UPDATE mailgw_domain SET domain_verified = TRUE WHERE domain_id = $1")
        .bind(domain_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_domain(pool: &PgPool, domain_id: i64) -> Result<u64, StoreError> {
    let result = sqlx::query("DELETE FROM mailgw_domain WHERE domain_id = $1")
        .bind(domain_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

fn list_query(scope: Scope) -> QueryBuilder<'static, Postgres> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT md.domain_id AS id, md.domain_name AS name, mc.company_name, \
         md.domain_insert_date AS insert_date, md.domain_verification_code AS verification_code, \
         CASE WHEN md.domain_verified THEN 'verified' ELSE 'not verified' END AS verified_status \
         FROM mailgw_domain md JOIN mailgw_company mc ON md.company_id = mc.company_id",
    );
    if let Scope::Company(company_id) = scope {
        qb.push(" WHERE md.company_id = ").push_bind(company_id);
    }
    qb
}

pub async fn list_domains(pool: &PgPool, scope: Scope) -> Result<Vec<DomainListRow>, StoreError> {
    let rows = list_query(scope).build_query_as::<DomainListRow>().fetch_all(pool).await?;
    Ok(rows)
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
        let mut qb = list_query(Scope::Company(7));
        assert!(qb.sql().ends_with("WHERE md.company_id = $1"));
    }

    #[test]
    fn quota_guard_travels_with_the_insert() {
        assert!(INSERT_DOMAIN_CHECKED.starts_with("INSERT INTO mailgw_domain"));
        assert!(INSERT_DOMAIN_CHECKED
            .contains("WHERE (SELECT count(*) FROM mailgw_domain WHERE company_id = $2)"));
        assert!(INSERT_DOMAIN_CHECKED
            .contains("< (SELECT company_max_domain FROM mailgw_company WHERE company_id = $2)"));
        assert!(INSERT_DOMAIN_CHECKED.ends_with("RETURNING domain_id"));
    }
}
