use sqlx::{FromRow, PgPool};

use crate::db::StoreError;
use crate::models::CompanyRow;

pub async fn insert_company(
    pool: &PgPool,
    name: &str,
    address: &str,
    max_domain: i64,
    max_account: i64,
    mailbox_quota: i64,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO mailgw_company \
         (company_name, company_address, company_max_domain, company_max_account, \
          company_mailbox_quota, company_registered_date) \
         VALUES ($1, $2, $3, $4, $5, now())",
    )
    .bind(name)
    .bind(address)
    .bind(max_domain)
    .bind(max_account)
    .bind(mailbox_quota)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_company(pool: &PgPool, company_id: i64) -> Result<u64, StoreError> {
    let result = sqlx::query("DELETE FROM mailgw_company WHERE company_id = $1")
        .bind(company_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn list_companies(pool: &PgPool) -> Result<Vec<CompanyRow>, StoreError> {
    let rows = sqlx::query_as::<_, CompanyRow>(
        "SELECT company_id AS id, company_name AS name, company_max_domain AS max_domain, \
         company_max_account AS max_account, company_mailbox_quota AS mailbox_quota, \
         company_registered_date AS registered_date \
         FROM mailgw_company",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[derive(Debug, Clone, FromRow)]
pub struct CompanyLimits {
    pub max_domain: i64,
    pub max_account: i64,
}

pub async fn company_limits(
    pool: &PgPool,
    company_id: i64,
) -> Result<Option<CompanyLimits>, StoreError> {
    let row = sqlx::query_as::<_, CompanyLimits>(
        "SELECT company_max_domain AS max_domain, company_max_account AS max_account \
         FROM mailgw_company WHERE company_id = $1",
    )
    .bind(company_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn company_profile(
    pool: &PgPool,
    company_id: i64,
) -> Result<Option<(String, String)>, StoreError> {
    #[derive(FromRow)]
    struct Row {
        company_name: String,
        company_address: String,
    }
    let row = sqlx::query_as::<_, Row>(
        "SELECT company_name, company_address FROM mailgw_company WHERE company_id = $1",
    )
    .bind(company_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| (r.company_name, r.company_address)))
}
