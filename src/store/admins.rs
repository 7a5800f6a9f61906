use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::authz::{Role, Scope};
use crate::db::StoreError;
use crate::models::{AdminIdentityRow, AdminListRow, AdminRow};

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<AdminRow>, StoreError> {
    let row = sqlx::query_as::<_, AdminRow>(
        "SELECT admin_id AS id, admin_username AS username, admin_password AS password_hash, \
         admin_fullname AS fullname, admin_type AS role, company_id \
         FROM mailgw_admin WHERE admin_username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn identity_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<AdminIdentityRow>, StoreError> {
    let row = sqlx::query_as::<_, AdminIdentityRow>(
        "SELECT admin_id AS id, admin_type AS role, company_id \
         FROM mailgw_admin WHERE admin_username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn identity_by_id(
    pool: &PgPool,
    admin_id: i64,
) -> Result<Option<AdminIdentityRow>, StoreError> {
    let row = sqlx::query_as::<_, AdminIdentityRow>(
        "SELECT admin_id AS id, admin_type AS role, company_id \
         FROM mailgw_admin WHERE admin_id = $1",
    )
    .bind(admin_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn insert_admin(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
    fullname: &str,
    role: Role,
    company_id: i64,
) -> Result<(), StoreError> {
    let result = sqlx::query(
        "INSERT INTO mailgw_admin (admin_username, admin_password, admin_fullname, admin_type, company_id) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(username)
    .bind(password_hash)
    .bind(fullname)
    .bind(role.as_str())
    .bind(company_id)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23505") => {
            Err(StoreError::Conflict("Username already exists".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_admin(pool: &PgPool, admin_id: i64) -> Result<u64, StoreError> {
    let result = sqlx::query("DELETE FROM mailgw_admin WHERE admin_id = $1")
        .bind(admin_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn list_admins(pool: &PgPool, scope: Scope) -> Result<Vec<AdminListRow>, StoreError> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT ma.admin_fullname AS fullname, ma.admin_username AS username, \
         ma.admin_type AS role, mc.company_name \
         FROM mailgw_admin ma JOIN mailgw_company mc ON ma.company_id = mc.company_id",
    );
    if let Scope::Company(company_id) = scope {
        qb.push(" WHERE ma.company_id = ").push_bind(company_id);
    }
    let rows = qb.build_query_as::<AdminListRow>().fetch_all(pool).await?;
    Ok(rows)
}

/// Partial update for the admin-management endpoint. Only the supplied
/// fields make it into the statement.
#[derive(Debug, Default)]
pub struct AdminUpdate {
    pub role: Option<Role>,
    pub password_hash: Option<String>,
}

impl AdminUpdate {
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.password_hash.is_none()
    }

    fn into_builder(self, admin_id: i64) -> QueryBuilder<'static, Postgres> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE mailgw_admin SET ");
        let mut fields = qb.separated(", ");
        if let Some(role) = self.role {
            fields.push("admin_type = ").push_bind_unseparated(role.as_str());
        }
        if let Some(hash) = self.password_hash {
            fields.push("admin_password = ").push_bind_unseparated(hash);
        }
        qb.push(" WHERE admin_id = ").push_bind(admin_id);
        qb
    }
}

pub async fn update_admin(
    pool: &PgPool,
    admin_id: i64,
    update: AdminUpdate,
) -> Result<u64, StoreError> {
    let result = update.into_builder(admin_id).build().execute(pool).await?;
    Ok(result.rows_affected())
}

pub async fn update_password_by_username(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
) -> Result<u64, StoreError> {
    let result =
        sqlx::query("UPDATE mailgw_admin SET admin_password = $1 WHERE admin_username = $2")
            .bind(password_hash)
            .bind(username)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_builder_with_both_fields() {
        let update =
            AdminUpdate { role: Some(Role::Operator), password_hash: Some("h".to_string()) };
        let mut qb = update.into_builder(9);
        assert_eq!(
            qb.sql(),
            "UPDATE mailgw_admin SET admin_type = $1, admin_password = $2 WHERE admin_id = $3"
        );
    }

    #[test]
    fn update_builder_role_only() {
        let update = AdminUpdate { role: Some(Role::Guest), password_hash: None };
        let mut qb = update.into_builder(9);
        assert_eq!(qb.sql(), "UPDATE mailgw_admin SET admin_type = $1 WHERE admin_id = $2");
    }
}
