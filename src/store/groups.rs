use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::authz::Scope;
use crate::db::StoreError;
use crate::models::GroupRow;

pub async fn list_groups(pool: &PgPool, scope: Scope) -> Result<Vec<GroupRow>, StoreError> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT mg.group_name AS name, mg.group_email_address AS email_address, \
         mg.group_description AS description, mg.insert_date, \
         ma.admin_fullname AS created_by \
         FROM mailgw_group mg \
         JOIN mailgw_domain md ON mg.domain_id = md.domain_id \
         JOIN mailgw_admin ma ON mg.create_by_admin = ma.admin_id",
    );
    if let Scope::Company(company_id) = scope {
        qb.push(" WHERE md.company_id = ").push_bind(company_id);
    }
    let rows = qb.build_query_as::<GroupRow>().fetch_all(pool).await?;
    Ok(rows)
}
