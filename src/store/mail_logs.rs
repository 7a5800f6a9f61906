use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::authz::Scope;
use crate::db::StoreError;
use crate::models::MailLogRow;

pub async fn list_sent(pool: &PgPool, scope: Scope) -> Result<Vec<MailLogRow>, StoreError> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT ms.id, ms.sent_date AS date, mm.mail AS \"from\", \
         ms.mail_destination AS \"to\", ms.mail_subject AS subject \
         FROM mailgw_mail_sent ms \
         JOIN mailgw_mail mm ON ms.mail_source_id = mm.id \
         JOIN mailgw_domain md ON mm.domain_id = md.domain_id",
    );
    if let Scope::Company(company_id) = scope {
        qb.push(" WHERE md.company_id = ").push_bind(company_id);
    }
    let rows = qb.build_query_as::<MailLogRow>().fetch_all(pool).await?;
    Ok(rows)
}
