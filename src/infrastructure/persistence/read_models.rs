use super::error::map_sqlx;
use crate::application::dto::{AccountView, PageRequest};
use crate::domain::{audit::AuditLog, errors::DomainResult};
use crate::infrastructure::database::DataContext;

const ACCOUNT_VIEW_SELECT: &str = r#"
    SELECT a.id, a.username, a.email, a.is_locked, r.title AS role_title, a.creation_date
    FROM accounts a
    LEFT JOIN roles r ON r.id = a.role_id
"#;

/// Account views, newest first.
pub async fn account_views(context: &DataContext) -> DomainResult<Vec<AccountView>> {
    let sql = format!("{ACCOUNT_VIEW_SELECT} ORDER BY a.id DESC");
    sqlx::query_as::<_, AccountView>(&sql)
        .fetch_all(context.pool())
        .await
        .map_err(map_sqlx)
}

pub async fn account_view(context: &DataContext, id: i64) -> DomainResult<Option<AccountView>> {
    let sql = format!("{ACCOUNT_VIEW_SELECT} WHERE a.id = ?");
    sqlx::query_as::<_, AccountView>(&sql)
        .bind(id)
        .fetch_optional(context.pool())
        .await
        .map_err(map_sqlx)
}

/// One page of audit logs, newest first, with the total count.
pub async fn audit_log_page(
    context: &DataContext,
    request: PageRequest,
) -> DomainResult<(Vec<AuditLog>, u64)> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs")
        .fetch_one(context.pool())
        .await
        .map_err(map_sqlx)?;

    let limit = i64::from(request.page_size);
    let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
    let items = sqlx::query_as::<_, AuditLog>(
        r#"
        SELECT id, account_id, action, entity_name, entity_id, changes, creation_date
        FROM audit_logs
        ORDER BY id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(context.pool())
    .await
    .map_err(map_sqlx)?;

    Ok((items, u64::try_from(total).unwrap_or_default()))
}
