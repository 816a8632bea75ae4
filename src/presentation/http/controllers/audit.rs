use crate::application::{
    access::ADMINISTRATION,
    dto::{AuditLogView, Page, PageRequest},
};
use crate::presentation::http::{
    error::{HttpResult, IntoHttpResult},
    extractors::CurrentAccess,
    state::HttpState,
};
use axum::{Extension, Json, extract::Query};

pub const CONTROLLER: &str = "AuditLogs";

pub async fn index(
    Extension(state): Extension<HttpState>,
    CurrentAccess(access): CurrentAccess,
    Query(request): Query<PageRequest>,
) -> HttpResult<Json<Page<AuditLogView>>> {
    access
        .ensure(Some(ADMINISTRATION), CONTROLLER, "Index")
        .into_http()?;

    state
        .services
        .audit_logs()
        .list(request)
        .await
        .into_http()
        .map(Json)
}
