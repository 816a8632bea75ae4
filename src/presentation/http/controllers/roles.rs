use crate::application::{
    access::ADMINISTRATION,
    dto::{PermissionView, RoleEditView, RoleView},
    error::ApplicationError,
};
use crate::presentation::http::{
    controllers::{CreatedResponse, StatusResponse},
    error::{HttpError, HttpResult, IntoHttpResult, ensure_valid},
    extractors::CurrentAccess,
    state::HttpState,
};
use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
};

pub const CONTROLLER: &str = "Roles";

fn not_found(id: i64) -> HttpError {
    HttpError::from_error(ApplicationError::not_found(format!("role {id} not found")))
}

pub async fn index(
    Extension(state): Extension<HttpState>,
    CurrentAccess(access): CurrentAccess,
) -> HttpResult<Json<Vec<RoleView>>> {
    access
        .ensure(Some(ADMINISTRATION), CONTROLLER, "Index")
        .into_http()?;

    state
        .services
        .roles(access.principal())
        .get_views()
        .await
        .into_http()
        .map(Json)
}

/// Permissions a role can be granted.
pub async fn permissions(
    Extension(state): Extension<HttpState>,
    CurrentAccess(access): CurrentAccess,
) -> HttpResult<Json<Vec<PermissionView>>> {
    access
        .ensure(Some(ADMINISTRATION), CONTROLLER, "Create")
        .into_http()?;

    state
        .services
        .roles(access.principal())
        .permissions()
        .await
        .into_http()
        .map(Json)
}

pub async fn details(
    Extension(state): Extension<HttpState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<i64>,
) -> HttpResult<Json<RoleEditView>> {
    access
        .ensure(Some(ADMINISTRATION), CONTROLLER, "Details")
        .into_http()?;

    state
        .services
        .roles(access.principal())
        .get_view(id)
        .await
        .into_http()?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

pub async fn create(
    Extension(state): Extension<HttpState>,
    CurrentAccess(access): CurrentAccess,
    Json(payload): Json<RoleEditView>,
) -> HttpResult<(StatusCode, Json<CreatedResponse>)> {
    access
        .ensure(Some(ADMINISTRATION), CONTROLLER, "Create")
        .into_http()?;

    let model = state
        .services
        .role_validator()
        .can_create(&payload)
        .await
        .into_http()?;
    ensure_valid(model)?;

    let id = state
        .services
        .roles(access.principal())
        .create(&payload)
        .await
        .into_http()?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

pub async fn edit(
    Extension(state): Extension<HttpState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<i64>,
    Json(mut payload): Json<RoleEditView>,
) -> HttpResult<Json<StatusResponse>> {
    access
        .ensure(Some(ADMINISTRATION), CONTROLLER, "Edit")
        .into_http()?;
    payload.id = id;

    let model = state
        .services
        .role_validator()
        .can_edit(&payload)
        .await
        .into_http()?;
    ensure_valid(model)?;

    state
        .services
        .roles(access.principal())
        .edit(&payload)
        .await
        .into_http()?;
    Ok(Json(StatusResponse::ok()))
}

pub async fn delete(
    Extension(state): Extension<HttpState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<i64>,
) -> HttpResult<Json<StatusResponse>> {
    access
        .ensure(Some(ADMINISTRATION), CONTROLLER, "Delete")
        .into_http()?;

    state
        .services
        .roles(access.principal())
        .delete(id)
        .await
        .into_http()?;
    Ok(Json(StatusResponse::ok()))
}
