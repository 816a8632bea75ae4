use crate::application::{
    access::{ADMINISTRATION, Access},
    dto::{AccountCreateView, AccountEditView, AccountView, PageRequest},
    error::ApplicationError,
};
use crate::presentation::grid::{
    Culture, Grid, GridColumns, GridOptions, LinkAction, RouteContext,
};
use crate::presentation::http::{
    controllers::{CreatedResponse, StatusResponse},
    error::{HttpError, HttpResult, IntoHttpResult, ensure_valid},
    extractors::CurrentAccess,
    state::HttpState,
};
use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
    response::Html,
};

pub const CONTROLLER: &str = "Accounts";

fn not_found(id: i64) -> HttpError {
    HttpError::from_error(ApplicationError::not_found(format!("account {id} not found")))
}

/// Account table with the row links `access` allows.
pub fn account_grid(culture: Culture, access: &Access) -> Grid<AccountView> {
    let route = RouteContext::new(Some(ADMINISTRATION), CONTROLLER);
    let mut columns = GridColumns::<AccountView>::new(culture);

    for action in [LinkAction::Details, LinkAction::Edit, LinkAction::Delete] {
        columns.add_action_link(action, access, &route);
    }
    columns.add_property("username", |view: &AccountView| view.username.clone());
    columns.add_property("email", |view: &AccountView| view.email.clone());
    columns
        .add_property("role_title", |view: &AccountView| view.role_title.clone())
        .titled("Role");
    columns.add_property("is_locked", |view: &AccountView| view.is_locked);
    columns.add_date_property("creation_date", |view: &AccountView| view.creation_date);

    Grid::new(columns)
}

pub async fn index(
    Extension(state): Extension<HttpState>,
    CurrentAccess(access): CurrentAccess,
) -> HttpResult<Json<Vec<AccountView>>> {
    access
        .ensure(Some(ADMINISTRATION), CONTROLLER, "Index")
        .into_http()?;

    state
        .services
        .accounts(access.principal())
        .get_views()
        .await
        .into_http()
        .map(Json)
}

pub async fn grid(
    Extension(state): Extension<HttpState>,
    CurrentAccess(access): CurrentAccess,
    Query(request): Query<PageRequest>,
) -> HttpResult<Html<String>> {
    access
        .ensure(Some(ADMINISTRATION), CONTROLLER, "Index")
        .into_http()?;

    let views = state
        .services
        .accounts(access.principal())
        .get_views()
        .await
        .into_http()?;

    let request = request.clamped();
    let grid = account_grid(state.culture, &access);
    let options = GridOptions {
        page_size: Some(request.page_size),
        ..grid.options().clone()
    };
    let grid = grid.with_options(options);
    let rows: Vec<AccountView> = views
        .iter()
        .skip(request.offset() as usize)
        .take(request.page_size as usize)
        .cloned()
        .collect();

    Ok(Html(grid.render(&rows, request.page, views.len() as u64)))
}

pub async fn details(
    Extension(state): Extension<HttpState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<i64>,
) -> HttpResult<Json<AccountView>> {
    access
        .ensure(Some(ADMINISTRATION), CONTROLLER, "Details")
        .into_http()?;

    state
        .services
        .accounts(access.principal())
        .get_view(id)
        .await
        .into_http()?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

pub async fn create(
    Extension(state): Extension<HttpState>,
    CurrentAccess(access): CurrentAccess,
    Json(payload): Json<AccountCreateView>,
) -> HttpResult<(StatusCode, Json<CreatedResponse>)> {
    access
        .ensure(Some(ADMINISTRATION), CONTROLLER, "Create")
        .into_http()?;

    let model = state
        .services
        .account_validator(access.principal())
        .can_create(&payload)
        .await
        .into_http()?;
    ensure_valid(model)?;

    let id = state
        .services
        .accounts(access.principal())
        .create(&payload)
        .await
        .into_http()?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

pub async fn edit_form(
    Extension(state): Extension<HttpState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<i64>,
) -> HttpResult<Json<AccountEditView>> {
    access
        .ensure(Some(ADMINISTRATION), CONTROLLER, "Edit")
        .into_http()?;

    state
        .services
        .accounts(access.principal())
        .get::<AccountEditView>(id)
        .await
        .into_http()?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

pub async fn edit(
    Extension(state): Extension<HttpState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<i64>,
    Json(mut payload): Json<AccountEditView>,
) -> HttpResult<Json<StatusResponse>> {
    access
        .ensure(Some(ADMINISTRATION), CONTROLLER, "Edit")
        .into_http()?;
    payload.id = id;

    let model = state
        .services
        .account_validator(access.principal())
        .can_edit(&payload)
        .await
        .into_http()?;
    ensure_valid(model)?;

    state
        .services
        .accounts(access.principal())
        .edit(&payload)
        .await
        .into_http()?;
    Ok(Json(StatusResponse::ok()))
}

pub async fn delete_confirm(
    Extension(state): Extension<HttpState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<i64>,
) -> HttpResult<Json<AccountView>> {
    access
        .ensure(Some(ADMINISTRATION), CONTROLLER, "Delete")
        .into_http()?;

    state
        .services
        .accounts(access.principal())
        .get_view(id)
        .await
        .into_http()?
        .map(Json)
        .ok_or_else(|| not_found(id))
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
        .accounts(access.principal())
        .delete(id)
        .await
        .into_http()?;
    Ok(Json(StatusResponse::ok()))
}
