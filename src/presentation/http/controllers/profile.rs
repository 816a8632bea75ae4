use crate::application::{dto::ProfileEditView, error::ApplicationError};
use crate::presentation::http::{
    controllers::StatusResponse,
    error::{HttpError, HttpResult, IntoHttpResult, ensure_valid},
    extractors::CurrentAccess,
    state::HttpState,
};
use axum::{Extension, Json};

pub const CONTROLLER: &str = "Profile";

pub async fn show(
    Extension(state): Extension<HttpState>,
    CurrentAccess(access): CurrentAccess,
) -> HttpResult<Json<ProfileEditView>> {
    access.ensure(None, CONTROLLER, "Edit").into_http()?;
    let principal = access.principal();
    let account_id = principal.account_id.unwrap_or_default();

    state
        .services
        .accounts(principal)
        .get::<ProfileEditView>(account_id)
        .await
        .into_http()?
        .map(Json)
        .ok_or_else(|| HttpError::from_error(ApplicationError::not_found("account not found")))
}

pub async fn edit(
    Extension(state): Extension<HttpState>,
    CurrentAccess(access): CurrentAccess,
    Json(payload): Json<ProfileEditView>,
) -> HttpResult<Json<StatusResponse>> {
    access.ensure(None, CONTROLLER, "Edit").into_http()?;
    let principal = access.principal();

    let model = state
        .services
        .account_validator(principal)
        .can_edit_profile(&payload)
        .await
        .into_http()?;
    ensure_valid(model)?;

    state
        .services
        .accounts(principal)
        .edit_profile(&payload)
        .await
        .into_http()?;
    Ok(Json(StatusResponse::ok()))
}
