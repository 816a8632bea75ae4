use crate::application::dto::{AccountLoginView, AccountRecoveryView, AccountResetView, Principal};
use crate::presentation::http::{
    controllers::{StatusResponse, with_cookie},
    error::{HttpResult, IntoHttpResult, ensure_valid},
    extractors::CurrentAccess,
    state::HttpState,
};
use axum::{Extension, Json, response::Response};

pub const CONTROLLER: &str = "Auth";

pub async fn login(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<AccountLoginView>,
) -> HttpResult<Response> {
    let anonymous = Principal::anonymous();
    let model = state
        .services
        .account_validator(&anonymous)
        .can_login(&payload)
        .await
        .into_http()?;
    ensure_valid(model)?;

    let cookie = state
        .services
        .accounts(&anonymous)
        .login(&payload.username, payload.persistent)
        .await
        .into_http()?;
    Ok(with_cookie(&cookie))
}

pub async fn logout(
    Extension(state): Extension<HttpState>,
    CurrentAccess(access): CurrentAccess,
) -> HttpResult<Response> {
    access.ensure(None, CONTROLLER, "Logout").into_http()?;

    let cookie = state.services.accounts(access.principal()).logout();
    tracing::info!(account_id = access.principal().account_id, "signed out");
    Ok(with_cookie(&cookie))
}

/// Always answers `ok` for a well-formed address so callers cannot discover
/// which e-mails are registered.
pub async fn recover(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<AccountRecoveryView>,
) -> HttpResult<Json<StatusResponse>> {
    let anonymous = Principal::anonymous();
    let model = state
        .services
        .account_validator(&anonymous)
        .can_recover(&payload)
        .await
        .into_http()?;
    ensure_valid(model)?;

    state
        .services
        .accounts(&anonymous)
        .recover(&payload)
        .await
        .into_http()?;
    Ok(Json(StatusResponse::ok()))
}

pub async fn reset(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<AccountResetView>,
) -> HttpResult<Json<StatusResponse>> {
    let anonymous = Principal::anonymous();
    let model = state
        .services
        .account_validator(&anonymous)
        .can_reset(&payload)
        .await
        .into_http()?;
    ensure_valid(model)?;

    state
        .services
        .accounts(&anonymous)
        .reset(&payload)
        .await
        .into_http()?;
    Ok(Json(StatusResponse::ok()))
}
