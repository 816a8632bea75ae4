use crate::{
    application::{access::Access, dto::Principal, error::ApplicationError},
    presentation::http::state::HttpState,
};
use axum::{Extension, extract::FromRequestParts, http::request::Parts};
use headers::{Cookie, HeaderMapExt};

use super::error::HttpError;

/// Principal resolved from the authentication cookie. A missing, forged or
/// expired ticket yields an anonymous principal.
#[derive(Debug, Clone, Copy)]
pub struct CurrentPrincipal(pub Principal);

/// Capability for the current principal, gated by the shared authorization
/// provider.
#[derive(Debug, Clone)]
pub struct CurrentAccess(pub Access);

async fn state_of<S: Send + Sync>(parts: &mut Parts, state: &S) -> Result<HttpState, HttpError> {
    let Extension(app_state) = Extension::<HttpState>::from_request_parts(parts, state)
        .await
        .map_err(|_| {
            HttpError::from_error(ApplicationError::Infrastructure(
                "application state missing".into(),
            ))
        })?;
    Ok(app_state)
}

fn principal_from(parts: &Parts, app_state: &HttpState) -> Principal {
    let manager = app_state.services.ticket_manager();
    let Some(value) = parts
        .headers
        .typed_get::<Cookie>()
        .and_then(|cookie| cookie.get(manager.cookie_name()).map(str::to_owned))
    else {
        return Principal::anonymous();
    };

    match manager.authenticate(&value) {
        Ok(ticket) => ticket
            .account_id()
            .map_or_else(Principal::anonymous, Principal::authenticated),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring authentication cookie");
            Principal::anonymous()
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentPrincipal {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = state_of(parts, state).await?;
        Ok(Self(principal_from(parts, &app_state)))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentAccess {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = state_of(parts, state).await?;
        let principal = principal_from(parts, &app_state);
        Ok(Self(app_state.services.access(principal)))
    }
}
