pub mod accounts;
pub mod audit;
pub mod auth;
pub mod profile;
pub mod roles;

use crate::application::dto::AuthCookie;
use axum::{
    Json,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

/// JSON `ok` status carrying a `Set-Cookie` header.
pub(crate) fn with_cookie(cookie: &AuthCookie) -> Response {
    (
        [(header::SET_COOKIE, cookie.to_header_value())],
        Json(StatusResponse::ok()),
    )
        .into_response()
}
