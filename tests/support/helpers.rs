use super::builders::TestApp;
use axum::{
    Router,
    body::{self, Body},
    http::{Request, Response, header},
};
use mvc_template::{
    application::ports::security::TicketManager,
    presentation::{
        grid::Culture,
        http::{routes::build_router, state::HttpState},
    },
};
use serde_json::Value;
use std::sync::Arc;

pub fn router(app: &TestApp) -> Router {
    build_router(HttpState::new(Arc::clone(&app.services), Culture::EnUs))
}

/// `Cookie` header value signed in as `account_id`.
pub fn cookie_for(app: &TestApp, account_id: i64) -> String {
    let cookie = app
        .tickets
        .issue(&account_id.to_string(), false)
        .expect("issue ticket");
    format!("{}={}", cookie.name, cookie.value)
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    request("GET", uri, cookie, None)
}

pub fn post_json(uri: &str, cookie: Option<&str>, payload: Value) -> Request<Body> {
    request("POST", uri, cookie, Some(payload))
}

fn request(method: &str, uri: &str, cookie: Option<&str>, payload: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match payload {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
