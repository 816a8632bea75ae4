use crate::presentation::http::controllers::{
    StatusResponse, accounts, audit, auth, profile, roles,
};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json, Router,
    http::Method,
    routing::{get, post},
};
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: HttpState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/recover", post(auth::recover))
        .route("/auth/reset", post(auth::reset))
        .route("/profile", get(profile::show))
        .route("/profile/edit", post(profile::edit))
        .merge(administration_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(state))
}

/// Row links built by the grid point at `/{area}/{controller}/{action}/{id}`.
fn administration_routes() -> Router {
    Router::new()
        .route("/administration/accounts", get(accounts::index))
        .route("/administration/accounts/grid", get(accounts::grid))
        .route("/administration/accounts/create", post(accounts::create))
        .route(
            "/administration/accounts/details/{id}",
            get(accounts::details),
        )
        .route(
            "/administration/accounts/edit/{id}",
            get(accounts::edit_form).post(accounts::edit),
        )
        .route(
            "/administration/accounts/delete/{id}",
            get(accounts::delete_confirm).post(accounts::delete),
        )
        .route("/administration/roles", get(roles::index))
        .route("/administration/roles/permissions", get(roles::permissions))
        .route("/administration/roles/create", post(roles::create))
        .route("/administration/roles/details/{id}", get(roles::details))
        .route(
            "/administration/roles/edit/{id}",
            get(roles::details).post(roles::edit),
        )
        .route("/administration/roles/delete/{id}", post(roles::delete))
        .route("/administration/auditlogs", get(audit::index))
}

pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}
