use axum::http::{StatusCode, header};
use mvc_template::{
    application::access::{ADMINISTRATION, PROTECTED_ACTIONS},
    domain::account::Account,
};
use serde_json::json;
use tower::util::ServiceExt as _;

mod support;
use support::{
    TestApp, body_json, body_text, cookie_for, get, insert_account, insert_role, load_account,
    post_json, router,
};

/// App with an administrator holding every protected action and a plain user.
async fn app_with_accounts() -> (TestApp, i64, i64) {
    let app = TestApp::new().await.seeded().await;
    let role_id = insert_role(&app.context, "Admins", PROTECTED_ACTIONS).await;
    let admin = insert_account(&app.context, "admin", "Admin1", "admin@test.com", Some(role_id)).await;
    let user = insert_account(&app.context, "user", "User1", "user@test.com", None).await;
    app.refresh_authorization().await;
    (app, admin, user)
}

#[tokio::test]
async fn health_returns_ok() {
    let app = TestApp::new().await;
    let response = router(&app).oneshot(get("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn login_sets_the_auth_cookie() {
    let (app, _, _) = app_with_accounts().await;

    let response = router(&app)
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({ "username": "ADMIN", "password": "Admin1", "persistent": true }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("auth="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age=3600"));
}

#[tokio::test]
async fn login_with_wrong_password_lists_the_model_errors() {
    let (app, _, _) = app_with_accounts().await;

    let response = router(&app)
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({ "username": "admin", "password": "nope" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["field"], "");
    assert_eq!(body["errors"][0]["message"], "Incorrect username or password.");
}

#[tokio::test]
async fn logout_expires_the_cookie() {
    let (app, _, user) = app_with_accounts().await;
    let cookie = cookie_for(&app, user);

    let response = router(&app)
        .oneshot(post_json("/auth/logout", Some(&cookie), json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response.headers().get(header::SET_COOKIE).unwrap();
    assert!(set_cookie.to_str().unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn profile_requires_a_valid_cookie() {
    let (app, _, user) = app_with_accounts().await;

    let anonymous = router(&app).oneshot(get("/profile", None)).await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let forged = router(&app)
        .oneshot(get("/profile", Some("auth=forged.value")))
        .await
        .unwrap();
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);

    let cookie = cookie_for(&app, user);
    let response = router(&app).oneshot(get("/profile", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "user");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn profile_edit_checks_the_current_password() {
    let (app, _, user) = app_with_accounts().await;
    let cookie = cookie_for(&app, user);

    let rejected = router(&app)
        .oneshot(post_json(
            "/profile/edit",
            Some(&cookie),
            json!({ "username": "user", "email": "user@test.com", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let accepted = router(&app)
        .oneshot(post_json(
            "/profile/edit",
            Some(&cookie),
            json!({
                "username": "renamed",
                "email": "Renamed@Test.com",
                "password": "User1",
                "new_password": "User2"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::OK);

    let account: Account = load_account(&app.context, user).await.unwrap();
    assert_eq!(account.username, "renamed");
    assert_eq!(account.email, "renamed@test.com");
    assert_eq!(account.passhash, "User2Hashed");
}

#[tokio::test]
async fn administration_is_forbidden_without_permission() {
    let (app, admin, user) = app_with_accounts().await;

    let refused = router(&app)
        .oneshot(get("/administration/accounts", Some(&cookie_for(&app, user))))
        .await
        .unwrap();
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);

    let allowed = router(&app)
        .oneshot(get("/administration/accounts", Some(&cookie_for(&app, admin))))
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(body_json(allowed).await.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn account_grid_shows_only_permitted_links() {
    let app = TestApp::new().await.seeded().await;
    let role_id = insert_role(
        &app.context,
        "Viewers",
        &[
            (Some(ADMINISTRATION), "Accounts", "Index"),
            (Some(ADMINISTRATION), "Accounts", "Details"),
        ],
    )
    .await;
    let viewer = insert_account(&app.context, "viewer", "pass", "v@test.com", Some(role_id)).await;
    app.refresh_authorization().await;

    let response = router(&app)
        .oneshot(get("/administration/accounts/grid", Some(&cookie_for(&app, viewer))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(&format!("href=\"/administration/accounts/details/{viewer}\"")));
    assert!(!html.contains("edit-action-link"));
    assert!(!html.contains("delete-action-link"));
    assert!(html.contains("<th>Username</th>"));
    assert!(html.contains("1/1/2024"));
}

#[tokio::test]
async fn create_account_validates_then_creates() {
    let (app, admin, _) = app_with_accounts().await;
    let cookie = cookie_for(&app, admin);

    let invalid = router(&app)
        .oneshot(post_json(
            "/administration/accounts/create",
            Some(&cookie),
            json!({ "username": "USER", "password": "pass", "email": "new@test.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    let body = body_json(invalid).await;
    assert_eq!(body["errors"][0]["field"], "username");

    let created = router(&app)
        .oneshot(post_json(
            "/administration/accounts/create",
            Some(&cookie),
            json!({ "username": "new", "password": "pass", "email": "New@Test.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let id = body_json(created).await["id"].as_i64().unwrap();

    let details = router(&app)
        .oneshot(get(&format!("/administration/accounts/details/{id}"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(body_json(details).await["email"], "new@test.com");
}

#[tokio::test]
async fn missing_account_is_not_found() {
    let (app, admin, _) = app_with_accounts().await;

    let response = router(&app)
        .oneshot(get(
            "/administration/accounts/details/999",
            Some(&cookie_for(&app, admin)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recover_and_reset_replace_the_password() {
    let (app, _, user) = app_with_accounts().await;

    let recover = router(&app)
        .oneshot(post_json("/auth/recover", None, json!({ "email": "USER@test.com" })))
        .await
        .unwrap();
    assert_eq!(recover.status(), StatusCode::OK);

    let token = load_account(&app.context, user)
        .await
        .unwrap()
        .recovery_token
        .unwrap();

    let reset = router(&app)
        .oneshot(post_json(
            "/auth/reset",
            None,
            json!({ "token": token, "new_password": "Fresh1" }),
        ))
        .await
        .unwrap();
    assert_eq!(reset.status(), StatusCode::OK);
    assert_eq!(
        load_account(&app.context, user).await.unwrap().passhash,
        "Fresh1Hashed"
    );

    let reused = router(&app)
        .oneshot(post_json(
            "/auth/reset",
            None,
            json!({ "token": token, "new_password": "Again1" }),
        ))
        .await
        .unwrap();
    assert_eq!(reused.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn audit_logs_page_through_changes() {
    let (app, admin, user) = app_with_accounts().await;
    let cookie = cookie_for(&app, admin);

    let deleted = router(&app)
        .oneshot(post_json(
            &format!("/administration/accounts/delete/{user}"),
            Some(&cookie),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::OK);

    let response = router(&app)
        .oneshot(get("/administration/auditlogs?page=1&page_size=5", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["page_size"], 5);
    assert_eq!(page["items"][0]["action"], "Deleted");
    assert_eq!(page["items"][0]["account_id"], admin);
    assert_eq!(page["items"][0]["entity_id"], user);
}
