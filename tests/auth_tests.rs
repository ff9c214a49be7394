mod common;

use axum::http::{Method, StatusCode, header};
use common::{ADMIN, spawn_app};
use serde_json::json;

#[tokio::test]
async fn test_health_needs_no_session() {
    let app = spawn_app().await;
    let response = app.get("/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_anonymous_ui_redirects_to_login() {
    let app = spawn_app().await;

    let response = app.get("/a/", None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/a/login/?next=%2Fa%2F");

    let response = app.get("/a/jobs/1", None).await;
    assert_eq!(response.location(), "/a/login/?next=%2Fa%2Fjobs%2F1");

    let response = app.get("/ui/system/config", None).await;
    assert_eq!(response.location(), "/a/login/?next=%2Fui%2Fsystem%2Fconfig");
}

#[tokio::test]
async fn test_anonymous_ui_redirects_for_any_method() {
    let app = spawn_app().await;

    let response = app.send(Method::DELETE, "/a/x", None, None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/a/login/?next=%2Fa%2Fx");

    let response = app.send(Method::PATCH, "/a/", None, None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_anonymous_api_is_forbidden() {
    let app = spawn_app().await;
    let response = app.get("/api/job", None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.json(), json!({ "msg": "Authentication required" }));
}

#[tokio::test]
async fn test_login_page_renders() {
    let app = spawn_app().await;
    let response = app.get("/a/login/?next=/a/jobs", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let html = response.text();
    assert!(html.contains("<form method=\"post\" action=\"/a/login/\">"));
    assert!(html.contains("name=\"next\""));
    assert!(html.contains("jobs"));
}

#[tokio::test]
async fn test_bad_credentials_rerender_login() {
    let app = spawn_app().await;
    let response = app.login_form(ADMIN, "wrong-password", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.headers.get(header::SET_COOKIE).is_none());
    assert!(response.text().contains("Invalid username or password"));

    let response = app.login_form("nobody", "whatever-pass", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_redirects_to_local_next_only() {
    let app = spawn_app().await;

    let response = app.login_form(ADMIN, common::ADMIN_PASSWORD, Some("/a/jobs")).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/a/jobs");

    let response = app
        .login_form(ADMIN, common::ADMIN_PASSWORD, Some("//evil.example"))
        .await;
    assert_eq!(response.location(), "/a/");

    let response = app.login_form(ADMIN, common::ADMIN_PASSWORD, None).await;
    assert_eq!(response.location(), "/a/");
}

#[tokio::test]
async fn test_ui_methods_for_superuser() {
    let app = spawn_app().await;
    let cookie = app.login_admin().await;

    let response = app.get("/a/", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text().contains("OK - read"));

    let response = app.send(Method::POST, "/a/", Some(&cookie), None).await;
    assert!(response.text().contains("OK - write"));

    let response = app.send(Method::PUT, "/a/x", Some(&cookie), None).await;
    assert!(response.text().contains("OK - exec"));

    let response = app.send(Method::DELETE, "/a/", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_ui_write_and_exec_need_permissions() {
    let app = spawn_app().await;
    let (user_id, cookie) = app.user("operator").await;

    let response = app.get("/a/", Some(&cookie)).await;
    assert!(response.text().contains("OK - read"));

    let response = app.send(Method::POST, "/a/", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/a/login/?next=%2Fa%2F");

    // execute does not imply write
    let admin = app.login_admin().await;
    let response = app
        .send(
            Method::POST,
            "/api/permission",
            Some(&admin),
            Some(json!({ "name": "runners", "permission": "execute", "users": [user_id] })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app.send(Method::PUT, "/a/", Some(&cookie), None).await;
    assert!(response.text().contains("OK - exec"));
    let response = app.send(Method::POST, "/a/", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_group_membership_grants_write() {
    let app = spawn_app().await;
    let (user_id, cookie) = app.user("editor").await;
    let admin = app.login_admin().await;

    let response = app
        .send(
            Method::POST,
            "/api/group",
            Some(&admin),
            Some(json!({ "name": "editors", "users": [user_id] })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let group_id = response.json()["id"].as_i64().unwrap();

    app.send(
        Method::POST,
        "/api/permission",
        Some(&admin),
        Some(json!({ "name": "edit", "permission": "write", "groups": [group_id] })),
    )
    .await;

    let response = app.send(Method::POST, "/a/", Some(&cookie), None).await;
    assert!(response.text().contains("OK - write"));
    let response = app.send(Method::PUT, "/a/", Some(&cookie), None).await;
    assert!(response.text().contains("OK - exec"));
}

#[tokio::test]
async fn test_catchall_redirects() {
    let app = spawn_app().await;

    let response = app.get("/does/not/exist", None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/a/login/");

    let cookie = app.login_admin().await;
    let response = app.get("/does/not/exist", Some(&cookie)).await;
    assert_eq!(response.location(), "/a/");
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = spawn_app().await;
    let cookie = app.login_admin().await;
    assert_eq!(app.get("/api/job", Some(&cookie)).await.status, StatusCode::OK);

    let response = app.get("/o/", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/a/login/");
    let cleared = response.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));

    let response = app.get("/api/job", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_api_needs_superuser() {
    let app = spawn_app().await;
    let (_, cookie) = app.user("plain").await;

    for uri in ["/api/user", "/api/group", "/api/permission", "/api/repository"] {
        let response = app.get(uri, Some(&cookie)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{}", uri);
        assert_eq!(response.json(), json!({ "msg": "Not permitted" }));
    }

    let admin = app.login_admin().await;
    let response = app.get("/api/user", Some(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);
    let users = response.json()["data"].as_array().unwrap().len();
    assert_eq!(users, 2);
}

#[tokio::test]
async fn test_config_page_masks_secrets() {
    let app = spawn_app().await;
    let cookie = app.login_admin().await;
    let response = app.get("/ui/system/config", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    let html = response.text();
    assert!(html.contains("AW_ADMIN_PASS"));
    assert!(html.contains("********"));
    assert!(!html.contains(common::ADMIN_PASSWORD));
}
