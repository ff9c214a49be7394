mod common;

use axum::http::StatusCode;
use common::spawn_app;
use serde_json::json;

#[tokio::test]
async fn test_environment_page_renders() {
    let app = spawn_app().await;
    let cookie = app.login_admin().await;

    let response = app.get("/ui/system/environment", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    let html = response.text();
    assert!(html.contains("<h1>System environment</h1>"));
    assert!(html.contains("<h2>Ansible collections</h2>"));
    assert!(html.contains("<h2>Python modules</h2>"));
    assert!(html.contains(env!("CARGO_PKG_VERSION")));
}

#[tokio::test]
async fn test_environment_json() {
    let app = spawn_app().await;
    let cookie = app.login_admin().await;

    let response = app.get("/api/system/environment", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    let environment = response.json();
    for key in [
        "env_system",
        "env_python_modules",
        "env_ansible_config",
        "env_ansible_collections",
    ] {
        assert!(environment.get(key).is_some(), "missing {}", key);
    }
    assert!(environment["env_python_modules"].is_object());
    assert!(environment["env_ansible_config"].is_object());
    assert!(environment["env_ansible_collections"].is_object());
    assert_eq!(
        environment["env_system"]["env_webui"],
        json!(env!("CARGO_PKG_VERSION"))
    );
}

#[tokio::test]
async fn test_environment_needs_session() {
    let app = spawn_app().await;

    let response = app.get("/api/system/environment", None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.get("/ui/system/environment", None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location(),
        "/a/login/?next=%2Fui%2Fsystem%2Fenvironment"
    );
}
