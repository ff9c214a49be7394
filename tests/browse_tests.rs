mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, spawn_app};
use serde_json::{Value, json};

async fn create_repository(app: &TestApp, cookie: &str, body: Value) -> i64 {
    let response = app
        .send(Method::POST, "/api/repository", Some(cookie), Some(body))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
    response.json()["id"].as_i64().unwrap()
}

fn populate_play(app: &TestApp) {
    let play = &app.state.config.path_play;
    std::fs::write(play.join("site.yml"), "- hosts: all\n").unwrap();
    std::fs::write(play.join("hosts.yml"), "all:\n").unwrap();
    std::fs::create_dir_all(play.join("roles/common")).unwrap();
    std::fs::create_dir_all(play.join("inventories")).unwrap();
}

#[tokio::test]
async fn test_browse_play_root() {
    let app = spawn_app().await;
    populate_play(&app);
    let cookie = app.login_admin().await;

    let response = app.get("/api/fs/browse", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({ "files": ["hosts.yml", "site.yml"], "directories": ["inventories", "roles"] })
    );

    let response = app.get("/api/fs/browse?base=/roles", Some(&cookie)).await;
    assert_eq!(response.json(), json!({ "files": [], "directories": ["common"] }));

    let response = app.get("/api/fs/browse?repository=0&base=roles", Some(&cookie)).await;
    assert_eq!(response.json()["directories"], json!(["common"]));
}

#[tokio::test]
async fn test_browse_rejects_traversal() {
    let app = spawn_app().await;
    populate_play(&app);
    let cookie = app.login_admin().await;

    let response = app.get("/api/fs/browse?base=../", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.json(), json!({ "msg": "Traversal not allowed" }));

    let response = app.get("/api/fs/browse?base=roles/..", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_browse_missing_directory() {
    let app = spawn_app().await;
    let cookie = app.login_admin().await;

    let response = app.get("/api/fs/browse?base=nothing", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json(), json!({ "msg": "Directory does not exist" }));
}

#[tokio::test]
async fn test_browse_invalid_repository_selector() {
    let app = spawn_app().await;
    let cookie = app.login_admin().await;

    let response = app.get("/api/fs/browse?repository=abc", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json(), json!({ "msg": "Invalid browse-selector provided" }));

    let response = app.get("/api/fs/browse?repository=42", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json(), json!({ "msg": "Provided repository does not exist" }));
}

#[tokio::test]
async fn test_browse_static_repository() {
    let app = spawn_app().await;
    let cookie = app.login_admin().await;

    let static_root = app.root.path().join("static-repo");
    std::fs::create_dir_all(static_root.join("group_vars")).unwrap();
    std::fs::write(static_root.join("deploy.yml"), "").unwrap();

    let id = create_repository(
        &app,
        &cookie,
        json!({ "name": "local", "rtype": "static", "static_path": static_root.to_string_lossy() }),
    )
    .await;

    let response = app
        .get(&format!("/api/fs/browse?repository={}", id), Some(&cookie))
        .await;
    assert_eq!(
        response.json(),
        json!({ "files": ["deploy.yml"], "directories": ["group_vars"] })
    );
}

#[tokio::test]
async fn test_browse_missing_base_directory() {
    let app = spawn_app().await;
    let cookie = app.login_admin().await;

    let id = create_repository(
        &app,
        &cookie,
        json!({
            "name": "gone",
            "rtype": "static",
            "static_path": app.root.path().join("gone").to_string_lossy(),
        }),
    )
    .await;

    let response = app
        .get(&format!("/api/fs/browse?repository={}", id), Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json(), json!({ "msg": "Base directory does not exist" }));
}

#[tokio::test]
async fn test_browse_isolated_git_repository() {
    let app = spawn_app().await;
    let cookie = app.login_admin().await;

    let id = create_repository(
        &app,
        &cookie,
        json!({
            "name": "isolated",
            "rtype": "git",
            "git_origin": "https://git.example.com/infra.git",
            "git_isolate": true,
        }),
    )
    .await;

    let response = app
        .get(&format!("/api/fs/browse?repository={}&base=../../", id), Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "files": [".*"], "directories": [".*"] }));
}

#[tokio::test]
async fn test_browse_git_working_copy_with_playbook_base() {
    let app = spawn_app().await;
    let cookie = app.login_admin().await;

    let base = app.state.config.path_repo.join("infra").join("ansible");
    std::fs::create_dir_all(&base).unwrap();
    std::fs::write(base.join("site.yml"), "").unwrap();

    let id = create_repository(
        &app,
        &cookie,
        json!({
            "name": "infra",
            "rtype": "git",
            "git_origin": "https://git.example.com/infra.git",
            "git_playbook_base": "ansible",
        }),
    )
    .await;

    let response = app
        .get(&format!("/api/fs/browse?repository={}", id), Some(&cookie))
        .await;
    assert_eq!(response.json(), json!({ "files": ["site.yml"], "directories": [] }));
}

#[tokio::test]
async fn test_browse_listing_is_cached() {
    let app = spawn_app().await;
    populate_play(&app);
    let cookie = app.login_admin().await;

    app.get("/api/fs/browse", Some(&cookie)).await;
    std::fs::write(app.state.config.path_play.join("late.yml"), "").unwrap();

    let response = app.get("/api/fs/browse", Some(&cookie)).await;
    let files = response.json()["files"].clone();
    assert_eq!(files, json!(["hosts.yml", "site.yml"]));
}
