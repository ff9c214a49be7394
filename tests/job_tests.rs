mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, spawn_app};
use serde_json::{Value, json};

fn job_body(job_id: i64, permission: Option<i64>) -> Value {
    json!({
        "job_id": job_id,
        "name": format!("deploy {}", job_id),
        "inventory": "hosts.yml",
        "playbook": "site.yml",
        "schedule": "0 3 * * 1-5",
        "permission": permission,
    })
}

async fn create_permission(app: &TestApp, admin: &str, level: &str, users: &[i64]) -> i64 {
    let response = app
        .send(
            Method::POST,
            "/api/permission",
            Some(admin),
            Some(json!({ "name": format!("{} access", level), "permission": level, "users": users })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
    response.json()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_job_lifecycle() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    let response = app
        .send(Method::POST, "/api/job", Some(&admin), Some(job_body(1, None)))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
    let job = response.json();
    assert_eq!(job["job_id"], 1);
    assert_eq!(job["schedule"], "0 3 * * 1-5");

    let response = app.get("/api/job", Some(&admin)).await;
    assert_eq!(response.json()["data"].as_array().unwrap().len(), 1);

    let mut update = job_body(1, None);
    update["name"] = json!("nightly");
    update["schedule"] = json!("");
    let response = app
        .send(Method::PUT, "/api/job/1", Some(&admin), Some(update))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text());
    assert_eq!(response.json()["name"], "nightly");

    let response = app.get("/api/job/1", Some(&admin)).await;
    assert_eq!(response.json()["schedule"], "");

    let response = app.send(Method::DELETE, "/api/job/1", Some(&admin), None).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.get("/api/job/1", Some(&admin)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_job_id_conflicts() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    app.send(Method::POST, "/api/job", Some(&admin), Some(job_body(7, None)))
        .await;
    let response = app
        .send(Method::POST, "/api/job", Some(&admin), Some(job_body(7, None)))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_job_validation() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    let mut body = job_body(2, None);
    body["schedule"] = json!("every day");
    let response = app.send(Method::POST, "/api/job", Some(&admin), Some(body)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let mut body = job_body(2, None);
    body["name"] = json!("x".repeat(151));
    let response = app.send(Method::POST, "/api/job", Some(&admin), Some(body)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let mut body = job_body(2, None);
    body["playbook"] = json!("../outside.yml");
    let response = app.send(Method::POST, "/api/job", Some(&admin), Some(body)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .send(Method::POST, "/api/job", Some(&admin), Some(job_body(2, Some(99))))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let mut body = job_body(2, None);
    body.as_object_mut().unwrap().remove("job_id");
    let response = app.send(Method::POST, "/api/job", Some(&admin), Some(body)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_job_without_permission_is_superuser_only() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;
    let (_, cookie) = app.user("viewer").await;

    app.send(Method::POST, "/api/job", Some(&admin), Some(job_body(1, None)))
        .await;

    let response = app.get("/api/job", Some(&cookie)).await;
    assert_eq!(response.json()["data"], json!([]));

    let response = app.get("/api/job/1", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.json(), json!({ "msg": "Not permitted" }));

    let response = app
        .send(Method::POST, "/api/job", Some(&cookie), Some(job_body(5, None)))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_read_permission_limits_actions() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;
    let (user_id, cookie) = app.user("viewer").await;

    let permission = create_permission(&app, &admin, "read", &[user_id]).await;
    app.send(
        Method::POST,
        "/api/job",
        Some(&admin),
        Some(job_body(1, Some(permission))),
    )
    .await;

    let response = app.get("/api/job", Some(&cookie)).await;
    assert_eq!(response.json()["data"].as_array().unwrap().len(), 1);
    assert_eq!(app.get("/api/job/1", Some(&cookie)).await.status, StatusCode::OK);
    assert_eq!(
        app.get("/api/job/1/execution", Some(&cookie)).await.status,
        StatusCode::OK
    );

    let response = app
        .send(Method::POST, "/api/job/1/execute", Some(&cookie), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .send(Method::PUT, "/api/job/1", Some(&cookie), Some(job_body(1, Some(permission))))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.send(Method::DELETE, "/api/job/1", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_write_permission_allows_update_but_not_delete() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;
    let (user_id, cookie) = app.user("editor").await;

    let permission = create_permission(&app, &admin, "write", &[user_id]).await;
    app.send(
        Method::POST,
        "/api/job",
        Some(&admin),
        Some(job_body(1, Some(permission))),
    )
    .await;

    let response = app
        .send(Method::PUT, "/api/job/1", Some(&cookie), Some(job_body(1, Some(permission))))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.send(Method::DELETE, "/api/job/1", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // write access also allows creating jobs
    let response = app
        .send(Method::POST, "/api/job", Some(&cookie), Some(job_body(2, Some(permission))))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_permission_admin_api() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;
    let (user_id, _) = app.user("member").await;

    let id = create_permission(&app, &admin, "execute", &[user_id]).await;

    let response = app.get(&format!("/api/permission/{}", id), Some(&admin)).await;
    let permission = response.json();
    assert_eq!(permission["permission"], "execute");
    assert_eq!(permission["users"], json!([user_id]));

    let response = app
        .send(
            Method::PUT,
            &format!("/api/permission/{}", id),
            Some(&admin),
            Some(json!({ "name": "renamed", "permission": "full", "users": [] })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["users"], json!([]));

    let response = app
        .send(
            Method::POST,
            "/api/permission",
            Some(&admin),
            Some(json!({ "name": "ghosts", "permission": "read", "users": [999] })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .send(Method::DELETE, &format!("/api/permission/{}", id), Some(&admin), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let response = app.get(&format!("/api/permission/{}", id), Some(&admin)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
