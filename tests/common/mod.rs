#![allow(dead_code)]

use ansible_webui::api::{AppState, create_router};
use ansible_webui::config::Config;
use ansible_webui::repository::establish_connection;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN: &str = "ansible";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub root: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    pub fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Builds the app on a fresh install root; `customize` may adjust the config first.
pub async fn spawn_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let root = tempfile::tempdir().unwrap();
    let mut config = Config::with_root(root.path());
    config.admin_password = Some(ADMIN_PASSWORD.to_string());
    customize(&mut config);

    std::fs::create_dir_all(root.path().join("data")).unwrap();
    std::fs::create_dir_all(&config.path_play).unwrap();
    std::fs::create_dir_all(&config.path_run).unwrap();

    let pool = establish_connection(&config.database_url).await.unwrap();
    let state = AppState::new(config, pool).unwrap();
    state.auth_service.ensure_admin(&state.config).await.unwrap();

    TestApp {
        app: create_router(state.clone()),
        state,
        root,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, cookie, None).await
    }

    pub async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }

    pub async fn login_form(&self, username: &str, password: &str, next: Option<&str>) -> TestResponse {
        let mut form = format!("username={}&password={}", username, password);
        if let Some(next) = next {
            form.push_str(&format!("&next={}", next));
        }
        let request = Request::builder()
            .method(Method::POST)
            .uri("/a/login/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        self.dispatch(request).await
    }

    /// Logs in and returns the `Cookie` header value for the session.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self.login_form(username, password, None).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        let set_cookie = response
            .headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    pub async fn login_admin(&self) -> String {
        self.login(ADMIN, ADMIN_PASSWORD).await
    }

    /// Creates a regular user and returns its id and session cookie.
    pub async fn user(&self, username: &str) -> (i64, String) {
        let user = self
            .state
            .auth_service
            .create_user(username, "user-password", false)
            .await
            .unwrap();
        let cookie = self.login(username, "user-password").await;
        (user.id, cookie)
    }
}
