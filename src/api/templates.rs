use crate::config::Config;
use crate::error::Result;
use crate::models::User;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tera::{Context, Tera};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("fallback.html", include_str!("../../templates/fallback.html")),
    ("login.html", include_str!("../../templates/login.html")),
    (
        "system/environment.html",
        include_str!("../../templates/system/environment.html"),
    ),
    (
        "system/config.html",
        include_str!("../../templates/system/config.html"),
    ),
];

pub fn load() -> std::result::Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES.iter().copied())?;
    Ok(tera)
}

/// Variables shared by every page.
pub fn page_context(config: &Config, user: Option<&User>) -> Context {
    let mut context = Context::new();
    context.insert("serve_static", &config.serve_static);
    context.insert("username", &user.map(|u| u.username.as_str()));
    context
}

pub fn render(tera: &Tera, name: &str, context: &Context, status: StatusCode) -> Result<Response> {
    let body = tera.render(name, context)?;
    Ok((status, Html(body)).into_response())
}
