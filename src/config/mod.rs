pub mod environment;
pub mod hardcoded;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use hardcoded::{
    ENV_KEY_DB, ENV_KEY_DEPLOYMENT, ENV_KEY_SERVE_STATIC, PORT_WEB, SESSION_HOURS_MAX,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    Prod,
    Dev,
}

impl Deployment {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            _ => Self::Prod,
        }
    }

    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Self::Prod => "ansible_webui=info,tower_http=info",
            Self::Dev => "ansible_webui=debug,tower_http=debug,axum=debug",
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub path_play: PathBuf,
    pub path_run: PathBuf,
    pub path_repo: PathBuf,
    pub path_static: PathBuf,
    pub login_redirect: String,
    pub deployment: Deployment,
    pub serve_static: bool,
    pub admin: String,
    #[serde(skip_serializing)]
    pub admin_password: Option<String>,
    pub session_hours: i64,
    pub ansible_playbook: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("path_play", &self.path_play)
            .field("path_run", &self.path_run)
            .field("path_repo", &self.path_repo)
            .field("login_redirect", &self.login_redirect)
            .field("deployment", &self.deployment)
            .field("serve_static", &self.serve_static)
            .field("admin", &self.admin)
            .field("session_hours", &self.session_hours)
            .field("ansible_playbook", &self.ansible_playbook)
            .finish_non_exhaustive()
    }
}

impl Default for Config {
    fn default() -> Self {
        let root = crate::paths::install_root().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_root(&root)
    }
}

impl Config {
    /// Defaults with every path placed under `root`.
    pub fn with_root(root: &Path) -> Self {
        let data = root.join("data");
        Self {
            database_url: format!("sqlite:{}", data.join("aw.db").display()),
            host: "127.0.0.1".to_string(),
            port: PORT_WEB,
            path_play: root.join("play"),
            path_run: data.join("run"),
            path_repo: data.join("repositories"),
            path_static: root.join("static"),
            login_redirect: "/a/".to_string(),
            deployment: Deployment::Prod,
            serve_static: false,
            admin: "ansible".to_string(),
            admin_password: None,
            session_hours: 12,
            ansible_playbook: "ansible-playbook".to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(file_config) = Self::from_conf_file()? {
            config.apply_file(file_config);
        }

        if let Ok(db_url) = std::env::var(ENV_KEY_DB) {
            config.database_url = db_url;
        }
        if let Ok(host) = std::env::var("AW_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("AW_PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("Invalid AW_PORT '{}'", port))?;
        }
        if let Ok(path) = std::env::var("AW_PATH_PLAY") {
            config.path_play = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("AW_PATH_RUN") {
            config.path_run = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("AW_PATH_REPO") {
            config.path_repo = PathBuf::from(path);
        }
        if let Ok(redirect) = std::env::var("AW_LOGIN_REDIRECT") {
            config.login_redirect = redirect;
        }
        if let Ok(deployment) = std::env::var(ENV_KEY_DEPLOYMENT) {
            config.deployment = Deployment::parse(&deployment);
        }
        if let Ok(value) = std::env::var(ENV_KEY_SERVE_STATIC) {
            config.serve_static = is_truthy(&value);
        }
        if let Ok(admin) = std::env::var("AW_ADMIN") {
            config.admin = admin;
        }
        if let Ok(password) = std::env::var("AW_ADMIN_PASS") {
            config.admin_password = Some(password);
        }
        if let Ok(hours) = std::env::var("AW_SESSION_HOURS") {
            config.session_hours = hours
                .parse()
                .with_context(|| format!("Invalid AW_SESSION_HOURS '{}'", hours))?;
        }
        if let Ok(bin) = std::env::var("AW_ANSIBLE_PLAYBOOK") {
            config.ansible_playbook = bin;
        }

        config.normalize_database_url()?;
        config.validate()?;
        Ok(config)
    }

    fn from_conf_file() -> Result<Option<FileConfig>> {
        let path = crate::paths::conf_dir()?.join("config.json");
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file_config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(Some(file_config))
    }

    fn apply_file(&mut self, file_config: FileConfig) {
        if let Some(database_url) = file_config.database_url {
            self.database_url = database_url;
        }
        if let Some(host) = file_config.host {
            self.host = host;
        }
        if let Some(port) = file_config.port {
            self.port = port;
        }
        if let Some(path) = file_config.path_play {
            self.path_play = PathBuf::from(path);
        }
        if let Some(path) = file_config.path_run {
            self.path_run = PathBuf::from(path);
        }
        if let Some(path) = file_config.path_repo {
            self.path_repo = PathBuf::from(path);
        }
        if let Some(redirect) = file_config.login_redirect {
            self.login_redirect = redirect;
        }
        if let Some(deployment) = file_config.deployment {
            self.deployment = deployment;
        }
        if let Some(serve_static) = file_config.serve_static {
            self.serve_static = serve_static;
        }
        if let Some(admin) = file_config.admin {
            self.admin = admin;
        }
        if let Some(hours) = file_config.session_hours {
            self.session_hours = hours;
        }
        if let Some(bin) = file_config.ansible_playbook {
            self.ansible_playbook = bin;
        }
    }

    fn normalize_database_url(&mut self) -> Result<()> {
        let Some(path_str) = self.database_url.strip_prefix("sqlite:") else {
            return Ok(());
        };
        if path_str.starts_with(":memory:") {
            return Ok(());
        }

        let path = Path::new(path_str);
        if path.is_absolute() {
            return Ok(());
        }

        if path
            .components()
            .any(|component| matches!(component, std::path::Component::ParentDir))
        {
            anyhow::bail!("SQLite database path cannot contain '..'");
        }

        let root = crate::paths::install_root()?;
        self.database_url = format!("sqlite:{}", root.join(path).display());
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !self.login_redirect.starts_with('/') {
            anyhow::bail!("login_redirect must be a local path starting with '/'");
        }
        if !(1..=SESSION_HOURS_MAX).contains(&self.session_hours) {
            anyhow::bail!("session_hours must be between 1 and {}", SESSION_HOURS_MAX);
        }
        if self.ansible_playbook.trim().is_empty() {
            anyhow::bail!("ansible_playbook cannot be empty");
        }
        Ok(())
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    database_url: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    path_play: Option<String>,
    path_run: Option<String>,
    path_repo: Option<String>,
    login_redirect: Option<String>,
    deployment: Option<Deployment>,
    serve_static: Option<bool>,
    admin: Option<String>,
    session_hours: Option<i64>,
    ansible_playbook: Option<String>,
}
