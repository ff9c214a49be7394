use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub rtype: RepositoryKind,
    pub static_path: Option<String>,
    pub git_origin: Option<String>,
    pub git_branch: Option<String>,
    pub git_isolate: bool,
    pub git_playbook_base: Option<String>,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum RepositoryKind {
    Static = 0,
    Git = 1,
}

impl Repository {
    pub fn rtype_name(&self) -> &'static str {
        match self.rtype {
            RepositoryKind::Static => "Static",
            RepositoryKind::Git => "Git",
        }
    }
}
