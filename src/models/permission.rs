use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PERMISSION_NAME_MAX: usize = 100;

/// Levels grant everything below them: read < execute < write < full.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum PermissionLevel {
    Read = 5,
    Execute = 10,
    Write = 15,
    Full = 20,
}

impl PermissionLevel {
    pub fn grants(&self, needed: PermissionLevel) -> bool {
        *self >= needed
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Execute => "execute",
            Self::Write => "write",
            Self::Full => "full",
        }
    }
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobPermission {
    pub id: i64,
    pub name: String,
    pub permission: PermissionLevel,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl std::fmt::Display for JobPermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Permission '{}' - {}", self.name, self.permission)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobPermissionMemberUser {
    pub id: i64,
    pub user_id: i64,
    pub permission_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobPermissionMemberGroup {
    pub id: i64,
    pub group_id: i64,
    pub permission_id: i64,
}
