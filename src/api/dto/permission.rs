use crate::models::PermissionLevel;
use crate::services::PermissionMembers;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PermissionRequest {
    pub name: String,
    pub permission: PermissionLevel,
    #[serde(default)]
    pub users: Vec<i64>,
    #[serde(default)]
    pub groups: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    pub id: i64,
    pub name: String,
    pub permission: PermissionLevel,
    pub users: Vec<i64>,
    pub groups: Vec<i64>,
}

impl From<PermissionMembers> for PermissionResponse {
    fn from(members: PermissionMembers) -> Self {
        Self {
            id: members.permission.id,
            name: members.permission.name,
            permission: members.permission.permission,
            users: members.users,
            groups: members.groups,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PermissionsListResponse {
    pub data: Vec<PermissionResponse>,
}
