use crate::models::{Group, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_superuser: bool,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub is_superuser: bool,
    pub created: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_superuser: user.is_superuser,
            created: user.created.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UsersListResponse {
    pub data: Vec<UserResponse>,
}

#[derive(Debug, Deserialize)]
pub struct GroupRequest {
    pub name: String,
    #[serde(default)]
    pub users: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub id: i64,
    pub name: String,
    pub users: Vec<i64>,
}

impl GroupResponse {
    pub fn new(group: Group, users: Vec<i64>) -> Self {
        Self {
            id: group.id,
            name: group.name,
            users,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupsListResponse {
    pub data: Vec<GroupResponse>,
}
