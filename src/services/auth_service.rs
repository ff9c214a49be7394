use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Group, Session, User};
use crate::repository::UserRepository;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use uuid::Uuid;

const USERNAME_MAX: usize = 150;
const PASSWORD_MIN: usize = 8;

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    session_hours: i64,
}

impl AuthService {
    pub fn new(users: UserRepository, session_hours: i64) -> Self {
        Self {
            users,
            session_hours,
        }
    }

    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::PasswordHash(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    pub fn verify_password(user: &User, password: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&user.password_hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let Some(user) = self.users.get_by_username(username.trim()).await? else {
            return Err(AppError::InvalidCredentials);
        };
        if !Self::verify_password(&user, password) {
            tracing::info!("Failed login for user '{}'", user.username);
            return Err(AppError::InvalidCredentials);
        }

        let token = Uuid::new_v4().simple().to_string();
        let expires = Utc::now() + Duration::hours(self.session_hours);
        let session = self.users.create_session(&token, user.id, expires).await?;
        tracing::info!("User '{}' logged in", user.username);
        Ok(session)
    }

    pub async fn logout(&self, token: &str) -> Result<()> {
        self.users.delete_session(token).await
    }

    /// Resolves a session token to its user; expired sessions are dropped.
    pub async fn user_for_session(&self, token: &str) -> Result<Option<User>> {
        let Some(session) = self.users.get_session(token).await? else {
            return Ok(None);
        };
        if session.is_expired() {
            self.users.delete_session(token).await?;
            return Ok(None);
        }

        match self.users.get_user(session.user_id).await {
            Ok(user) => Ok(Some(user)),
            Err(AppError::UserNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        is_superuser: bool,
    ) -> Result<User> {
        let username = username.trim();
        if username.is_empty() || username.chars().count() > USERNAME_MAX {
            return Err(AppError::InvalidInput(format!(
                "Username must be between 1 and {} characters",
                USERNAME_MAX
            )));
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(AppError::InvalidInput(format!(
                "Password must have at least {} characters",
                PASSWORD_MIN
            )));
        }

        let hash = Self::hash_password(password)?;
        self.users.create_user(username, &hash, is_superuser).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.users.list_users().await
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        self.users.delete_user(id).await
    }

    pub async fn create_group(&self, name: &str, user_ids: &[i64]) -> Result<Group> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("Group name cannot be empty".to_string()));
        }
        for user_id in user_ids {
            self.users.get_user(*user_id).await?;
        }

        let group = self.users.create_group(name).await?;
        self.users.set_group_members(group.id, user_ids).await?;
        Ok(group)
    }

    pub async fn list_groups(&self) -> Result<Vec<(Group, Vec<i64>)>> {
        let mut groups = Vec::new();
        for group in self.users.list_groups().await? {
            let members = self.users.group_members(group.id).await?;
            groups.push((group, members));
        }
        Ok(groups)
    }

    pub async fn delete_group(&self, id: i64) -> Result<()> {
        self.users.delete_group(id).await
    }

    /// Creates the initial superuser when the database has no users yet.
    pub async fn ensure_admin(&self, config: &Config) -> Result<Option<User>> {
        if self.users.count_users().await? > 0 {
            return Ok(None);
        }

        let password = match &config.admin_password {
            Some(password) => password.clone(),
            None => {
                let generated = Uuid::new_v4().simple().to_string();
                tracing::warn!(
                    "No AW_ADMIN_PASS provided, generated password for '{}': {}",
                    config.admin,
                    generated
                );
                generated
            }
        };

        let user = self.create_user(&config.admin, &password, true).await?;
        tracing::info!("Created initial admin user '{}'", user.username);
        Ok(Some(user))
    }

    pub async fn purge_expired_sessions(&self) -> Result<u64> {
        let removed = self.users.delete_expired_sessions().await?;
        if removed > 0 {
            tracing::debug!("Removed {} expired sessions", removed);
        }
        Ok(removed)
    }
}
