use crate::error::{AppError, Result};
use crate::models::{Group, Session, User};
use crate::repository::DbPool;
use chrono::{DateTime, Utc};

#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        is_superuser: bool,
    ) -> Result<User> {
        if self.get_by_username(username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "User '{}' already exists",
                username
            )));
        }

        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, is_superuser, created) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(password_hash)
        .bind(is_superuser)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.get_user(result.last_insert_rowid()).await
    }

    pub async fn get_user(&self, id: i64) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))?;

        Ok(user)
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY username")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    pub async fn count_users(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::UserNotFound(id.to_string()));
        }

        Ok(())
    }

    pub async fn create_group(&self, name: &str) -> Result<Group> {
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM groups WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        if exists > 0 {
            return Err(AppError::Conflict(format!("Group '{}' already exists", name)));
        }

        let result = sqlx::query("INSERT INTO groups (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?;

        self.get_group(result.last_insert_rowid()).await
    }

    pub async fn get_group(&self, id: i64) -> Result<Group> {
        let group = sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::GroupNotFound(id.to_string()))?;

        Ok(group)
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>("SELECT * FROM groups ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(groups)
    }

    pub async fn delete_group(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM groups WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::GroupNotFound(id.to_string()));
        }

        Ok(())
    }

    pub async fn set_group_members(&self, group_id: i64, user_ids: &[i64]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM user_groups WHERE group_id = ?")
            .bind(group_id)
            .execute(&mut *tx)
            .await?;

        for user_id in user_ids {
            sqlx::query("INSERT OR IGNORE INTO user_groups (user_id, group_id) VALUES (?, ?)")
                .bind(user_id)
                .bind(group_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn group_members(&self, group_id: i64) -> Result<Vec<i64>> {
        let members = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM user_groups WHERE group_id = ? ORDER BY user_id",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    pub async fn create_session(
        &self,
        token: &str,
        user_id: i64,
        expires: DateTime<Utc>,
    ) -> Result<Session> {
        let session = Session {
            token: token.to_string(),
            user_id,
            created: Utc::now(),
            expires,
        };

        sqlx::query("INSERT INTO sessions (token, user_id, created, expires) VALUES (?, ?, ?, ?)")
            .bind(&session.token)
            .bind(session.user_id)
            .bind(session.created)
            .bind(session.expires)
            .execute(&self.pool)
            .await?;

        Ok(session)
    }

    pub async fn get_session(&self, token: &str) -> Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        Ok(session)
    }

    pub async fn delete_session(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete_expired_sessions(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
