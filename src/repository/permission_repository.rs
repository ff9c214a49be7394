use crate::error::{AppError, Result};
use crate::models::permission::{JobPermissionMemberGroup, JobPermissionMemberUser};
use crate::models::{JobPermission, PermissionLevel};
use crate::repository::DbPool;
use chrono::Utc;

const USER_PERMISSIONS: &str = r#"
    SELECT * FROM job_permissions WHERE id IN (
        SELECT permission_id FROM job_permission_member_users WHERE user_id = ?1
        UNION
        SELECT mg.permission_id FROM job_permission_member_groups mg
        JOIN user_groups ug ON ug.group_id = mg.group_id
        WHERE ug.user_id = ?1
    )
"#;

#[derive(Clone)]
pub struct PermissionRepository {
    pool: DbPool,
}

impl PermissionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<JobPermission>> {
        let permissions =
            sqlx::query_as::<_, JobPermission>("SELECT * FROM job_permissions ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(permissions)
    }

    pub async fn get(&self, id: i64) -> Result<JobPermission> {
        let permission =
            sqlx::query_as::<_, JobPermission>("SELECT * FROM job_permissions WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(AppError::PermissionNotFound(id))?;

        Ok(permission)
    }

    pub async fn create(&self, name: &str, level: PermissionLevel) -> Result<JobPermission> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO job_permissions (name, permission, created, updated) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(level as i32)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(result.last_insert_rowid()).await
    }

    pub async fn update(&self, id: i64, name: &str, level: PermissionLevel) -> Result<JobPermission> {
        let result =
            sqlx::query("UPDATE job_permissions SET name = ?, permission = ?, updated = ? WHERE id = ?")
                .bind(name)
                .bind(level as i32)
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::PermissionNotFound(id));
        }

        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM job_permissions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::PermissionNotFound(id));
        }

        Ok(())
    }

    /// Replaces the user and group memberships of a permission.
    pub async fn set_members(&self, id: i64, user_ids: &[i64], group_ids: &[i64]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM job_permission_member_users WHERE permission_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM job_permission_member_groups WHERE permission_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for user_id in user_ids {
            sqlx::query(
                "INSERT OR IGNORE INTO job_permission_member_users (user_id, permission_id) VALUES (?, ?)",
            )
            .bind(user_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }
        for group_id in group_ids {
            sqlx::query(
                "INSERT OR IGNORE INTO job_permission_member_groups (group_id, permission_id) VALUES (?, ?)",
            )
            .bind(group_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn members(
        &self,
        id: i64,
    ) -> Result<(Vec<JobPermissionMemberUser>, Vec<JobPermissionMemberGroup>)> {
        let users = sqlx::query_as::<_, JobPermissionMemberUser>(
            "SELECT * FROM job_permission_member_users WHERE permission_id = ? ORDER BY user_id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        let groups = sqlx::query_as::<_, JobPermissionMemberGroup>(
            "SELECT * FROM job_permission_member_groups WHERE permission_id = ? ORDER BY group_id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok((users, groups))
    }

    /// Permissions a user holds directly or through one of their groups.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<JobPermission>> {
        let permissions = sqlx::query_as::<_, JobPermission>(USER_PERMISSIONS)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(permissions)
    }
}
