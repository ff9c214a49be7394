use crate::error::{AppError, Result};
use crate::models::permission::PERMISSION_NAME_MAX;
use crate::models::{Job, JobPermission, PermissionLevel, User};
use crate::repository::{PermissionRepository, UserRepository};

/// A permission together with its member ids.
#[derive(Debug, Clone)]
pub struct PermissionMembers {
    pub permission: JobPermission,
    pub users: Vec<i64>,
    pub groups: Vec<i64>,
}

#[derive(Clone)]
pub struct PermissionService {
    permissions: PermissionRepository,
    users: UserRepository,
}

impl PermissionService {
    pub fn new(permissions: PermissionRepository, users: UserRepository) -> Self {
        Self { permissions, users }
    }

    /// Highest level the user holds across all permissions, if any.
    async fn highest_level(&self, user: &User) -> Result<Option<PermissionLevel>> {
        let levels = self.permissions.list_for_user(user.id).await?;
        Ok(levels.into_iter().map(|p| p.permission).max())
    }

    async fn authorized_to(&self, user: &User, needed: PermissionLevel) -> Result<bool> {
        if user.is_superuser {
            return Ok(true);
        }
        Ok(self
            .highest_level(user)
            .await?
            .is_some_and(|level| level.grants(needed)))
    }

    pub async fn authorized_to_write(&self, user: &User) -> Result<bool> {
        self.authorized_to(user, PermissionLevel::Write).await
    }

    pub async fn authorized_to_exec(&self, user: &User) -> Result<bool> {
        self.authorized_to(user, PermissionLevel::Execute).await
    }

    /// Jobs without a permission are reserved to superusers.
    pub async fn has_job_permission(
        &self,
        user: &User,
        job: &Job,
        needed: PermissionLevel,
    ) -> Result<bool> {
        if user.is_superuser {
            return Ok(true);
        }
        let Some(permission_id) = job.permission_id else {
            return Ok(false);
        };

        let held = self.permissions.list_for_user(user.id).await?;
        Ok(held
            .iter()
            .any(|p| p.id == permission_id && p.permission.grants(needed)))
    }

    pub async fn require_job_permission(
        &self,
        user: &User,
        job: &Job,
        needed: PermissionLevel,
    ) -> Result<()> {
        if self.has_job_permission(user, job, needed).await? {
            Ok(())
        } else {
            tracing::debug!(
                "User '{}' denied {} on job {}",
                user.username,
                needed,
                job.job_id
            );
            Err(AppError::Forbidden)
        }
    }

    pub async fn list(&self) -> Result<Vec<PermissionMembers>> {
        let mut result = Vec::new();
        for permission in self.permissions.list().await? {
            result.push(self.with_members(permission).await?);
        }
        Ok(result)
    }

    pub async fn get(&self, id: i64) -> Result<PermissionMembers> {
        let permission = self.permissions.get(id).await?;
        self.with_members(permission).await
    }

    pub async fn exists(&self, id: i64) -> Result<()> {
        self.permissions.get(id).await.map(|_| ())
    }

    pub async fn create(
        &self,
        name: &str,
        level: PermissionLevel,
        user_ids: &[i64],
        group_ids: &[i64],
    ) -> Result<PermissionMembers> {
        let name = Self::validate_name(name)?;
        self.validate_members(user_ids, group_ids).await?;

        let permission = self.permissions.create(name, level).await?;
        self.permissions
            .set_members(permission.id, user_ids, group_ids)
            .await?;
        tracing::info!("Created {}", permission);
        self.get(permission.id).await
    }

    pub async fn update(
        &self,
        id: i64,
        name: &str,
        level: PermissionLevel,
        user_ids: &[i64],
        group_ids: &[i64],
    ) -> Result<PermissionMembers> {
        let name = Self::validate_name(name)?;
        self.validate_members(user_ids, group_ids).await?;

        let permission = self.permissions.update(id, name, level).await?;
        self.permissions
            .set_members(permission.id, user_ids, group_ids)
            .await?;
        self.get(permission.id).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.permissions.delete(id).await
    }

    async fn with_members(&self, permission: JobPermission) -> Result<PermissionMembers> {
        let (users, groups) = self.permissions.members(permission.id).await?;
        Ok(PermissionMembers {
            permission,
            users: users.into_iter().map(|m| m.user_id).collect(),
            groups: groups.into_iter().map(|m| m.group_id).collect(),
        })
    }

    fn validate_name(name: &str) -> Result<&str> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > PERMISSION_NAME_MAX {
            return Err(AppError::InvalidInput(format!(
                "Permission name must be between 1 and {} characters",
                PERMISSION_NAME_MAX
            )));
        }
        Ok(name)
    }

    async fn validate_members(&self, user_ids: &[i64], group_ids: &[i64]) -> Result<()> {
        for user_id in user_ids {
            self.users.get_user(*user_id).await?;
        }
        for group_id in group_ids {
            self.users.get_group(*group_id).await?;
        }
        Ok(())
    }
}
