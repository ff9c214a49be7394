use crate::error::{AppError, Result};
use crate::models::job::{JOB_NAME_MAX, JOB_PATH_MAX, JOB_SCHEDULE_MAX};
use crate::models::{Job, PermissionLevel, User};
use crate::repository::{JobRepository, NewJob};
use crate::services::PermissionService;
use crate::services::scheduler::parse_schedule;
use std::path::{Component, Path};

#[derive(Clone)]
pub struct JobService {
    jobs: JobRepository,
    permissions: PermissionService,
}

impl JobService {
    pub fn new(jobs: JobRepository, permissions: PermissionService) -> Self {
        Self { jobs, permissions }
    }

    /// Jobs the user is allowed to read.
    pub async fn list_jobs(&self, user: &User) -> Result<Vec<Job>> {
        let mut visible = Vec::new();
        for job in self.jobs.list().await? {
            if self
                .permissions
                .has_job_permission(user, &job, PermissionLevel::Read)
                .await?
            {
                visible.push(job);
            }
        }
        Ok(visible)
    }

    pub async fn get_job(&self, user: &User, job_id: i64, needed: PermissionLevel) -> Result<Job> {
        let job = self.jobs.get(job_id).await?;
        self.permissions
            .require_job_permission(user, &job, needed)
            .await?;
        Ok(job)
    }

    pub async fn create_job(&self, user: &User, job: NewJob) -> Result<Job> {
        if !self.permissions.authorized_to_write(user).await? {
            return Err(AppError::Forbidden);
        }
        let job = self.validate(job).await?;
        let created = self.jobs.create(&job).await?;
        tracing::info!("User '{}' created {}", user.username, created);
        Ok(created)
    }

    pub async fn update_job(&self, user: &User, job: NewJob) -> Result<Job> {
        self.get_job(user, job.job_id, PermissionLevel::Write).await?;
        let job = self.validate(job).await?;
        self.jobs.update(&job).await
    }

    pub async fn delete_job(&self, user: &User, job_id: i64) -> Result<()> {
        let job = self.get_job(user, job_id, PermissionLevel::Full).await?;
        self.jobs.delete(job_id).await?;
        tracing::info!("User '{}' deleted {}", user.username, job);
        Ok(())
    }

    async fn validate(&self, mut job: NewJob) -> Result<NewJob> {
        if job.job_id <= 0 {
            return Err(AppError::InvalidInput(
                "Job id must be a positive integer".to_string(),
            ));
        }

        job.name = job.name.trim().to_string();
        check_length("name", &job.name, JOB_NAME_MAX)?;
        check_length("inventory", &job.inventory, JOB_PATH_MAX)?;
        check_length("playbook", &job.playbook, JOB_PATH_MAX)?;

        validate_path("inventory", &job.inventory, true)?;
        validate_path("playbook", &job.playbook, false)?;

        job.schedule = job.schedule.trim().to_string();
        if job.schedule.chars().count() > JOB_SCHEDULE_MAX {
            return Err(AppError::InvalidInput(format!(
                "schedule cannot exceed {} characters",
                JOB_SCHEDULE_MAX
            )));
        }
        if !job.schedule.is_empty() {
            parse_schedule(&job.schedule)?;
        }

        if let Some(permission_id) = job.permission_id {
            self.permissions.exists(permission_id).await?;
        }

        Ok(job)
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<()> {
    let length = value.trim().chars().count();
    if length == 0 || length > max {
        return Err(AppError::InvalidInput(format!(
            "{} must be between 1 and {} characters",
            field, max
        )));
    }
    Ok(())
}

fn validate_path(field: &str, value: &str, allow_absolute: bool) -> Result<()> {
    let path = Path::new(value);
    if path.is_absolute() && !allow_absolute {
        return Err(AppError::InvalidInput(format!(
            "{} must be a relative path",
            field
        )));
    }
    if path
        .components()
        .any(|component| matches!(component, Component::ParentDir))
    {
        return Err(AppError::InvalidInput(format!(
            "{} cannot contain '..'",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_rules() {
        assert!(validate_path("playbook", "site.yml", false).is_ok());
        assert!(validate_path("playbook", "roles/web/site.yml", false).is_ok());
        assert!(validate_path("playbook", "/etc/site.yml", false).is_err());
        assert!(validate_path("playbook", "../site.yml", false).is_err());
        assert!(validate_path("inventory", "/etc/ansible/hosts", true).is_ok());
        assert!(validate_path("inventory", "/etc/../hosts", true).is_err());
    }

    #[test]
    fn length_rules() {
        assert!(check_length("name", "deploy", JOB_NAME_MAX).is_ok());
        assert!(check_length("name", "  ", JOB_NAME_MAX).is_err());
        assert!(check_length("name", &"n".repeat(151), JOB_NAME_MAX).is_err());
    }
}
