use crate::error::{AppError, Result};
use crate::models::Job;
use crate::repository::DbPool;
use chrono::Utc;

/// Fields of a job as written by the API.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub job_id: i64,
    pub name: String,
    pub inventory: String,
    pub playbook: String,
    pub schedule: String,
    pub permission_id: Option<i64>,
}

#[derive(Clone)]
pub struct JobRepository {
    pool: DbPool,
}

impl JobRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>("SELECT * FROM jobs ORDER BY job_id")
            .fetch_all(&self.pool)
            .await?;

        Ok(jobs)
    }

    pub async fn get(&self, job_id: i64) -> Result<Job> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE job_id = ?")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::JobNotFound(job_id))?;

        Ok(job)
    }

    pub async fn create(&self, job: &NewJob) -> Result<Job> {
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs WHERE job_id = ?")
            .bind(job.job_id)
            .fetch_one(&self.pool)
            .await?;
        if exists > 0 {
            return Err(AppError::JobAlreadyExists(job.job_id));
        }

        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO jobs (job_id, name, inventory, playbook, schedule, permission_id, created, updated)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(job.job_id)
        .bind(&job.name)
        .bind(&job.inventory)
        .bind(&job.playbook)
        .bind(&job.schedule)
        .bind(job.permission_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(job.job_id).await
    }

    pub async fn update(&self, job: &NewJob) -> Result<Job> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET name = ?, inventory = ?, playbook = ?, schedule = ?, permission_id = ?, updated = ?
            WHERE job_id = ?
            "#,
        )
        .bind(&job.name)
        .bind(&job.inventory)
        .bind(&job.playbook)
        .bind(&job.schedule)
        .bind(job.permission_id)
        .bind(Utc::now())
        .bind(job.job_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::JobNotFound(job.job_id));
        }

        self.get(job.job_id).await
    }

    pub async fn delete(&self, job_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM jobs WHERE job_id = ?")
            .bind(job_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::JobNotFound(job_id));
        }

        Ok(())
    }
}
