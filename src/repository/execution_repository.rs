use crate::error::{AppError, Result};
use crate::models::{ExecutionResult, JobError, JobExecution, JobWarning, LogRecord};
use crate::repository::DbPool;
use chrono::Utc;

#[derive(Clone)]
pub struct ExecutionRepository {
    pool: DbPool,
}

impl ExecutionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, job_id: i64, user_id: Option<i64>) -> Result<JobExecution> {
        let result = sqlx::query("INSERT INTO job_executions (job_id, user_id, start) VALUES (?, ?, ?)")
            .bind(job_id)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        self.get(result.last_insert_rowid()).await
    }

    pub async fn get(&self, id: i64) -> Result<JobExecution> {
        let execution =
            sqlx::query_as::<_, JobExecution>("SELECT * FROM job_executions WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(AppError::ExecutionNotFound(id))?;

        Ok(execution)
    }

    pub async fn list_by_job(&self, job_id: i64) -> Result<Vec<JobExecution>> {
        let executions = sqlx::query_as::<_, JobExecution>(
            "SELECT * FROM job_executions WHERE job_id = ? ORDER BY start DESC, id DESC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(executions)
    }

    /// Stores the outcome of a run, creating its error and warning records.
    pub async fn finish(
        &self,
        id: i64,
        result: ExecutionResult,
        error: Option<LogRecord>,
        warning: Option<LogRecord>,
    ) -> Result<JobExecution> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let error_id = match error {
            Some(record) => Some(
                sqlx::query("INSERT INTO job_errors (short, med, logfile, created) VALUES (?, ?, ?, ?)")
                    .bind(&record.short)
                    .bind(&record.med)
                    .bind(&record.logfile)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?
                    .last_insert_rowid(),
            ),
            None => None,
        };

        let warning_id = match warning {
            Some(record) => Some(
                sqlx::query("INSERT INTO job_warnings (short, med, logfile, created) VALUES (?, ?, ?, ?)")
                    .bind(&record.short)
                    .bind(&record.med)
                    .bind(&record.logfile)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?
                    .last_insert_rowid(),
            ),
            None => None,
        };

        sqlx::query(
            r#"
            UPDATE job_executions
            SET fin = ?, error_id = ?, warning_id = ?,
                result_ok = ?, result_changed = ?, result_unreachable = ?, result_failed = ?,
                result_skipped = ?, result_rescued = ?, result_ignored = ?
            WHERE id = ?
            "#,
        )
        .bind(now)
        .bind(error_id)
        .bind(warning_id)
        .bind(result.ok)
        .bind(result.changed)
        .bind(result.unreachable)
        .bind(result.failed)
        .bind(result.skipped)
        .bind(result.rescued)
        .bind(result.ignored)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get(id).await
    }

    pub async fn get_error(&self, id: i64) -> Result<Option<JobError>> {
        let error = sqlx::query_as::<_, JobError>("SELECT * FROM job_errors WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(error)
    }

    pub async fn get_warning(&self, id: i64) -> Result<Option<JobWarning>> {
        let warning = sqlx::query_as::<_, JobWarning>("SELECT * FROM job_warnings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(warning)
    }
}
