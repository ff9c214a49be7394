use crate::error::{AppError, Result};
use crate::models::{Repository, RepositoryKind};
use crate::repository::DbPool;
use chrono::Utc;

#[derive(Debug, Clone)]
pub struct NewRepository {
    pub name: String,
    pub rtype: RepositoryKind,
    pub static_path: Option<String>,
    pub git_origin: Option<String>,
    pub git_branch: Option<String>,
    pub git_isolate: bool,
    pub git_playbook_base: Option<String>,
}

#[derive(Clone)]
pub struct RepoRepository {
    pool: DbPool,
}

impl RepoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Repository>> {
        let repositories = sqlx::query_as::<_, Repository>("SELECT * FROM repositories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(repositories)
    }

    pub async fn get(&self, id: i64) -> Result<Repository> {
        let repository = sqlx::query_as::<_, Repository>("SELECT * FROM repositories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::RepositoryNotFound)?;

        Ok(repository)
    }

    pub async fn create(&self, repository: &NewRepository) -> Result<Repository> {
        let exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM repositories WHERE name = ?")
                .bind(&repository.name)
                .fetch_one(&self.pool)
                .await?;
        if exists > 0 {
            return Err(AppError::Conflict(format!(
                "Repository '{}' already exists",
                repository.name
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO repositories (name, rtype, static_path, git_origin, git_branch, git_isolate, git_playbook_base, created)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&repository.name)
        .bind(repository.rtype as i32)
        .bind(&repository.static_path)
        .bind(&repository.git_origin)
        .bind(&repository.git_branch)
        .bind(repository.git_isolate)
        .bind(&repository.git_playbook_base)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.get(result.last_insert_rowid()).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM repositories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::RepositoryNotFound);
        }

        Ok(())
    }
}
