use crate::error::{AppError, Result};
use crate::models::{Repository, RepositoryKind};
use crate::repository::{NewRepository, RepoRepository};
use std::path::{Component, Path};

const REPOSITORY_NAME_MAX: usize = 100;

#[derive(Clone)]
pub struct RepositoryService {
    repos: RepoRepository,
}

impl RepositoryService {
    pub fn new(repos: RepoRepository) -> Self {
        Self { repos }
    }

    pub async fn list(&self) -> Result<Vec<Repository>> {
        self.repos.list().await
    }

    pub async fn create(&self, mut repository: NewRepository) -> Result<Repository> {
        repository.name = repository.name.trim().to_string();
        let name_ok = !repository.name.is_empty()
            && repository.name.chars().count() <= REPOSITORY_NAME_MAX
            && repository
                .name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !repository.name.starts_with('.');
        if !name_ok {
            return Err(AppError::InvalidInput(
                "Repository name may only contain letters, digits, '-', '_' and '.'".to_string(),
            ));
        }

        match repository.rtype {
            RepositoryKind::Static => {
                let path = repository.static_path.as_deref().unwrap_or_default();
                if !Path::new(path).is_absolute() {
                    return Err(AppError::InvalidInput(
                        "Static repositories need an absolute static_path".to_string(),
                    ));
                }
            }
            RepositoryKind::Git => {
                if repository
                    .git_origin
                    .as_deref()
                    .is_none_or(|origin| origin.trim().is_empty())
                {
                    return Err(AppError::InvalidInput(
                        "Git repositories need a git_origin".to_string(),
                    ));
                }
                if let Some(base) = repository.git_playbook_base.as_deref() {
                    let base = Path::new(base);
                    if base.is_absolute()
                        || base.components().any(|c| matches!(c, Component::ParentDir))
                    {
                        return Err(AppError::InvalidInput(
                            "git_playbook_base must be a relative path without '..'".to_string(),
                        ));
                    }
                }
            }
        }

        let created = self.repos.create(&repository).await?;
        tracing::info!("Created {} repository '{}'", created.rtype_name(), created.name);
        Ok(created)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repos.delete(id).await
    }
}
