use crate::error::{AppError, Result};
use crate::models::{Repository, RepositoryKind};
use crate::repository::RepoRepository;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const ALL_VALID: &str = ".*";

/// Directory listings memoized by absolute path for the process lifetime.
#[derive(Default)]
pub struct DirCache {
    entries: Mutex<HashMap<PathBuf, Vec<String>>>,
}

impl DirCache {
    pub fn list(&self, path: &Path) -> std::io::Result<Vec<String>> {
        if let Some(names) = self.lock().get(path) {
            return Ok(names.clone());
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(path)? {
            names.push(entry?.file_name().to_string_lossy().to_string());
        }
        names.sort();

        self.lock().insert(path.to_path_buf(), names.clone());
        Ok(names)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Vec<String>>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub files: Vec<String>,
    pub directories: Vec<String>,
}

#[derive(Clone)]
pub struct BrowseService {
    repos: RepoRepository,
    path_play: PathBuf,
    path_repo: PathBuf,
    cache: Arc<DirCache>,
}

impl BrowseService {
    pub fn new(repos: RepoRepository, path_play: PathBuf, path_repo: PathBuf) -> Self {
        Self {
            repos,
            path_play,
            path_repo,
            cache: Arc::new(DirCache::default()),
        }
    }

    /// Working copy of a git repository.
    pub fn repository_path(&self, repository: &Repository) -> PathBuf {
        self.path_repo.join(&repository.name)
    }

    pub async fn browse(&self, repository: Option<&str>, base: Option<&str>) -> Result<Listing> {
        let mut browse_root = self.path_play.clone();

        if let Some(selector) = repository.map(str::trim).filter(|s| !s.is_empty() && *s != "0") {
            let id: i64 = selector.parse().map_err(|_| {
                AppError::InvalidInput("Invalid browse-selector provided".to_string())
            })?;
            let repository = self.repos.get(id).await?;

            match repository.rtype {
                RepositoryKind::Static => {
                    browse_root = PathBuf::from(repository.static_path.clone().unwrap_or_default());
                }
                RepositoryKind::Git => {
                    if repository.git_isolate {
                        // isolated repositories are cloned per run, nothing to validate against
                        return Ok(Listing {
                            files: vec![ALL_VALID.to_string()],
                            directories: vec![ALL_VALID.to_string()],
                        });
                    }

                    browse_root = self.repository_path(&repository);
                    if let Some(playbook_base) = repository
                        .git_playbook_base
                        .as_deref()
                        .map(str::trim)
                        .filter(|b| !b.is_empty())
                    {
                        browse_root = browse_root.join(playbook_base);
                    }
                }
            }
        }

        if !browse_root.is_dir() {
            return Err(AppError::NotFound("Base directory does not exist".to_string()));
        }

        let base = base.unwrap_or("/");
        if base.contains("..") {
            return Err(AppError::TraversalDenied);
        }

        let directory = browse_root.join(base.trim_start_matches('/'));
        if !directory.is_dir() {
            return Err(AppError::NotFound("Directory does not exist".to_string()));
        }

        let mut listing = Listing::default();
        for item in self.cache.list(&directory)? {
            let item_path = directory.join(&item);
            if item_path.is_file() {
                listing.files.push(item);
            } else if item_path.is_dir() {
                listing.directories.push(item);
            }
        }

        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_keeps_first_listing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.yml"), "").unwrap();

        let cache = DirCache::default();
        assert_eq!(cache.list(dir.path()).unwrap(), vec!["a.yml".to_string()]);

        std::fs::write(dir.path().join("b.yml"), "").unwrap();
        assert_eq!(cache.list(dir.path()).unwrap(), vec!["a.yml".to_string()]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_does_not_store_failures() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let cache = DirCache::default();
        assert!(cache.list(&missing).is_err());
        assert!(cache.is_empty());
    }
}
