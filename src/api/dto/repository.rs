use crate::models::{Repository, RepositoryKind};
use crate::repository::NewRepository;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RepositoryRequest {
    pub name: String,
    pub rtype: RepositoryKind,
    pub static_path: Option<String>,
    pub git_origin: Option<String>,
    pub git_branch: Option<String>,
    #[serde(default)]
    pub git_isolate: bool,
    pub git_playbook_base: Option<String>,
}

impl From<RepositoryRequest> for NewRepository {
    fn from(req: RepositoryRequest) -> Self {
        Self {
            name: req.name,
            rtype: req.rtype,
            static_path: req.static_path,
            git_origin: req.git_origin,
            git_branch: req.git_branch,
            git_isolate: req.git_isolate,
            git_playbook_base: req.git_playbook_base,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RepositoryResponse {
    pub id: i64,
    pub name: String,
    pub rtype: RepositoryKind,
    pub rtype_name: String,
    pub static_path: Option<String>,
    pub git_origin: Option<String>,
    pub git_branch: Option<String>,
    pub git_isolate: bool,
    pub git_playbook_base: Option<String>,
    pub created: String,
}

impl From<Repository> for RepositoryResponse {
    fn from(repository: Repository) -> Self {
        Self {
            rtype_name: repository.rtype_name().to_string(),
            id: repository.id,
            name: repository.name,
            rtype: repository.rtype,
            static_path: repository.static_path,
            git_origin: repository.git_origin,
            git_branch: repository.git_branch,
            git_isolate: repository.git_isolate,
            git_playbook_base: repository.git_playbook_base,
            created: repository.created.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RepositoriesListResponse {
    pub data: Vec<RepositoryResponse>,
}
