mod auth_service;
mod browse_service;
mod execution_service;
mod job_service;
mod permission_service;
mod repository_service;
pub mod scheduler;
pub mod system_service;

pub use auth_service::AuthService;
pub use browse_service::{BrowseService, DirCache, Listing};
pub use execution_service::{ExecutionDetail, ExecutionService};
pub use job_service::JobService;
pub use permission_service::{PermissionMembers, PermissionService};
pub use repository_service::RepositoryService;
pub use scheduler::Scheduler;
pub use system_service::SystemService;
