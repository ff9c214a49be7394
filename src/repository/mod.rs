mod connection;
mod execution_repository;
mod job_repository;
mod permission_repository;
mod repo_repository;
mod user_repository;

pub use connection::establish_connection;
pub use execution_repository::ExecutionRepository;
pub use job_repository::{JobRepository, NewJob};
pub use permission_repository::PermissionRepository;
pub use repo_repository::{NewRepository, RepoRepository};
pub use user_repository::UserRepository;

pub type DbPool = sqlx::SqlitePool;
