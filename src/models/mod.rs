pub mod execution;
pub mod job;
pub mod permission;
pub mod repository;
pub mod user;

pub use execution::{
    ExecutionResult, ExecutionStatus, JobError, JobExecution, JobWarning, LogRecord,
};
pub use job::Job;
pub use permission::{JobPermission, PermissionLevel};
pub use repository::{Repository, RepositoryKind};
pub use user::{Group, Session, User};
