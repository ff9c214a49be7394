mod ansible_executor;
pub mod recap;

pub use ansible_executor::AnsibleExecutor;

use crate::config::hardcoded::RUNNER_TMP_DIR_TIME_FORMAT;
use crate::error::Result;
use crate::models::{Job, JobExecution};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};

pub trait JobExecutor {
    fn execute(
        &self,
        job: &Job,
        env: HashMap<String, String>,
        work_dir: &Path,
    ) -> impl Future<Output = Result<(u32, tokio::process::Child)>> + Send;
}

/// Logfile of an execution: `<path_run>/<job_id>/<start>_<execution id>.log`.
pub fn log_path(path_run: &Path, execution: &JobExecution) -> PathBuf {
    path_run.join(execution.job_id.to_string()).join(format!(
        "{}_{}.log",
        execution.start.format(RUNNER_TMP_DIR_TIME_FORMAT),
        execution.id
    ))
}
