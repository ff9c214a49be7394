use crate::config::hardcoded::LOG_TIME_FORMAT;
use crate::error::{AppError, Result};
use crate::executor::recap::{collect_warnings, parse_recap};
use crate::executor::{AnsibleExecutor, JobExecutor, log_path};
use crate::models::{ExecutionResult, Job, JobError, JobExecution, JobWarning, LogRecord};
use crate::repository::{ExecutionRepository, JobRepository};
use chrono::Local;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// An execution with its error and warning records resolved.
#[derive(Debug, Clone)]
pub struct ExecutionDetail {
    pub execution: JobExecution,
    pub error: Option<JobError>,
    pub warning: Option<JobWarning>,
}

#[derive(Clone)]
pub struct ExecutionService {
    exec_repo: ExecutionRepository,
    job_repo: JobRepository,
    executor: AnsibleExecutor,
    path_play: PathBuf,
    path_run: PathBuf,
}

impl ExecutionService {
    pub fn new(
        exec_repo: ExecutionRepository,
        job_repo: JobRepository,
        executor: AnsibleExecutor,
        path_play: PathBuf,
        path_run: PathBuf,
    ) -> Self {
        Self {
            exec_repo,
            job_repo,
            executor,
            path_play,
            path_run,
        }
    }

    /// Starts a run of the job and returns once the execution is recorded.
    pub async fn execute_job(&self, job_id: i64, user_id: Option<i64>) -> Result<JobExecution> {
        let job = self.job_repo.get(job_id).await?;
        let execution = self.exec_repo.create(job.job_id, user_id).await?;

        let logfile = log_path(&self.path_run, &execution);
        if let Some(parent) = logfile.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            tracing::error!("Failed to create log directory {}: {}", parent.display(), e);
            let message = format!("Failed to create log directory: {}", e);
            let error = LogRecord::new(&message, None, &logfile.to_string_lossy());
            return self
                .exec_repo
                .finish(execution.id, ExecutionResult::default(), Some(error), None)
                .await;
        }
        let header = format!(
            "[{}] Starting {}: {}\n",
            Local::now().format(LOG_TIME_FORMAT),
            job,
            self.executor.command_line(&job)
        );

        let (pid, child) = match self
            .executor
            .execute(&job, HashMap::new(), &self.path_play)
            .await
        {
            Ok(output) => output,
            Err(err) => {
                tracing::error!("Failed to start job {}: {}", job.job_id, err);
                let message = match err {
                    AppError::Execution(message) => message,
                    other => other.to_string(),
                };
                write_log(&logfile, &format!("{}{}\n", header, message));
                let error = LogRecord::new(&message, None, &logfile.to_string_lossy());
                return self
                    .exec_repo
                    .finish(execution.id, ExecutionResult::default(), Some(error), None)
                    .await;
            }
        };

        tracing::info!(
            "Started execution {} of job {} with pid {}",
            execution.id,
            job.job_id,
            pid
        );

        let exec_repo = self.exec_repo.clone();
        let exec_id = execution.id;
        let job_name = job.name.clone();

        tokio::spawn(async move {
            match child.wait_with_output().await {
                Ok(output) => {
                    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
                    let exit_code = output.status.code();
                    let (result, error, warning) =
                        assess_run(&stdout, &stderr, exit_code, &logfile.to_string_lossy());

                    write_log(
                        &logfile,
                        &format!(
                            "{}{}{}\n[{}] Finished with exit code {}\n",
                            header,
                            stdout,
                            stderr,
                            Local::now().format(LOG_TIME_FORMAT),
                            exit_code.map_or_else(|| "none".to_string(), |c| c.to_string())
                        ),
                    );

                    match exec_repo.finish(exec_id, result, error, warning).await {
                        Ok(finished) => {
                            tracing::info!("{}", finished.describe(&job_name));
                        }
                        Err(e) => {
                            tracing::error!("Failed to store execution {}: {}", exec_id, e);
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("Error waiting for process: {}", e);
                    let message = format!("Error: {}", e);
                    write_log(&logfile, &format!("{}{}\n", header, message));
                    let error = LogRecord::new(&message, None, &logfile.to_string_lossy());
                    if let Err(e) = exec_repo
                        .finish(exec_id, ExecutionResult::default(), Some(error), None)
                        .await
                    {
                        tracing::error!("Failed to store execution {}: {}", exec_id, e);
                    }
                }
            }
        });

        Ok(execution)
    }

    pub async fn list_executions(&self, job: &Job) -> Result<Vec<ExecutionDetail>> {
        let executions = self.exec_repo.list_by_job(job.job_id).await?;
        let mut details = Vec::with_capacity(executions.len());
        for execution in executions {
            details.push(self.detail(execution).await?);
        }
        Ok(details)
    }

    pub async fn get_execution(&self, job: &Job, exec_id: i64) -> Result<ExecutionDetail> {
        let execution = self.exec_repo.get(exec_id).await?;
        if execution.job_id != job.job_id {
            return Err(AppError::ExecutionNotFound(exec_id));
        }
        self.detail(execution).await
    }

    pub async fn read_log(&self, job: &Job, exec_id: i64) -> Result<String> {
        let detail = self.get_execution(job, exec_id).await?;
        let logfile = log_path(&self.path_run, &detail.execution);
        if !logfile.is_file() {
            return Err(AppError::NotFound("Log file does not exist".to_string()));
        }
        Ok(tokio::fs::read_to_string(&logfile).await?)
    }

    async fn detail(&self, execution: JobExecution) -> Result<ExecutionDetail> {
        let error = match execution.error_id {
            Some(id) => self.exec_repo.get_error(id).await?,
            None => None,
        };
        let warning = match execution.warning_id {
            Some(id) => self.exec_repo.get_warning(id).await?,
            None => None,
        };
        Ok(ExecutionDetail {
            execution,
            error,
            warning,
        })
    }
}

/// Result counters plus the error or warning records of a finished run.
fn assess_run(
    stdout: &str,
    stderr: &str,
    exit_code: Option<i32>,
    logfile: &str,
) -> (ExecutionResult, Option<LogRecord>, Option<LogRecord>) {
    let result = parse_recap(stdout);

    if exit_code != Some(0) {
        let short = match exit_code {
            Some(code) => format!("Playbook exited with code {}", code),
            None => "Playbook was terminated by a signal".to_string(),
        };
        let med = if stderr.trim().is_empty() { stdout } else { stderr };
        return (result, Some(LogRecord::new(&short, Some(med), logfile)), None);
    }

    let mut warnings = collect_warnings(stdout);
    warnings.extend(collect_warnings(stderr));
    let warning = warnings.first().map(|first| {
        let med = warnings.join("\n");
        LogRecord::new(first, Some(&med), logfile)
    });

    (result, None, warning)
}

fn write_log(path: &Path, content: &str) {
    if let Err(e) = std::fs::write(path, content) {
        tracing::warn!("Failed to write log {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_run_records_error() {
        let (_, error, warning) = assess_run("", "boom\n", Some(2), "/tmp/x.log");
        let error = error.unwrap();
        assert_eq!(error.short, "Playbook exited with code 2");
        assert_eq!(error.med.as_deref(), Some("boom"));
        assert_eq!(error.logfile, "/tmp/x.log");
        assert!(warning.is_none());
    }

    #[test]
    fn clean_run_has_no_records() {
        let stdout = "PLAY RECAP ***\nlocalhost : ok=1 changed=0 unreachable=0 failed=0 skipped=0 rescued=0 ignored=0\n";
        let (result, error, warning) = assess_run(stdout, "", Some(0), "/tmp/x.log");
        assert_eq!(result.ok, 1);
        assert!(error.is_none());
        assert!(warning.is_none());
    }

    #[test]
    fn warnings_become_warning_record() {
        let (_, error, warning) =
            assess_run("", "[WARNING]: provided hosts list is empty\n", Some(0), "/tmp/x.log");
        assert!(error.is_none());
        assert_eq!(warning.unwrap().short, "provided hosts list is empty");
    }
}
