use crate::models::{JobError, JobExecution, JobWarning};
use crate::services::ExecutionDetail;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub short: String,
    pub med: Option<String>,
    pub logfile: String,
    pub created: String,
}

impl From<JobError> for LogResponse {
    fn from(error: JobError) -> Self {
        Self {
            short: error.short,
            med: error.med,
            logfile: error.logfile,
            created: error.created.to_rfc3339(),
        }
    }
}

impl From<JobWarning> for LogResponse {
    fn from(warning: JobWarning) -> Self {
        Self {
            short: warning.short,
            med: warning.med,
            logfile: warning.logfile,
            created: warning.created.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExecutionResponse {
    pub id: i64,
    pub job_id: i64,
    pub user: Option<i64>,
    pub status: String,
    pub start: String,
    pub fin: Option<String>,
    pub error: Option<LogResponse>,
    pub warning: Option<LogResponse>,
    pub result_ok: i32,
    pub result_changed: i32,
    pub result_unreachable: i32,
    pub result_failed: i32,
    pub result_skipped: i32,
    pub result_rescued: i32,
    pub result_ignored: i32,
}

impl From<JobExecution> for ExecutionResponse {
    fn from(execution: JobExecution) -> Self {
        Self {
            id: execution.id,
            job_id: execution.job_id,
            user: execution.user_id,
            status: execution.status().to_string(),
            start: execution.start.to_rfc3339(),
            fin: execution.fin.map(|t| t.to_rfc3339()),
            error: None,
            warning: None,
            result_ok: execution.result_ok,
            result_changed: execution.result_changed,
            result_unreachable: execution.result_unreachable,
            result_failed: execution.result_failed,
            result_skipped: execution.result_skipped,
            result_rescued: execution.result_rescued,
            result_ignored: execution.result_ignored,
        }
    }
}

impl From<ExecutionDetail> for ExecutionResponse {
    fn from(detail: ExecutionDetail) -> Self {
        Self {
            error: detail.error.map(LogResponse::from),
            warning: detail.warning.map(LogResponse::from),
            ..Self::from(detail.execution)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExecutionsListResponse {
    pub data: Vec<ExecutionResponse>,
}
