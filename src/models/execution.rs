use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const LOG_SHORT_MAX: usize = 100;
pub const LOG_MED_MAX: usize = 1024;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobExecution {
    pub id: i64,
    pub job_id: i64,
    pub user_id: Option<i64>,
    pub start: DateTime<Utc>,
    pub fin: Option<DateTime<Utc>>,
    pub error_id: Option<i64>,
    pub warning_id: Option<i64>,
    pub result_ok: i32,
    pub result_changed: i32,
    pub result_unreachable: i32,
    pub result_failed: i32,
    pub result_skipped: i32,
    pub result_rescued: i32,
    pub result_ignored: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Running,
    Success,
    Warning,
    Failed,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Running => "running",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

impl JobExecution {
    /// An execution without error or warning has succeeded once finished.
    pub fn status(&self) -> ExecutionStatus {
        if self.error_id.is_some() {
            ExecutionStatus::Failed
        } else if self.fin.is_none() {
            ExecutionStatus::Running
        } else if self.warning_id.is_some() {
            ExecutionStatus::Warning
        } else {
            ExecutionStatus::Success
        }
    }

    pub fn describe(&self, job_name: &str) -> String {
        let result = match self.status() {
            ExecutionStatus::Running => ExecutionStatus::Success,
            status => status,
        };
        format!("Job '{}' execution {}: {}", job_name, self.start, result)
    }
}

/// Summed per-host counters of a play recap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub ok: i32,
    pub changed: i32,
    pub unreachable: i32,
    pub failed: i32,
    pub skipped: i32,
    pub rescued: i32,
    pub ignored: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobError {
    pub id: i64,
    pub short: String,
    pub med: Option<String>,
    pub logfile: String,
    pub created: DateTime<Utc>,
}

impl std::fmt::Display for JobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Job error {}: '{}'", self.created, self.short)
    }
}

/// Same shape as [`JobError`], stored in its own table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobWarning {
    pub id: i64,
    pub short: String,
    pub med: Option<String>,
    pub logfile: String,
    pub created: DateTime<Utc>,
}

impl std::fmt::Display for JobWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Job warning {}: '{}'", self.created, self.short)
    }
}

/// Input for a new error or warning record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub short: String,
    pub med: Option<String>,
    pub logfile: String,
}

impl LogRecord {
    pub fn new(short: &str, med: Option<&str>, logfile: &str) -> Self {
        Self {
            short: truncate(short, LOG_SHORT_MAX),
            med: med
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(|m| tail(m, LOG_MED_MAX)),
            logfile: logfile.to_string(),
        }
    }
}

fn truncate(value: &str, max: usize) -> String {
    value.trim().chars().take(max).collect()
}

fn tail(value: &str, max: usize) -> String {
    let count = value.chars().count();
    value.chars().skip(count.saturating_sub(max)).collect()
}
