use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const JOB_NAME_MAX: usize = 150;
pub const JOB_PATH_MAX: usize = 150;
pub const JOB_SCHEDULE_MAX: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub job_id: i64,
    pub name: String,
    pub inventory: String,
    pub playbook: String,
    pub schedule: String,
    pub permission_id: Option<i64>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Job {
    pub fn is_scheduled(&self) -> bool {
        !self.schedule.trim().is_empty()
    }
}

impl std::fmt::Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Job '{}' ('{}')", self.name, self.playbook)
    }
}
