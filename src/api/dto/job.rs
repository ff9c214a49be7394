use crate::models::Job;
use crate::repository::NewJob;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct JobRequest {
    pub job_id: Option<i64>,
    pub name: String,
    pub inventory: String,
    pub playbook: String,
    #[serde(default)]
    pub schedule: String,
    pub permission: Option<i64>,
}

impl JobRequest {
    pub fn into_new_job(self, job_id: i64) -> NewJob {
        NewJob {
            job_id,
            name: self.name,
            inventory: self.inventory,
            playbook: self.playbook,
            schedule: self.schedule,
            permission_id: self.permission,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job_id: i64,
    pub name: String,
    pub inventory: String,
    pub playbook: String,
    pub schedule: String,
    pub permission: Option<i64>,
    pub created: String,
    pub updated: String,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.job_id,
            name: job.name,
            inventory: job.inventory,
            playbook: job.playbook,
            schedule: job.schedule,
            permission: job.permission_id,
            created: job.created.to_rfc3339(),
            updated: job.updated.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobsListResponse {
    pub data: Vec<JobResponse>,
}
