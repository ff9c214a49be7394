use super::JobExecutor;
use crate::error::{AppError, Result};
use crate::models::Job;
use std::collections::HashMap;
use std::path::Path;

#[derive(Clone)]
pub struct AnsibleExecutor {
    playbook_bin: String,
}

impl AnsibleExecutor {
    pub fn new(playbook_bin: Option<String>) -> Self {
        Self {
            playbook_bin: playbook_bin.unwrap_or_else(|| "ansible-playbook".to_string()),
        }
    }

    /// The command line a job runs with, for logging.
    pub fn command_line(&self, job: &Job) -> String {
        format!("{} -i {} {}", self.playbook_bin, job.inventory, job.playbook)
    }
}

impl Default for AnsibleExecutor {
    fn default() -> Self {
        Self::new(None)
    }
}

impl JobExecutor for AnsibleExecutor {
    async fn execute(
        &self,
        job: &Job,
        env: HashMap<String, String>,
        work_dir: &Path,
    ) -> Result<(u32, tokio::process::Child)> {
        let playbook_path = work_dir.join(&job.playbook);
        if !playbook_path.is_file() {
            return Err(AppError::Execution(format!(
                "Playbook not found: {}",
                playbook_path.display()
            )));
        }

        let mut cmd = tokio::process::Command::new(&self.playbook_bin);
        cmd.arg("-i").arg(&job.inventory).arg(&job.playbook);
        cmd.current_dir(work_dir);

        cmd.env("ANSIBLE_FORCE_COLOR", "0");
        for (key, value) in env {
            cmd.env(key, value);
        }

        cmd.stdin(std::process::Stdio::null());
        cmd.stdout(std::process::Stdio::piped());
        cmd.stderr(std::process::Stdio::piped());

        let child = cmd.spawn().map_err(|e| {
            AppError::Execution(format!("Failed to start {}: {}", self.playbook_bin, e))
        })?;

        let pid = child
            .id()
            .ok_or_else(|| AppError::Execution("Failed to get process ID".to_string()))?;

        Ok((pid, child))
    }
}
