use std::process::Stdio;
use tokio::process::Command;

/// Captured result of a finished command. Spawn failures report `rc == -1`.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub rc: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.rc == 0
    }
}

pub async fn process(cmd: &[&str], env: &[(&str, &str)]) -> ProcessOutput {
    let Some((program, args)) = cmd.split_first() else {
        return ProcessOutput {
            rc: -1,
            ..Default::default()
        };
    };

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in env {
        command.env(key, value);
    }

    match command.output().await {
        Ok(output) => ProcessOutput {
            rc: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        },
        Err(e) => {
            tracing::debug!("Failed to run {:?}: {}", cmd, e);
            ProcessOutput {
                rc: -1,
                stdout: String::new(),
                stderr: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_reports_failure() {
        let result = process(&["aw-definitely-not-installed"], &[]).await;
        assert_eq!(result.rc, -1);
        assert!(!result.success());
        assert!(result.stdout.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_stdout_and_env() {
        let result = process(&["sh", "-c", "echo $AW_TEST_VALUE"], &[("AW_TEST_VALUE", "hello")]).await;
        assert!(result.success());
        assert_eq!(result.stdout.trim(), "hello");
    }
}
