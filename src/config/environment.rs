use super::Config;
use serde::Serialize;

/// A setting shown on the system config page.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Setting {
    pub key: &'static str,
    pub env: &'static str,
    pub label: &'static str,
    pub secret: bool,
}

pub const AW_ENV_VARS: &[Setting] = &[
    Setting { key: "database_url", env: "AW_DB", label: "Database", secret: false },
    Setting { key: "host", env: "AW_HOST", label: "Listen address", secret: false },
    Setting { key: "port", env: "AW_PORT", label: "Listen port", secret: false },
    Setting { key: "path_play", env: "AW_PATH_PLAY", label: "Playbook base-directory", secret: false },
    Setting { key: "path_run", env: "AW_PATH_RUN", label: "Runtime/log directory", secret: false },
    Setting { key: "path_repo", env: "AW_PATH_REPO", label: "Repository directory", secret: false },
    Setting { key: "login_redirect", env: "AW_LOGIN_REDIRECT", label: "Default page after login", secret: false },
    Setting { key: "deployment", env: "AW_ENV", label: "Deployment", secret: false },
    Setting { key: "serve_static", env: "AW_STATIC", label: "Serve static files", secret: false },
    Setting { key: "admin", env: "AW_ADMIN", label: "Initial admin user", secret: false },
    Setting { key: "admin_password", env: "AW_ADMIN_PASS", label: "Initial admin password", secret: true },
    Setting { key: "session_hours", env: "AW_SESSION_HOURS", label: "Session lifetime (hours)", secret: false },
    Setting { key: "ansible_playbook", env: "AW_ANSIBLE_PLAYBOOK", label: "ansible-playbook binary", secret: false },
];

const MASK: &str = "********";

#[derive(Debug, Clone, Serialize)]
pub struct SettingValue {
    pub key: &'static str,
    pub env: &'static str,
    pub label: &'static str,
    pub value: String,
}

impl Config {
    /// Effective value of every registered setting, secrets masked.
    pub fn settings(&self) -> Vec<SettingValue> {
        AW_ENV_VARS
            .iter()
            .map(|setting| {
                let value = if setting.secret {
                    if self.raw_value(setting.key).is_empty() {
                        String::new()
                    } else {
                        MASK.to_string()
                    }
                } else {
                    self.raw_value(setting.key)
                };
                SettingValue {
                    key: setting.key,
                    env: setting.env,
                    label: setting.label,
                    value,
                }
            })
            .collect()
    }

    fn raw_value(&self, key: &str) -> String {
        match key {
            "database_url" => self.database_url.clone(),
            "host" => self.host.clone(),
            "port" => self.port.to_string(),
            "path_play" => self.path_play.display().to_string(),
            "path_run" => self.path_run.display().to_string(),
            "path_repo" => self.path_repo.display().to_string(),
            "login_redirect" => self.login_redirect.clone(),
            "deployment" => format!("{:?}", self.deployment).to_lowercase(),
            "serve_static" => self.serve_static.to_string(),
            "admin" => self.admin.clone(),
            "admin_password" => self.admin_password.clone().unwrap_or_default(),
            "session_hours" => self.session_hours.to_string(),
            "ansible_playbook" => self.ansible_playbook.clone(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn secrets_are_masked() {
        let mut config = Config::with_root(Path::new("/srv/aw"));
        config.admin_password = Some("hunter2".to_string());
        let settings = config.settings();
        let password = settings
            .iter()
            .find(|s| s.key == "admin_password")
            .unwrap();
        assert_eq!(password.value, MASK);
        assert!(settings.iter().all(|s| !s.value.contains("hunter2")));
    }

    #[test]
    fn every_setting_has_a_value_mapping() {
        let config = Config::with_root(Path::new("/srv/aw"));
        for setting in AW_ENV_VARS.iter().filter(|s| !s.secret) {
            assert!(
                !config.raw_value(setting.key).is_empty(),
                "no value for {}",
                setting.key
            );
        }
    }
}
