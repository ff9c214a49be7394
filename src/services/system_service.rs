use crate::process::process;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

const GALAXY_URL: &str = "https://galaxy.ansible.com/ui/repo/published";
const CONFIG_DOCS_URL: &str =
    "https://docs.ansible.com/ansible/latest/reference_appendices/config.html";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    pub version: String,
    pub path: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSetting {
    pub value: String,
    pub comment: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PythonModule {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnsibleVersions {
    pub ansible: Option<String>,
    pub ansible_core: Option<String>,
    pub ansible_runner: Option<String>,
    pub jinja: Option<String>,
    pub libyaml: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemVersions {
    pub env_linux: String,
    pub env_git: String,
    pub env_ansible: String,
    pub env_ansible_core: String,
    pub env_ansible_runner: String,
    pub env_jinja: String,
    pub env_libyaml: String,
    pub env_python: String,
    pub env_webui: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Environment {
    pub env_system: SystemVersions,
    pub env_python_modules: BTreeMap<String, PythonModule>,
    pub env_ansible_config: BTreeMap<String, ConfigSetting>,
    pub env_ansible_collections: BTreeMap<String, Collection>,
}

/// Parses `ansible-galaxy collection list`; repeated names get a ` (n)` suffix.
pub fn parse_collections(output: &str) -> BTreeMap<String, Collection> {
    let mut collections = BTreeMap::new();
    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut collection_path = String::new();

    for line in output.lines() {
        if let Some(path) = line.strip_prefix('#') {
            collection_path = path.trim().to_string();
            continue;
        }
        if !line.contains('.') {
            continue;
        }
        let Some((name, version)) = line.trim().split_once(' ') else {
            continue;
        };
        let (name, version) = (name.trim(), version.trim());
        let url = format!("{}/{}", GALAXY_URL, name.replace('.', "/"));

        let key = if collections.contains_key(name) {
            let counter = counters.entry(name.to_string()).or_insert(1);
            *counter += 1;
            format!("{} ({})", name, counter)
        } else {
            name.to_string()
        };

        collections.insert(
            key,
            Collection {
                version: version.to_string(),
                path: collection_path.clone(),
                url,
            },
        );
    }

    collections
}

/// Parses `ansible-config dump` lines of the form `SETTING(comment) = value`.
pub fn parse_ansible_config(output: &str) -> BTreeMap<String, ConfigSetting> {
    let mut config = BTreeMap::new();

    for line in output.lines() {
        let Some((setting_comment, value)) = line.split_once('=') else {
            continue;
        };
        let (setting_comment, value) = (setting_comment.trim(), value.trim());

        let (setting, comment) = match setting_comment.rsplit_once('(') {
            Some((setting, comment)) => (setting.trim(), comment.replace(')', "")),
            None => (setting_comment, "-".to_string()),
        };
        if setting.is_empty() {
            continue;
        }

        let url = format!(
            "{}#{}",
            CONFIG_DOCS_URL,
            setting.to_lowercase().replace('_', "-")
        );
        config.insert(
            setting.to_string(),
            ConfigSetting {
                value: value.to_string(),
                comment,
                url,
            },
        );
    }

    config
}

/// Parses `ansible --version`, filling package versions from the module list.
pub fn parse_ansible_version(
    output: &str,
    python_modules: &BTreeMap<String, PythonModule>,
) -> AnsibleVersions {
    let mut versions = AnsibleVersions {
        ansible_core: output
            .lines()
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string),
        ..Default::default()
    };

    for line in output.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().to_string();
        match key.trim() {
            "jinja version" => versions.jinja = Some(value),
            "libyaml" => versions.libyaml = Some(value),
            _ => {}
        }
    }

    versions.ansible_runner = python_modules
        .get("ansible-runner")
        .map(|m| m.version.clone());
    versions.ansible = python_modules.get("ansible").map(|m| m.version.clone());
    versions
}

/// Parses `pip list`, keyed by lowercase package name.
pub fn parse_pip_list(output: &str) -> BTreeMap<String, PythonModule> {
    let mut modules = BTreeMap::new();

    for line in output.lines() {
        if !line.contains('.') {
            continue;
        }
        let Some((name, version)) = line.trim().split_once(' ') else {
            continue;
        };
        let name = name.trim();
        modules.insert(
            name.to_lowercase(),
            PythonModule {
                name: name.to_string(),
                version: version.trim().to_string(),
            },
        );
    }

    modules
}

pub fn deployment_docker() -> bool {
    std::env::var("AW_DOCKER").is_ok_and(|v| !v.trim().is_empty())
        || Path::new("/.dockerenv").exists()
}

#[derive(Clone, Default)]
pub struct SystemService;

impl SystemService {
    pub fn new() -> Self {
        Self
    }

    pub async fn python_modules(&self) -> BTreeMap<String, PythonModule> {
        let mut result = process(&["pip", "list"], &[]).await;
        if !result.success() {
            result = process(&["python3", "-m", "pip", "list"], &[]).await;
        }
        if !result.success() {
            return BTreeMap::new();
        }
        parse_pip_list(&result.stdout)
    }

    pub async fn ansible_versions(
        &self,
        python_modules: &BTreeMap<String, PythonModule>,
    ) -> AnsibleVersions {
        let result = process(&["ansible", "--version"], &[]).await;
        if !result.success() {
            return parse_ansible_version("", python_modules);
        }
        parse_ansible_version(&result.stdout, python_modules)
    }

    pub async fn ansible_config(&self) -> BTreeMap<String, ConfigSetting> {
        let result = process(&["ansible-config", "dump"], &[("ANSIBLE_FORCE_COLOR", "0")]).await;
        if !result.success() {
            return BTreeMap::new();
        }
        parse_ansible_config(&result.stdout)
    }

    pub async fn ansible_collections(&self) -> BTreeMap<String, Collection> {
        let result = process(&["ansible-galaxy", "collection", "list"], &[]).await;
        if !result.success() {
            return BTreeMap::new();
        }
        parse_collections(&result.stdout)
    }

    pub async fn system_versions(
        &self,
        python_modules: &BTreeMap<String, PythonModule>,
        ansible: &AnsibleVersions,
    ) -> SystemVersions {
        let mut env_linux = process(&["uname", "-a"], &[]).await.stdout.trim().to_string();
        if deployment_docker() {
            env_linux.push_str(" (dockerized)");
        }

        let python = process(&["python3", "--version"], &[]).await;
        let env_python = python
            .stdout
            .trim()
            .strip_prefix("Python ")
            .unwrap_or(python.stdout.trim())
            .to_string();

        let ansible_pkg = ansible.ansible.clone().or_else(|| {
            python_modules
                .get("ansible")
                .map(|module| module.version.clone())
        });

        SystemVersions {
            env_linux,
            env_git: process(&["git", "--version"], &[]).await.stdout.trim().to_string(),
            env_ansible: ansible_pkg.unwrap_or_default(),
            env_ansible_core: ansible.ansible_core.clone().unwrap_or_default(),
            env_ansible_runner: ansible.ansible_runner.clone().unwrap_or_default(),
            env_jinja: ansible.jinja.clone().unwrap_or_default(),
            env_libyaml: ansible.libyaml.clone().unwrap_or_default(),
            env_python,
            env_webui: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub async fn environment(&self) -> Environment {
        let python_modules = self.python_modules().await;
        let ansible = self.ansible_versions(&python_modules).await;
        let env_system = self.system_versions(&python_modules, &ansible).await;

        Environment {
            env_system,
            env_ansible_config: self.ansible_config().await,
            env_ansible_collections: self.ansible_collections().await,
            env_python_modules: python_modules,
        }
    }
}
