//! Install layout: `<root>/bin/ansible-webui`, `<root>/conf/`, `<root>/data/`.

use crate::error::{AppError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

const BIN_DIR: &str = "bin";
const CONF_DIR: &str = "conf";
const HOME_ENV: &str = "AW_HOME";

/// `AW_HOME` when set, otherwise derived from the running executable.
pub fn install_root() -> Result<PathBuf> {
    let home = std::env::var(HOME_ENV).ok();
    let exe = std::env::current_exe()?;
    resolve_root(home.as_deref(), &exe)
}

pub fn conf_dir() -> Result<PathBuf> {
    Ok(install_root()?.join(CONF_DIR))
}

fn resolve_root(home: Option<&str>, exe: &Path) -> Result<PathBuf> {
    match home.map(str::trim) {
        Some("") => Err(AppError::Config(format!("{} is set but empty", HOME_ENV))),
        Some(home) => Ok(PathBuf::from(home)),
        None => {
            let exe_dir = exe.parent().ok_or_else(|| {
                AppError::Config(format!("Cannot resolve directory of {}", exe.display()))
            })?;
            if exe_dir.file_name() != Some(OsStr::new(BIN_DIR)) {
                return Ok(exe_dir.to_path_buf());
            }
            exe_dir
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| AppError::Config("bin directory has no parent".to_string()))
        }
    }
}
