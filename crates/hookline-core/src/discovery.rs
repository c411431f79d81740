use std::path::{Path, PathBuf};

use crate::error::HooklineError;
use crate::types::config::HookConfig;

/// File name of the per-repository configuration.
pub const CONFIG_FILE_NAME: &str = ".hookline.json";

/// Walks up from `start_dir` looking for `.hookline.json`, stopping at the
/// first directory that contains `.git`.
pub fn discover_config(start_dir: &Path) -> Result<PathBuf, HooklineError> {
    let mut current = start_dir.canonicalize()?;

    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }

        if current.join(".git").exists() {
            break;
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => break,
        }
    }

    Err(HooklineError::ConfigNotFound(start_dir.to_path_buf()))
}

pub fn load_config(config_path: &Path) -> Result<HookConfig, HooklineError> {
    let content = std::fs::read_to_string(config_path)?;
    let config: HookConfig = serde_json::from_str(&content)?;
    tracing::debug!(
        path = %config_path.display(),
        checks = config.checks.len(),
        "loaded configuration"
    );
    Ok(config)
}

/// Loads the configuration that applies to `start_dir`, falling back to the
/// defaults when there is none.
pub fn load_config_or_default(start_dir: &Path) -> Result<HookConfig, HooklineError> {
    match discover_config(start_dir) {
        Ok(path) => load_config(&path),
        Err(HooklineError::ConfigNotFound(_)) => Ok(HookConfig::default()),
        Err(e) => Err(e),
    }
}
