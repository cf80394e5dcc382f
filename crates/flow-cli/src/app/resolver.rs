//! Path resolution for config, store, and account files.

use std::path::{Path, PathBuf};

use crate::config::default_config_path;

pub const CONFIG_ENV: &str = "FLOW_CONFIG";

/// Resolve the config file path, checking FLOW_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Error message when the config file is missing.
pub fn missing_config_message(config_path: &Path) -> String {
    format!(
        "Config file not found: {}\n\nRun:\n  flow init\n\nOr set {} to specify a different config location.",
        config_path.display(),
        CONFIG_ENV
    )
}
