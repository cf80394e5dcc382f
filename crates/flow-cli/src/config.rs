use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use flow_core::store::IndexSpec;

#[derive(Debug, Serialize, Deserialize)]
pub struct FlowConfig {
    pub store: StoreSection,
    pub auth: AuthSection,
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreSection {
    pub path: String,
    /// Ordered queries served by the store; absent means all of them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexes: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthSection {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UiSection {
    #[serde(default)]
    pub ascii: bool,
}

impl FlowConfig {
    pub fn new(store_path: PathBuf, auth_path: PathBuf) -> Self {
        Self {
            store: StoreSection {
                path: store_path.to_string_lossy().to_string(),
                indexes: None,
            },
            auth: AuthSection {
                path: auth_path.to_string_lossy().to_string(),
            },
            ui: UiSection::default(),
        }
    }

    /// Parsed `[store] indexes`, if the section restricts ordered queries.
    pub fn indexes(&self) -> anyhow::Result<Option<Vec<IndexSpec>>> {
        let Some(raw) = &self.store.indexes else {
            return Ok(None);
        };
        raw.iter()
            .map(|value| {
                value
                    .parse::<IndexSpec>()
                    .map_err(|e| anyhow::anyhow!("Invalid index \"{}\" in config: {}", value, e))
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .map(Some)
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("store.json"))
}

pub fn default_auth_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("accounts.json"))
}

pub fn read_config(path: &Path) -> anyhow::Result<FlowConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &FlowConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("flow"));
        }
    }
    Ok(home_dir()?.join(".config").join("flow"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("flow"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("flow"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_without_indexes() {
        let config = FlowConfig::new(PathBuf::from("/tmp/s.json"), PathBuf::from("/tmp/a.json"));
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(!text.contains("indexes"));

        let parsed: FlowConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.store.path, "/tmp/s.json");
        assert!(parsed.indexes().unwrap().is_none());
        assert!(!parsed.ui.ascii);
    }

    #[test]
    fn test_indexes_parse() {
        let parsed: FlowConfig = toml::from_str(
            r#"
            [store]
            path = "s.json"
            indexes = ["tasks.priority"]

            [auth]
            path = "a.json"
            "#,
        )
        .unwrap();
        let indexes = parsed.indexes().unwrap().unwrap();
        assert_eq!(indexes.len(), 1);
    }

    #[test]
    fn test_bad_index_rejected() {
        let parsed: FlowConfig = toml::from_str(
            r#"
            [store]
            path = "s.json"
            indexes = ["priority"]

            [auth]
            path = "a.json"
            "#,
        )
        .unwrap();
        assert!(parsed.indexes().is_err());
    }
}
