//! Application context for the Flow CLI.
//!
//! Bundles parsed flags with the config file and the backends opened from it.
//! Everything is loaded on first use so commands that need nothing (like
//! `completions`) never touch the filesystem.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::unsync::OnceCell;

use flow_core::store::DocumentStore;
use flow_core::{AuthProvider, JsonFileStore, LocalAuth, Session};

use crate::cli::Cli;
use crate::config::{read_config, FlowConfig};
use crate::ui::UiContext;

use super::resolver::{missing_config_message, resolve_config_path};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<FlowConfig>,
    store: OnceCell<Arc<JsonFileStore>>,
    auth: OnceCell<LocalAuth>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
            store: OnceCell::new(),
            auth: OnceCell::new(),
        }
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// UI context for this invocation.
    pub fn ui_context(&self, json: bool) -> UiContext {
        let ascii_config = self.config.get().map(|c| c.ui.ascii).unwrap_or(false);
        UiContext::from_env(json, self.cli.no_color, self.cli.ascii || ascii_config)
    }

    /// The config file, loaded on first use.
    pub fn config(&self) -> anyhow::Result<&FlowConfig> {
        self.config.get_or_try_init(|| {
            let path = resolve_config_path()?;
            if !path.exists() {
                return Err(anyhow::anyhow!(missing_config_message(&path)));
            }
            read_config(&path)
        })
    }

    /// Store path from `--store`/`FLOW_STORE`, else the config file.
    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.cli.store {
            return Ok(PathBuf::from(path));
        }
        Ok(PathBuf::from(&self.config()?.store.path))
    }

    pub fn store(&self) -> anyhow::Result<Arc<dyn DocumentStore>> {
        let store = self.store.get_or_try_init(|| {
            let path = self.store_path()?;
            let mut store = JsonFileStore::open(&path)
                .map_err(|e| anyhow::anyhow!("Failed to open store {}: {}", path.display(), e))?;
            let indexes = match self.config() {
                Ok(config) => config.indexes()?,
                // An explicit --store works without a config file.
                Err(_) if self.cli.store.is_some() => None,
                Err(err) => return Err(err),
            };
            if let Some(indexes) = indexes {
                store = store.with_indexes(indexes);
            }
            tracing::debug!(path = %path.display(), "store opened");
            Ok::<_, anyhow::Error>(Arc::new(store))
        })?;
        let store: Arc<dyn DocumentStore> = store.clone();
        Ok(store)
    }

    pub fn auth(&self) -> anyhow::Result<&LocalAuth> {
        self.auth.get_or_try_init(|| {
            let path = PathBuf::from(&self.config()?.auth.path);
            LocalAuth::open(&path).map_err(|e| {
                anyhow::anyhow!("Failed to open accounts {}: {}", path.display(), e)
            })
        })
    }

    /// The signed-in user's session.
    pub fn session(&self) -> anyhow::Result<Session> {
        self.auth()?
            .session()
            .ok_or_else(|| {
                anyhow::anyhow!("Not signed in.\nHint: Run `flow login` or `flow register`.")
            })
    }
}
