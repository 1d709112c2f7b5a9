use anyhow::{bail, Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A named API endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Context {
    pub server_url: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    pub current_context: Option<String>,
    #[serde(default)]
    pub contexts: BTreeMap<String, Context>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".docgen").join("config.yaml"))
    }

    pub fn current(&self) -> Option<(&String, &Context)> {
        self.current_context
            .as_ref()
            .and_then(|name| self.contexts.get(name).map(|ctx| (name, ctx)))
    }

    /// Add or replace a context. The first one added becomes current.
    pub fn add(&mut self, name: &str, server_url: &str, set_current: bool) {
        self.contexts.insert(
            name.to_string(),
            Context {
                server_url: server_url.trim_end_matches('/').to_string(),
            },
        );
        if set_current || self.current_context.is_none() {
            self.current_context = Some(name.to_string());
        }
    }

    pub fn switch(&mut self, name: &str) -> Result<()> {
        if !self.contexts.contains_key(name) {
            bail!("Context '{}' not found.", name);
        }
        self.current_context = Some(name.to_string());
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Result<()> {
        if self.contexts.remove(name).is_none() {
            bail!("Context '{}' not found.", name);
        }
        if self.current_context.as_deref() == Some(name) {
            self.current_context = None;
        }
        Ok(())
    }
}
