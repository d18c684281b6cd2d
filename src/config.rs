use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::paths;
use crate::store::DEFAULT_CACHE_TTL;

pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    pub db: Option<String>,
    pub cloud: Option<bool>,
    pub cache_ttl_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

impl Config {
    /// Load config from `~/.taskboard/config.toml`.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("failed to parse {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    /// Pick the database path. An explicit path (flag or env var) wins, then
    /// the config file's path, then the cloud location if requested, then the
    /// local default.
    pub fn resolve_db_path(&self, explicit: Option<&str>, cloud_flag: bool) -> PathBuf {
        if let Some(p) = explicit {
            return PathBuf::from(p);
        }
        if let Some(p) = &self.store.db {
            return PathBuf::from(p);
        }
        if cloud_flag || self.store.cloud.unwrap_or(false) {
            return paths::cloud_db_path();
        }
        paths::local_db_path()
    }

    pub fn cache_ttl(&self) -> Duration {
        self.store
            .cache_ttl_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CACHE_TTL)
    }

    pub fn bind_addr<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .or(self.server.bind.as_deref())
            .unwrap_or(DEFAULT_BIND)
    }
}

/// Create the parent directory of `db_path` if needed and return the path
/// as a string for `rusqlite`.
pub fn prepare_db_path(db_path: &Path) -> Result<String> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Ok(db_path
        .to_str()
        .context("database path is not valid UTF-8")?
        .to_string())
}
