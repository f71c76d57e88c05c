use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Base URL of the inventory service, scheme included.
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LookupConfig {
    /// Startup state of the format-check toggle on the query screen.
    pub validate_format: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            lookup: LookupConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        LookupConfig {
            validate_format: true,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the per-user default
    /// location when none is given. An explicitly named file must exist;
    /// a missing default file just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        if let Some(explicit) = path {
            let raw = fs::read_to_string(explicit)
                .with_context(|| format!("Failed to read config file {}", explicit.display()))?;
            return parse(&raw)
                .with_context(|| format!("Invalid config file {}", explicit.display()));
        }

        let Some(default) = default_path() else {
            debug!("no user config directory, using built-in defaults");
            return Ok(Config::default());
        };
        match fs::read_to_string(&default) {
            Ok(raw) => {
                debug!(path = %default.display(), "loaded config file");
                parse(&raw).with_context(|| format!("Invalid config file {}", default.display()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Config::default()),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to read config file {}", default.display())),
        }
    }

    /// Apply the `--server` command-line override, when one was given.
    pub fn apply_server_override(&mut self, server: Option<String>) {
        if let Some(base_url) = server {
            self.server.base_url = base_url;
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs)
    }
}

/// `<config-dir>/macquery/config.toml`, platform config dir permitting.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("macquery").join("config.toml"))
}

fn parse(raw: &str) -> Result<Config> {
    toml::from_str(raw).map_err(Into::into)
}
