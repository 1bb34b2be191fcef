//
//  churchtools-cli
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration
//!
//! Settings of the `ct` binary, stored as TOML in the platform config
//! directory:
//!
//! - Linux: `~/.config/ct/config.toml`
//! - macOS: `~/Library/Application Support/ct/config.toml`
//! - Windows: `%APPDATA%\ct\config\config.toml`
//!
//! ```toml
//! [core]
//! default_host = "church.example"
//! song_cache_ttl_secs = 10
//!
//! [hosts."church.example"]
//! url = "https://church.example"
//! user = "jane@church.example"
//! identity_id = 42
//! ```
//!
//! Login tokens never go into this file; they live in the system keyring
//! (see [`crate::auth::KeyringStore`]). `CT_HOST` overrides the default host.

mod file;
mod hosts;

pub use file::*;
pub use hosts::*;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::ClientOptions;

/// Environment variable selecting the host.
pub const HOST_ENV: &str = "CT_HOST";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub core: CoreConfig,

    #[serde(default)]
    pub hosts: HashMap<String, HostConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoreConfig {
    #[serde(default)]
    pub default_host: Option<String>,

    #[serde(default = "default_song_cache_ttl")]
    pub song_cache_ttl_secs: u64,

    #[serde(default = "default_rate_limit_backoff")]
    pub rate_limit_backoff_secs: u64,
}

fn default_song_cache_ttl() -> u64 {
    10
}

fn default_rate_limit_backoff() -> u64 {
    15
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            default_host: None,
            song_cache_ttl_secs: default_song_cache_ttl(),
            rate_limit_backoff_secs: default_rate_limit_backoff(),
        }
    }
}

/// One ChurchTools site the user has logged in to.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HostConfig {
    pub url: String,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub identity_id: Option<i64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Loads `path`, or the defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            return Ok(Self::default());
        }
        let content = read_config_file(path)?;
        toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_config_file(path, &content)
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn host_config(&self, host: &str) -> Option<&HostConfig> {
        self.hosts.get(&normalize_host(host))
    }

    /// Host to talk to: `explicit`, else `CT_HOST`, else the default host.
    pub fn resolve_host(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .map(str::to_string)
            .or_else(|| std::env::var(HOST_ENV).ok().filter(|h| !h.trim().is_empty()))
            .or_else(|| self.core.default_host.clone())
            .map(|h| normalize_host(&h))
    }

    /// Records a successful login and makes the host the default.
    pub fn remember_login(&mut self, url: &str, user: Option<String>, identity_id: i64) {
        let host = normalize_host(url);
        self.hosts.insert(
            host.clone(),
            HostConfig {
                url: host_url(url),
                user,
                identity_id: Some(identity_id),
            },
        );
        self.core.default_host = Some(host);
    }

    pub fn forget_host(&mut self, host: &str) -> Option<HostConfig> {
        let host = normalize_host(host);
        if self.core.default_host.as_deref() == Some(host.as_str()) {
            self.core.default_host = None;
        }
        self.hosts.remove(&host)
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::default()
            .with_song_cache_ttl(Duration::from_secs(self.core.song_cache_ttl_secs))
            .with_rate_limit_backoff(Duration::from_secs(self.core.rate_limit_backoff_secs))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default_host" => self.core.default_host.clone(),
            "song_cache_ttl_secs" => Some(self.core.song_cache_ttl_secs.to_string()),
            "rate_limit_backoff_secs" => Some(self.core.rate_limit_backoff_secs.to_string()),
            _ => None,
        }
    }

    /// Sets a `[core]` key; `false` for unknown keys or unparsable values.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        match key {
            "default_host" => {
                self.core.default_host = Some(normalize_host(value));
                true
            }
            "song_cache_ttl_secs" => match value.parse() {
                Ok(secs) => {
                    self.core.song_cache_ttl_secs = secs;
                    true
                }
                Err(_) => false,
            },
            "rate_limit_backoff_secs" => match value.parse() {
                Ok(secs) => {
                    self.core.rate_limit_backoff_secs = secs;
                    true
                }
                Err(_) => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.core.song_cache_ttl_secs, 10);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.remember_login("https://Church.Example/", Some("jane".to_string()), 42);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.core.default_host.as_deref(), Some("church.example"));
        let host = loaded.host_config("church.example").unwrap();
        assert_eq!(host.url, "https://church.example");
        assert_eq!(host.identity_id, Some(42));
    }

    #[test]
    fn test_forget_host_clears_default() {
        let mut config = Config::default();
        config.remember_login("https://church.example", None, 1);
        assert!(config.forget_host("church.example").is_some());
        assert!(config.core.default_host.is_none());
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();
        assert!(config.set("song_cache_ttl_secs", "30"));
        assert!(!config.set("song_cache_ttl_secs", "soon"));
        assert!(!config.set("editor", "vim"));
        assert_eq!(config.get("song_cache_ttl_secs").as_deref(), Some("30"));
        assert_eq!(
            config.client_options().song_cache_ttl,
            Duration::from_secs(30)
        );
    }
}
