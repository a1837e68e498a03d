// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Loader configuration.
//!
//! Settings are layered: built-in defaults, then the user config file, then a
//! project `arjs.toml`, then `ARJS_*` environment variables.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Project-local config file name
pub const PROJECT_CONFIG_FILE: &str = "arjs.toml";

/// Prefix of environment variables read by [`LoaderConfig::load`]
pub const ENV_PREFIX: &str = "ARJS_";

/// Known CDN shorthands accepted by `set_cdn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdnShorthand {
    /// https://unpkg.com/
    Unpkg,
    /// https://cdn.jsdelivr.net/npm/
    Jsdelivr,
}

impl CdnShorthand {
    /// Look up a shorthand by name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "unpkg" => Some(Self::Unpkg),
            "jsdelivr" => Some(Self::Jsdelivr),
            _ => None,
        }
    }

    /// Registry root the shorthand stands for
    pub fn root(self) -> &'static str {
        match self {
            Self::Unpkg => "https://unpkg.com/",
            Self::Jsdelivr => "https://cdn.jsdelivr.net/npm/",
        }
    }
}

/// Expand a CDN setting into location fragments.
///
/// A leading shorthand name replaces the whole list with its root; anything
/// else is taken literally.
pub fn cdn_fragments<S: AsRef<str>>(fragments: &[S]) -> Vec<String> {
    match fragments.first().and_then(|first| CdnShorthand::from_name(first.as_ref())) {
        Some(shorthand) => vec![shorthand.root().to_string()],
        None => fragments.iter().map(|f| f.as_ref().to_string()).collect(),
    }
}

/// Configuration for a loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Fragments of the base location relative identifiers resolve against
    pub base_url: Vec<String>,

    /// Fragments of the CDN root bare package names resolve against
    pub cdn: Vec<String>,

    /// Request timeout in seconds; unset means requests may wait forever
    pub timeout: Option<u64>,

    /// User agent sent with HTTP requests
    pub user_agent: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cdn: Vec::new(),
            timeout: None,
            user_agent: format!("arjs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Same shape as [`LoaderConfig`] with every field optional, for merging.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    base_url: Option<Vec<String>>,
    cdn: Option<Vec<String>>,
    timeout: Option<u64>,
    user_agent: Option<String>,
}

impl LoaderConfig {
    /// Load configuration from default locations.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = user_config_path() {
            if path.is_file() {
                config.merge_from_file(&path)?;
            }
        }

        let project = PathBuf::from(PROJECT_CONFIG_FILE);
        if project.is_file() {
            config.merge_from_file(&project)?;
        }

        config.apply_env(std::env::vars());

        Ok(config)
    }

    /// Parse a complete configuration from TOML; missing keys take defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.cdn = cdn_fragments(config.cdn.as_slice());
        Ok(config)
    }

    /// Merge the keys present in a TOML file over this configuration.
    pub fn merge_from_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        debug!("Merging config from {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&content)?;

        if let Some(base_url) = file.base_url {
            self.base_url = base_url;
        }
        if let Some(cdn) = file.cdn {
            self.cdn = cdn_fragments(cdn.as_slice());
        }
        if file.timeout.is_some() {
            self.timeout = file.timeout;
        }
        if let Some(user_agent) = file.user_agent {
            self.user_agent = user_agent;
        }

        Ok(())
    }

    /// Apply `ARJS_*` variables from `vars`.
    pub fn apply_env<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(config_key) = key.strip_prefix(ENV_PREFIX) {
                let config_key = config_key.to_lowercase().replace('_', "-");
                self.set(&config_key, &value);
            }
        }
    }

    /// Set a single configuration value from its string form.
    ///
    /// List values are comma-separated.
    pub fn set(&mut self, key: &str, value: &str) {
        match key {
            "base-url" => self.base_url = split_list(value),
            "cdn" => self.cdn = cdn_fragments(split_list(value).as_slice()),
            "timeout" => match value.parse() {
                Ok(secs) => self.timeout = Some(secs),
                Err(_) => warn!("Ignoring invalid timeout '{}'", value),
            },
            "user-agent" => self.user_agent = value.to_string(),
            _ => warn!("Ignoring unknown config key '{}'", key),
        }
    }

    /// Get a configuration value in its string form.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "base-url" => Some(self.base_url.join(",")),
            "cdn" => Some(self.cdn.join(",")),
            "timeout" => self.timeout.map(|t| t.to_string()),
            "user-agent" => Some(self.user_agent.clone()),
            _ => None,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

/// The current working directory as a `file://` URL with a trailing slash.
fn default_base_url() -> Vec<String> {
    std::env::current_dir()
        .ok()
        .and_then(|dir| Url::from_directory_path(dir).ok())
        .map(|url| vec![url.to_string()])
        .unwrap_or_default()
}

/// Get the user config path.
fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("arjs").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdn_shorthand() {
        assert_eq!(CdnShorthand::from_name("unpkg"), Some(CdnShorthand::Unpkg));
        assert_eq!(CdnShorthand::from_name("JsDelivr"), Some(CdnShorthand::Jsdelivr));
        assert_eq!(CdnShorthand::from_name("esm.sh"), None);

        assert_eq!(cdn_fragments(&["unpkg", "ignored"]), vec!["https://unpkg.com/"]);
        assert_eq!(
            cdn_fragments(&["https://esm.sh", "v135"]),
            vec!["https://esm.sh", "v135"]
        );
        assert!(cdn_fragments::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_default_base_is_file_directory() {
        let config = LoaderConfig::default();
        assert_eq!(config.base_url.len(), 1);
        assert!(config.base_url[0].starts_with("file://"));
        assert!(config.base_url[0].ends_with('/'));
        assert!(config.cdn.is_empty());
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_from_toml_str() {
        let config = LoaderConfig::from_toml_str(
            r#"
            base_url = ["https://h.com", "/app/"]
            cdn = ["jsdelivr"]
            timeout = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, vec!["https://h.com", "/app/"]);
        assert_eq!(config.cdn, vec!["https://cdn.jsdelivr.net/npm/"]);
        assert_eq!(config.timeout, Some(30));
        assert!(config.user_agent.starts_with("arjs/"));
    }

    #[test]
    fn test_from_toml_str_rejects_bad_types() {
        assert!(matches!(
            LoaderConfig::from_toml_str("timeout = \"soon\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_merge_from_file_keeps_unset_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROJECT_CONFIG_FILE);
        std::fs::write(&path, "cdn = [\"unpkg\"]\n").unwrap();

        let mut config = LoaderConfig::default();
        let base = config.base_url.clone();
        config.merge_from_file(&path).unwrap();

        assert_eq!(config.cdn, vec!["https://unpkg.com/"]);
        assert_eq!(config.base_url, base);
    }

    #[test]
    fn test_apply_env() {
        let mut config = LoaderConfig::default();
        config.apply_env(vec![
            ("ARJS_BASE_URL".to_string(), "https://h.com, /app/".to_string()),
            ("ARJS_CDN".to_string(), "unpkg".to_string()),
            ("ARJS_TIMEOUT".to_string(), "nope".to_string()),
            ("HOME".to_string(), "/root".to_string()),
        ]);

        assert_eq!(config.base_url, vec!["https://h.com", "/app/"]);
        assert_eq!(config.cdn, vec!["https://unpkg.com/"]);
        assert_eq!(config.timeout, None);
        assert_eq!(config.get("cdn").as_deref(), Some("https://unpkg.com/"));
    }
}
