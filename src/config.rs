// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `STACKYARD_*` environment variables (`__` separates nested keys, so
//! `STACKYARD_HUB__TIMEOUT_SECS` sets `hub.timeout_secs`).

use anyhow::{bail, Context, Result};
use ::config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "STACKYARD";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the saved session
    pub data_dir: PathBuf,
    /// Log filter used when neither `-v`, `-q` nor `RUST_LOG` is given
    pub log_level: String,
    /// Docker Hub client settings
    pub hub: HubConfig,
}

/// Docker Hub client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// API root
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Tags fetched per page
    pub page_size: u32,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            base_url: "https://hub.docker.com/v2".to_string(),
            timeout_secs: 30,
            page_size: 10,
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "hyperpolymath", "stackyard")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: project_dirs()
                .map(|d| d.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".stackyard")),
            log_level: "info".to_string(),
            hub: HubConfig::default(),
        }
    }
}

/// `<config_dir>/config.toml` for this platform
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.toml"))
}

/// Load configuration
///
/// An explicit `path` must exist; the platform default file is optional.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let mut builder = ::config::Config::builder().add_source(
        ::config::Config::try_from(&Config::default()).context("Failed to encode defaults")?,
    );

    match path {
        Some(path) => {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        None => {
            if let Some(path) = default_config_path() {
                builder =
                    builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
            }
        }
    }

    let settings = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to read configuration")?;

    settings
        .try_deserialize()
        .context("Invalid configuration")
}

/// Dotted keys that `get_key` and `set_key` accept
pub const KEYS: &[&str] = &[
    "data_dir",
    "log_level",
    "hub.base_url",
    "hub.timeout_secs",
    "hub.page_size",
];

/// Read one dotted key from a loaded configuration
pub fn get_key(config: &Config, key: &str) -> Result<String> {
    let value = match key {
        "data_dir" => config.data_dir.display().to_string(),
        "log_level" => config.log_level.clone(),
        "hub.base_url" => config.hub.base_url.clone(),
        "hub.timeout_secs" => config.hub.timeout_secs.to_string(),
        "hub.page_size" => config.hub.page_size.to_string(),
        _ => bail!("Unknown config key: {key}. Known keys: {}", KEYS.join(", ")),
    };
    Ok(value)
}

/// Write one dotted key into the TOML file at `path`, keeping other entries
pub fn set_key(path: &Path, key: &str, value: &str) -> Result<()> {
    let parsed = match key {
        "data_dir" | "log_level" | "hub.base_url" => toml::Value::String(value.to_string()),
        "hub.timeout_secs" | "hub.page_size" => {
            let n: i64 = value
                .parse()
                .with_context(|| format!("{key} expects a whole number, got {value:?}"))?;
            if n <= 0 {
                bail!("{key} must be positive");
            }
            toml::Value::Integer(n)
        }
        _ => bail!("Unknown config key: {key}. Known keys: {}", KEYS.join(", ")),
    };

    let mut table: toml::Table = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        content
            .parse()
            .with_context(|| format!("Failed to parse {}", path.display()))?
    } else {
        toml::Table::new()
    };

    let mut parts: Vec<&str> = key.split('.').collect();
    let leaf = parts.pop().unwrap_or(key);
    let mut target = &mut table;
    for part in parts {
        let entry = target
            .entry(part.to_string())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        target = match entry {
            toml::Value::Table(t) => t,
            _ => bail!("{part} in {} is not a table", path.display()),
        };
    }
    target.insert(leaf.to_string(), parsed);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(&table).context("Failed to serialize config")?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "log_level = \"debug\"\n[hub]\ntimeout_secs = 5\n").unwrap();

        let config = load(Some(&path)).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.hub.timeout_secs, 5);
        assert_eq!(config.hub.base_url, HubConfig::default().base_url);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_set_key_writes_nested_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        set_key(&path, "hub.page_size", "25").unwrap();
        set_key(&path, "log_level", "warn").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.hub.page_size, 25);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_unknown_and_malformed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert!(set_key(&path, "colour", "red").is_err());
        assert!(set_key(&path, "hub.timeout_secs", "soon").is_err());
        assert!(get_key(&Config::default(), "colour").is_err());
        assert_eq!(get_key(&Config::default(), "hub.page_size").unwrap(), "10");
    }
}
