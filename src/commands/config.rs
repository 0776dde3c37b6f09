// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

use crate::config::{self, Config};
use anyhow::Result;
use std::path::Path;

/// Print a config key, or write it to the config file when a value is given
pub fn run(current: &Config, file: Option<&Path>, key: &str, value: Option<String>) -> Result<()> {
    match value {
        Some(v) => {
            let path = match file {
                Some(path) => path.to_path_buf(),
                None => config::default_config_path()
                    .ok_or_else(|| anyhow::anyhow!("No config directory; pass --config"))?,
            };
            tracing::info!("Setting {} = {}", key, v);
            config::set_key(&path, key, &v)?;
            println!("{key} = {v} ({})", path.display());
        }
        None => println!("{}", config::get_key(current, key)?),
    }
    Ok(())
}
