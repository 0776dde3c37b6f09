// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Network commands - declare, change and remove networks

use super::Ctx;
use crate::compose::service::KeyValueSpec;
use crate::compose::{ExternalSpec, IpamPool, IpamSpec, NetworkDefinition};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use indexmap::IndexMap;

/// Network definition fields settable from the command line
#[derive(Debug, Default, Args)]
pub struct NetworkFlags {
    /// Network driver, e.g. bridge or overlay
    #[arg(long)]
    pub driver: Option<String>,

    /// Restrict external access
    #[arg(long)]
    pub internal: bool,

    /// Allow standalone containers to attach
    #[arg(long)]
    pub attachable: bool,

    /// Enable IPv6
    #[arg(long)]
    pub ipv6: bool,

    /// Network is managed outside this project
    #[arg(long)]
    pub external: bool,

    /// IPAM subnet in CIDR form
    #[arg(long)]
    pub subnet: Option<String>,

    /// IPAM gateway address
    #[arg(long)]
    pub gateway: Option<String>,

    /// Label as KEY=VALUE (repeatable)
    #[arg(long = "label")]
    pub labels: Vec<String>,
}

impl NetworkFlags {
    /// Overlay the flags onto a definition
    pub fn apply(self, mut def: NetworkDefinition) -> Result<NetworkDefinition> {
        if let Some(driver) = self.driver {
            def.driver = Some(driver);
        }
        if self.internal {
            def.internal = Some(true);
        }
        if self.attachable {
            def.attachable = Some(true);
        }
        if self.ipv6 {
            def.enable_ipv6 = Some(true);
        }
        if self.external {
            def.external = Some(ExternalSpec::Flag(true));
        }
        if self.subnet.is_some() || self.gateway.is_some() {
            let ipam = def.ipam.get_or_insert_with(IpamSpec::default);
            let pools = ipam.config.get_or_insert_with(Vec::new);
            if pools.is_empty() {
                pools.push(IpamPool::default());
            }
            if let Some(pool) = pools.first_mut() {
                if self.subnet.is_some() {
                    pool.subnet = self.subnet;
                }
                if self.gateway.is_some() {
                    pool.gateway = self.gateway;
                }
            }
        }
        if !self.labels.is_empty() {
            let mut labels = match def.labels.take() {
                Some(KeyValueSpec::Map(map)) => map,
                Some(KeyValueSpec::List(list)) => list
                    .iter()
                    .map(|entry| split_label(entry))
                    .collect(),
                None => IndexMap::new(),
            };
            for entry in &self.labels {
                let (key, value) = split_label(entry);
                if key.is_empty() {
                    anyhow::bail!("Invalid label: {entry:?}");
                }
                labels.insert(key, value);
            }
            def.labels = Some(KeyValueSpec::Map(labels));
        }
        Ok(def)
    }
}

fn split_label(entry: &str) -> (String, String) {
    match entry.split_once('=') {
        Some((k, v)) => (k.trim().to_string(), v.to_string()),
        None => (entry.trim().to_string(), String::new()),
    }
}

/// Network actions
#[derive(Debug, Subcommand)]
pub enum NetworkAction {
    /// List networks with their colors
    List,
    /// Declare a network; a palette color is assigned
    Add {
        /// Network name
        name: String,
        #[command(flatten)]
        flags: NetworkFlags,
    },
    /// Change or rename a network; its color is kept
    Update {
        /// Current network name
        original: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        flags: NetworkFlags,
    },
    /// Remove a network and detach every service from it
    Remove {
        /// Network name
        name: String,
    },
}

/// Run network command
pub fn run(ctx: &Ctx, action: NetworkAction) -> Result<()> {
    let mut session = ctx.load_session()?;

    match action {
        NetworkAction::List => {
            let doc = session
                .container()
                .ok_or_else(|| anyhow::anyhow!("No workspace item selected"))?;
            let empty = IndexMap::new();
            let networks = doc.networks.as_ref().unwrap_or(&empty);
            if ctx.json {
                return ctx.print_json(networks);
            }
            if networks.is_empty() {
                println!("No networks");
            }
            for (name, def) in networks {
                let color = def.color.as_deref().unwrap_or("-");
                let members: Vec<&str> = doc
                    .services
                    .iter()
                    .filter(|(_, node)| node.network_names().contains(&name.as_str()))
                    .map(|(service, _)| service.as_str())
                    .collect();
                println!(
                    "{} {}  {}  {}",
                    ctx.swatch(color),
                    ctx.bold(name),
                    ctx.dim(color),
                    def.driver.as_deref().unwrap_or("bridge")
                );
                if !members.is_empty() {
                    println!("    services: {}", members.join(", "));
                }
            }
            return Ok(());
        }

        NetworkAction::Add { name, flags } => {
            let def = flags.apply(NetworkDefinition::default())?;
            let color = session
                .add_network(&name, def)
                .with_context(|| format!("Failed to add network {name}"))?;
            println!("Added network {} {}", name.trim(), ctx.swatch(&color));
        }

        NetworkAction::Update {
            original,
            name,
            flags,
        } => {
            let current = session
                .container()
                .and_then(|doc| doc.network(&original))
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Network not found: {original}"))?;
            let new_name = name.unwrap_or_else(|| original.clone());
            let def = flags.apply(current)?;
            session
                .update_network(&original, &new_name, def)
                .with_context(|| format!("Failed to update network {original}"))?;
            println!("Updated network {}", new_name.trim());
        }

        NetworkAction::Remove { name } => {
            session
                .remove_network(&name)
                .with_context(|| format!("Failed to remove network {name}"))?;
            println!("Removed network {name}");
        }
    }

    ctx.save_session(&session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_merge_labels_and_ipam() {
        let flags = NetworkFlags {
            driver: Some("overlay".into()),
            subnet: Some("10.0.0.0/24".into()),
            labels: vec!["tier=back".into(), "team".into()],
            ..NetworkFlags::default()
        };
        let mut base = NetworkDefinition::bridge();
        base.labels = Some(KeyValueSpec::List(vec!["owner=ops".into()]));

        let def = flags.apply(base).unwrap();

        assert_eq!(def.driver.as_deref(), Some("overlay"));
        let pools = def.ipam.unwrap().config.unwrap();
        assert_eq!(pools[0].subnet.as_deref(), Some("10.0.0.0/24"));
        let Some(KeyValueSpec::Map(labels)) = def.labels else {
            panic!("labels should be a map");
        };
        assert_eq!(labels.len(), 3);
        assert_eq!(labels["team"], "");
    }

    #[test]
    fn test_empty_label_key_rejected() {
        let flags = NetworkFlags {
            labels: vec!["=x".into()],
            ..NetworkFlags::default()
        };
        assert!(flags.apply(NetworkDefinition::default()).is_err());
    }
}
