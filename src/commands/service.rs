// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Service commands - edit services of the selected document

use super::Ctx;
use crate::compose::ServiceIcon;
use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::Value;

/// Service actions
#[derive(Debug, Subcommand)]
pub enum ServiceAction {
    /// List services
    List,
    /// Add a service with a generated name
    Add,
    /// Remove a service
    Remove {
        /// Service name
        name: String,
    },
    /// Rename a service
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },
    /// Show a service as Compose YAML
    Show {
        /// Service name
        name: String,
    },
    /// Set a property; the value is parsed as JSON, falling back to a string
    Set {
        /// Service name
        service: String,
        /// Compose key, e.g. image or restart
        property: String,
        /// New value; `null` unsets the property
        value: String,
    },
    /// Append an entry to a list or map property
    Push {
        /// Service name
        service: String,
        /// Compose key, e.g. ports or environment
        property: String,
        /// Entry to add
        value: String,
    },
    /// Remove the entry at an index from a list or map property
    Pop {
        /// Service name
        service: String,
        /// Compose key
        property: String,
        /// Zero-based index
        index: usize,
    },
    /// Attach a service to a network
    Connect {
        /// Service name
        service: String,
        /// Network name
        network: String,
    },
    /// Publish a port as HOST:CONTAINER
    Port {
        /// Service name
        service: String,
        /// Host port
        local: u32,
        /// Container port
        container: u32,
    },
    /// Set the canvas icon
    Icon {
        /// Service name
        service: String,
        /// One of: container, database, server, cloud, cube, circle, hexagon
        icon: String,
    },
}

/// Parse a CLI value as JSON, treating anything unparseable as a string
#[must_use]
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Run service command
pub fn run(ctx: &Ctx, action: ServiceAction) -> Result<()> {
    let mut session = ctx.load_session()?;

    match action {
        ServiceAction::List => {
            let doc = session
                .container()
                .ok_or_else(|| anyhow::anyhow!("No workspace item selected"))?;
            if ctx.json {
                return ctx.print_json(&doc.services);
            }
            if doc.services.is_empty() {
                println!("No services");
            }
            for (name, node) in &doc.services {
                let icon = node.icon.unwrap_or_default().code();
                let image = node.image.as_deref().filter(|i| !i.is_empty()).unwrap_or("-");
                let networks = node.network_names().join(", ");
                println!(
                    "{}  {}  {}",
                    ctx.bold(name),
                    ctx.dim(&format!("[{icon}]")),
                    image
                );
                if !networks.is_empty() {
                    println!("    networks: {networks}");
                }
            }
            return Ok(());
        }

        ServiceAction::Add => {
            let name = session
                .add_service()
                .ok_or_else(|| anyhow::anyhow!("No workspace item selected"))?;
            println!("Added service {name}");
        }

        ServiceAction::Remove { name } => {
            session
                .remove_service(&name)
                .with_context(|| format!("Failed to remove service {name}"))?;
            println!("Removed service {name}");
        }

        ServiceAction::Rename { old, new } => {
            session
                .rename_service(&old, &new)
                .with_context(|| format!("Failed to rename service {old}"))?;
            println!("Renamed {old} to {}", new.trim());
        }

        ServiceAction::Show { name } => {
            let doc = session
                .container()
                .ok_or_else(|| anyhow::anyhow!("No workspace item selected"))?;
            let node = doc
                .services
                .get(&name)
                .ok_or_else(|| anyhow::anyhow!("Service not found: {name}"))?;
            if ctx.json {
                return ctx.print_json(node);
            }
            let mut node = node.clone();
            node.icon = None;
            let yaml = serde_yaml::to_string(&node).context("Failed to render service")?;
            println!("{name}:");
            for line in yaml.lines().filter(|l| !l.is_empty() && *l != "{}") {
                println!("  {line}");
            }
            return Ok(());
        }

        ServiceAction::Set {
            service,
            property,
            value,
        } => {
            session
                .update_service_property(&service, &property, parse_value(&value))
                .with_context(|| format!("Failed to set {service}.{property}"))?;
            println!("Set {service}.{property}");
        }

        ServiceAction::Push {
            service,
            property,
            value,
        } => {
            session
                .add_array_item(&service, &property, &value)
                .with_context(|| format!("Failed to add to {service}.{property}"))?;
            println!("Added {} to {service}.{property}", value.trim());
        }

        ServiceAction::Pop {
            service,
            property,
            index,
        } => {
            session
                .remove_array_item(&service, &property, index)
                .with_context(|| format!("Failed to remove from {service}.{property}"))?;
            println!("Removed {service}.{property}[{index}]");
        }

        ServiceAction::Connect { service, network } => {
            let added = session
                .add_network_to_service(&service, &network)
                .with_context(|| format!("Failed to connect {service}"))?;
            if added {
                println!("Connected {service} to {}", network.trim());
            } else {
                println!("{service} is already on {}", network.trim());
            }
        }

        ServiceAction::Port {
            service,
            local,
            container,
        } => {
            session
                .add_port_to_service(&service, local, container)
                .with_context(|| format!("Failed to add port to {service}"))?;
            println!("Published {local}:{container} on {service}");
        }

        ServiceAction::Icon { service, icon } => {
            let icon = ServiceIcon::from_code(&icon).ok_or_else(|| {
                let known: Vec<&str> = ServiceIcon::ALL.iter().map(|i| i.code()).collect();
                anyhow::anyhow!("Unknown icon: {icon}. Supported: {}", known.join(", "))
            })?;
            session
                .set_service_icon(&service, icon)
                .with_context(|| format!("Failed to set icon of {service}"))?;
            println!("Set icon of {service} to {}", icon.code());
        }
    }

    ctx.save_session(&session)
}
