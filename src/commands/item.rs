// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Workspace item commands - create, select and describe Compose documents

use super::Ctx;
use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;

/// Workspace item actions
#[derive(Debug, Subcommand)]
pub enum ItemAction {
    /// List workspace items
    List,
    /// Create an item with a generated name and select it
    New,
    /// Select the item to edit
    Select {
        /// Item id
        id: String,
    },
    /// Remove an item
    Remove {
        /// Item id
        id: String,
    },
    /// Change an item's display name
    Rename {
        /// Item id
        id: String,
        /// New display name
        name: String,
    },
    /// Set the selected document's Compose project name
    ProjectName {
        /// Project name
        name: String,
    },
    /// Set the selected document's Compose file version ("" clears it)
    Version {
        /// Version, e.g. 3.8
        #[arg(id = "compose_version", value_name = "VERSION")]
        version: String,
    },
    /// Show the selected item
    Show,
}

#[derive(Serialize)]
struct ItemRow<'a> {
    id: &'a str,
    name: &'a str,
    selected: bool,
    services: usize,
    networks: usize,
    modified_at: String,
}

/// Run item command
pub fn run(ctx: &Ctx, action: ItemAction) -> Result<()> {
    let mut session = ctx.load_session()?;

    match action {
        ItemAction::List => {
            let rows: Vec<ItemRow> = session
                .manager
                .items()
                .iter()
                .map(|item| ItemRow {
                    id: &item.id,
                    name: &item.name,
                    selected: session.selected_item.as_deref() == Some(item.id.as_str()),
                    services: item.service_container.as_ref().map_or(0, |c| c.services.len()),
                    networks: item
                        .service_container
                        .as_ref()
                        .map_or(0, crate::compose::ServiceContainer::network_count),
                    modified_at: item.modified_at.to_rfc3339(),
                })
                .collect();

            if ctx.json {
                return ctx.print_json(&rows);
            }
            if rows.is_empty() {
                println!("No workspace items. Run 'stackyard item new' to create one.");
                return Ok(());
            }
            for row in rows {
                let marker = if row.selected { "*" } else { " " };
                println!(
                    "{} {}  {}  {}",
                    marker,
                    ctx.bold(row.id),
                    row.name,
                    ctx.dim(&format!(
                        "({} services, {} networks)",
                        row.services, row.networks
                    ))
                );
            }
            return Ok(());
        }

        ItemAction::New => {
            let id = session.add_workspace_item();
            let name = session.selected().map(|i| i.name.clone()).unwrap_or_default();
            println!("Created {id}: {name}");
        }

        ItemAction::Select { id } => {
            if !session.select_item(&id) {
                anyhow::bail!("Workspace item not found: {id}");
            }
            println!("Selected {id}");
        }

        ItemAction::Remove { id } => {
            if !session.remove_workspace_item(&id) {
                anyhow::bail!("Workspace item not found: {id}");
            }
            println!("Removed {id}");
        }

        ItemAction::Rename { id, name } => {
            session.rename_item(&id, &name)?;
            println!("Renamed {id} to {}", name.trim());
        }

        ItemAction::ProjectName { name } => {
            session
                .set_compose_name(&name)
                .context("Failed to set project name")?;
            println!("Project name: {}", name.trim());
        }

        ItemAction::Version { version } => {
            session
                .set_compose_version(&version)
                .context("Failed to set version")?;
            if version.trim().is_empty() {
                println!("Version cleared");
            } else {
                println!("Version: {}", version.trim());
            }
        }

        ItemAction::Show => {
            let item = session
                .selected()
                .ok_or_else(|| anyhow::anyhow!("No workspace item selected"))?;
            if ctx.json {
                return ctx.print_json(item);
            }
            println!("{}  {}", ctx.bold(&item.name), ctx.dim(&item.id));
            if let Some(description) = &item.description {
                println!("  {description}");
            }
            println!("  created:  {}", item.created_at.to_rfc3339());
            println!("  modified: {}", item.modified_at.to_rfc3339());
            if let Some(doc) = &item.service_container {
                println!("  project:  {}", doc.name.as_deref().unwrap_or("-"));
                println!("  version:  {}", doc.version.as_deref().unwrap_or("-"));
                println!("  services: {}", doc.services.len());
                println!("  networks: {}", doc.network_count());
            }
            return Ok(());
        }
    }

    ctx.save_session(&session)
}
