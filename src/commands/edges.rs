// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Edges command - show which services share networks

use super::Ctx;
use crate::topology::NetworkTopology;
use anyhow::Result;

/// Run edges command
pub fn run(ctx: &Ctx, service: Option<String>) -> Result<()> {
    let session = ctx.load_session()?;
    let doc = session
        .container()
        .ok_or_else(|| anyhow::anyhow!("No workspace item selected"))?;
    let topology = NetworkTopology::from_container(doc);

    if let Some(name) = service {
        if !doc.services.contains_key(&name) {
            anyhow::bail!("Service not found: {name}");
        }
        let edges = topology.edges_of(&name);
        if ctx.json {
            return ctx.print_json(&edges);
        }
        let neighbors = topology.neighbors(&name);
        if neighbors.is_empty() {
            println!("{name} shares no network with other services");
        } else {
            println!("{name} reaches: {}", neighbors.join(", "));
        }
        for edge in edges {
            println!(
                "  {} {} -- {}  {}",
                ctx.swatch(&edge.color),
                edge.source,
                edge.target,
                ctx.dim(&edge.shared_networks.join(", "))
            );
        }
        return Ok(());
    }

    if ctx.json {
        return ctx.print_json(topology.edges());
    }

    if topology.edges().is_empty() {
        println!("No services share a network");
    }
    for edge in topology.edges() {
        println!(
            "{} {} -- {}  {}",
            ctx.swatch(&edge.color),
            ctx.bold(&edge.source),
            ctx.bold(&edge.target),
            ctx.dim(&format!("via {}", edge.shared_networks.join(", ")))
        );
    }

    let isolated = topology.isolated();
    if !isolated.is_empty() && topology.node_count() > 1 {
        println!();
        println!("Isolated: {}", isolated.join(", "));
    }

    Ok(())
}
