// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Export command - writes the selected document in various formats

use super::Ctx;
use crate::topology::NetworkTopology;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Graphviz DOT of services and shared-network edges
    Dot,
    /// The document with canvas metadata, as JSON
    Json,
    /// Plain Compose YAML
    Compose,
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dot" | "graphviz" => Ok(Self::Dot),
            "json" => Ok(Self::Json),
            "compose" | "yaml" | "yml" => Ok(Self::Compose),
            _ => anyhow::bail!("Unknown export format: {s}. Supported: dot, json, compose"),
        }
    }
}

impl ExportFormat {
    /// Get file extension for format
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Json => "json",
            Self::Compose => "yaml",
        }
    }
}

/// Run the export command
pub fn run(ctx: &Ctx, format: &str, output: Option<PathBuf>) -> Result<()> {
    let export_format: ExportFormat = format.parse()?;
    info!("Exporting to {}", export_format.extension());

    let session = ctx.load_session()?;
    let doc = session
        .container()
        .ok_or_else(|| anyhow::anyhow!("No workspace item selected"))?;

    if doc.services.is_empty() {
        eprintln!("Warning: document has no services. Run 'stackyard service add' first.");
    }

    let content = match export_format {
        ExportFormat::Dot => NetworkTopology::from_container(doc).to_dot(),
        ExportFormat::Json => {
            serde_json::to_string_pretty(doc).context("Failed to serialize document")?
        }
        ExportFormat::Compose => doc.to_compose_yaml().context("Failed to render Compose YAML")?,
    };

    match output {
        Some(path) => {
            fs::write(&path, &content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }

    Ok(())
}
