// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Docker Hub commands - search images and list their tags

use super::Ctx;
use crate::config::HubConfig;
use crate::hub::{DockerHubClient, SearchResponse};
use anyhow::{Context, Result};

/// Queries shorter than this are not sent
pub const MIN_QUERY_LEN: usize = 3;

/// Run search command
pub async fn run(ctx: &Ctx, hub: &HubConfig, query: &str, page: Option<u32>) -> Result<()> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        tracing::debug!(query, "Query too short; not searching");
        if ctx.json {
            return ctx.print_json(&SearchResponse::default());
        }
        println!("Type at least {MIN_QUERY_LEN} characters to search");
        return Ok(());
    }

    let client = DockerHubClient::new(hub).context("Failed to build HTTP client")?;
    let results = match page {
        Some(page) => client.search_repositories_page(query, page).await,
        None => client.search_repositories(query).await,
    }
    .with_context(|| format!("Search for {query:?} failed"))?;

    if ctx.json {
        return ctx.print_json(&results);
    }
    if results.results.is_empty() {
        println!("No images found for {query:?}");
        return Ok(());
    }
    for repo in &results.results {
        let badge = if repo.is_official { " [official]" } else { "" };
        println!(
            "{}{}  {}",
            ctx.bold(&repo.repo_name),
            badge,
            ctx.dim(&format!("★ {}  ↓ {}", repo.star_count, repo.pull_count))
        );
        if !repo.short_description.is_empty() {
            println!("    {}", repo.short_description);
        }
    }
    println!();
    println!("{} results", results.count);
    Ok(())
}

/// Run tags command
pub async fn run_tags(
    ctx: &Ctx,
    hub: &HubConfig,
    repository: &str,
    page_size: Option<u32>,
    page: u32,
) -> Result<()> {
    let client = DockerHubClient::new(hub).context("Failed to build HTTP client")?;
    let tags = client
        .repository_tags(repository, page_size.unwrap_or(hub.page_size), page)
        .await
        .with_context(|| format!("Listing tags of {repository} failed"))?;

    if ctx.json {
        return ctx.print_json(&tags);
    }
    if tags.results.is_empty() {
        println!("No tags found for {repository}");
        return Ok(());
    }
    for tag in &tags.results {
        let platforms: Vec<String> = tag
            .images
            .iter()
            .map(|image| match image.variant.as_deref() {
                Some(variant) => format!("{}/{}/{}", image.os, image.architecture, variant),
                None => format!("{}/{}", image.os, image.architecture),
            })
            .collect();
        println!(
            "{}  {}",
            ctx.bold(&tag.name),
            ctx.dim(tag.last_updated.as_deref().unwrap_or(""))
        );
        if !platforms.is_empty() {
            println!("    {}", platforms.join(", "));
        }
    }
    if tags.next.is_some() {
        println!();
        println!("More tags: --page {}", page + 1);
    }
    Ok(())
}
