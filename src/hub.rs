// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Docker Hub search client
//!
//! Two read-only calls against the public v2 API: repository search and a
//! repository's tag list. There is no retry and no caching, and any debounce
//! belongs to the caller.

use crate::config::HubConfig;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Docker Hub request failures
#[derive(Debug, Error)]
pub enum HubError {
    /// Connection, timeout or body decoding failure
    #[error("Docker Hub request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Docker Hub API error: {status} {reason}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase
        reason: String,
    },
}

/// One search hit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct Repository {
    pub repo_name: String,
    pub short_description: String,
    pub star_count: u64,
    pub pull_count: u64,
    pub repo_owner: String,
    pub is_automated: bool,
    pub is_official: bool,
}

/// A page of search hits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    /// Total hits across all pages
    pub count: u64,
    /// URL of the next page
    pub next: Option<String>,
    /// URL of the previous page
    pub previous: Option<String>,
    /// Hits on this page
    pub results: Vec<Repository>,
}

/// A platform image behind a tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct TagImage {
    pub architecture: String,
    pub features: Option<String>,
    pub variant: Option<String>,
    pub digest: Option<String>,
    pub os: String,
    pub os_features: Option<String>,
    pub os_version: Option<String>,
    pub size: u64,
    pub status: Option<String>,
    pub last_pulled: Option<String>,
    pub last_pushed: Option<String>,
}

/// One repository tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct Tag {
    pub creator: Option<u64>,
    pub id: u64,
    pub images: Vec<TagImage>,
    pub last_updated: Option<String>,
    pub last_updater: Option<u64>,
    pub last_updater_username: Option<String>,
    pub name: String,
    pub repository: Option<u64>,
    pub full_size: u64,
    pub v2: bool,
    pub tag_status: Option<String>,
    pub tag_last_pulled: Option<String>,
    pub tag_last_pushed: Option<String>,
    pub media_type: Option<String>,
    pub content_type: Option<String>,
    pub digest: Option<String>,
}

/// A page of tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagsResponse {
    /// Total tags across all pages
    pub count: u64,
    /// URL of the next page
    pub next: Option<String>,
    /// URL of the previous page
    pub previous: Option<String>,
    /// Tags on this page
    pub results: Vec<Tag>,
}

/// Official images live under `library/`; bare names are qualified
#[must_use]
pub fn qualify_repository(name: &str) -> String {
    if name.contains('/') {
        name.to_string()
    } else {
        format!("library/{name}")
    }
}

/// Async client for the Docker Hub v2 API
#[derive(Debug, Clone)]
pub struct DockerHubClient {
    http: Client,
    base_url: String,
}

impl DockerHubClient {
    /// Build a client from configuration
    pub fn new(config: &HubConfig) -> Result<Self, HubError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, &config.base_url))
    }

    /// Use an existing `reqwest` client
    #[must_use]
    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// API root this client talks to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// First page of repositories matching `query`
    pub async fn search_repositories(&self, query: &str) -> Result<SearchResponse, HubError> {
        let url = format!("{}/search/repositories/", self.base_url);
        self.get_json(&url, &[("query", query.to_string())]).await
    }

    /// A given page of repositories matching `query`
    pub async fn search_repositories_page(
        &self,
        query: &str,
        page: u32,
    ) -> Result<SearchResponse, HubError> {
        let url = format!("{}/search/repositories/", self.base_url);
        self.get_json(
            &url,
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    /// Tags of a repository; a bare name like `alpine` means `library/alpine`
    pub async fn repository_tags(
        &self,
        repository: &str,
        page_size: u32,
        page: u32,
    ) -> Result<TagsResponse, HubError> {
        let url = format!(
            "{}/repositories/{}/tags/",
            self.base_url,
            qualify_repository(repository)
        );
        self.get_json(
            &url,
            &[("page_size", page_size.to_string()), ("page", page.to_string())],
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, HubError> {
        debug!(url, "Docker Hub request");
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .inspect_err(|err| warn!(url, error = %err, "Docker Hub request failed"))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Docker Hub API error");
            return Err(status_error(status));
        }

        let body = response
            .json()
            .await
            .inspect_err(|err| warn!(url, error = %err, "Docker Hub response was not understood"))?;
        Ok(body)
    }
}

fn status_error(status: StatusCode) -> HubError {
    HubError::Status {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}
