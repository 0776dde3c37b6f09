// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Workspace store: an ordered collection of editable Compose documents

use crate::compose::ServiceContainer;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File the manager is persisted to inside the data directory
pub const WORKSPACE_FILE: &str = "workspace.json";

/// Errors raised by the workspace store
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// An item with this id is already stored
    #[error("Workspace item already exists: {0}")]
    DuplicateItem(String),

    /// No item with this id
    #[error("Workspace item not found: {0}")]
    ItemNotFound(String),

    /// An operation needed a selected item
    #[error("No workspace item selected")]
    NoSelection,

    /// Reading or writing the workspace file failed
    #[error("Failed to access {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The workspace file is not valid JSON for the model
    #[error("Invalid workspace data in {path}: {source}")]
    Json {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}

/// One editable project: a Compose document plus bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceItem {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The Compose document being edited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_container: Option<ServiceContainer>,
    /// Where the document was loaded from or saved to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// When the item was created
    pub created_at: DateTime<Utc>,
    /// When the document or metadata last changed
    pub modified_at: DateTime<Utc>,
    /// Arbitrary caller data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<IndexMap<String, Value>>,
}

impl WorkspaceItem {
    /// Create an item with no document yet
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            service_container: None,
            path: None,
            created_at: now,
            modified_at: now,
            metadata: None,
        }
    }

    /// Builder-style variant of [`Self::set_service_container`]
    #[must_use]
    pub fn with_container(mut self, container: ServiceContainer) -> Self {
        self.service_container = Some(container);
        self
    }

    /// Refresh `modified_at`
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }

    /// Replace the document
    pub fn set_service_container(&mut self, container: ServiceContainer) {
        self.service_container = Some(container);
        self.touch();
    }

    /// Merge `entries` into the metadata map
    pub fn update_metadata(&mut self, entries: IndexMap<String, Value>) {
        self.metadata.get_or_insert_with(IndexMap::new).extend(entries);
        self.touch();
    }

    /// Run `edit` against the document, creating an empty one if missing
    ///
    /// `modified_at` changes only when `edit` returns `Ok`.
    pub fn edit_container<T, E>(
        &mut self,
        edit: impl FnOnce(&mut ServiceContainer) -> Result<T, E>,
    ) -> Result<T, E> {
        let container = self
            .service_container
            .get_or_insert_with(ServiceContainer::default);
        let out = edit(container)?;
        self.touch();
        Ok(out)
    }
}

/// Fields to overwrite on an existing item; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    /// New display name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New document
    pub service_container: Option<ServiceContainer>,
    /// New file path
    pub path: Option<PathBuf>,
    /// Replacement metadata map
    pub metadata: Option<IndexMap<String, Value>>,
}

/// Ordered store of workspace items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceManager {
    /// Workspace name
    #[serde(default)]
    pub name: String,
    /// Workspace description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    items: Vec<WorkspaceItem>,
}

impl WorkspaceManager {
    /// Create an empty workspace
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            items: Vec::new(),
        }
    }

    /// Append an item; ids must be unique
    pub fn add(&mut self, item: WorkspaceItem) -> Result<(), WorkspaceError> {
        if self.contains(&item.id) {
            return Err(WorkspaceError::DuplicateItem(item.id));
        }
        debug!(id = %item.id, "Added workspace item");
        self.items.push(item);
        Ok(())
    }

    /// Remove an item, returning whether it existed
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        self.items.remove(pos);
        debug!(id, "Removed workspace item");
        true
    }

    /// Look up an item
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&WorkspaceItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Look up an item for editing
    pub fn get_mut(&mut self, id: &str) -> Option<&mut WorkspaceItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// Whether an item with this id exists
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Owned snapshot of every item in insertion order
    #[must_use]
    pub fn all(&self) -> Vec<WorkspaceItem> {
        self.items.clone()
    }

    /// Borrow every item in insertion order
    #[must_use]
    pub fn items(&self) -> &[WorkspaceItem] {
        &self.items
    }

    /// Shallow-merge `update` into an item and refresh `modified_at`
    pub fn update(&mut self, id: &str, update: ItemUpdate) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        if let Some(name) = update.name {
            item.name = name;
        }
        if let Some(description) = update.description {
            item.description = Some(description);
        }
        if let Some(container) = update.service_container {
            item.service_container = Some(container);
        }
        if let Some(path) = update.path {
            item.path = Some(path);
        }
        if let Some(metadata) = update.metadata {
            item.metadata = Some(metadata);
        }
        item.touch();
        debug!(id, "Updated workspace item");
        true
    }

    /// Drop every item
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the workspace has no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }

    /// Load the workspace from `dir`, or an empty one if no file exists yet
    pub fn load(dir: &Path) -> Result<Self, WorkspaceError> {
        let path = dir.join(WORKSPACE_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path).map_err(|source| WorkspaceError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| WorkspaceError::Json { path, source })
    }

    /// Save the workspace into `dir`, creating it if needed
    pub fn save(&self, dir: &Path) -> Result<(), WorkspaceError> {
        fs::create_dir_all(dir).map_err(|source| WorkspaceError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(WORKSPACE_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|source| WorkspaceError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| WorkspaceError::Io { path, source })
    }
}
