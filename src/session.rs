// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Editing session: the workspace, the current selection and canvas state
//!
//! Every edit a UI or CLI performs goes through a [`Session`]. It resolves
//! the selected workspace item, applies the edit to that item's Compose
//! document and keeps the selection state in step with renames and
//! deletions.

use crate::compose::{NetworkDefinition, ServiceContainer, ServiceIcon};
use crate::edit::EditError;
use crate::names;
use crate::topology::{derive_edges, NetworkEdge};
use crate::workspace::{WorkspaceError, WorkspaceItem, WorkspaceManager};
use chrono::Utc;
use indexmap::IndexSet;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// File the session is persisted to inside the data directory
///
/// The workspace fields sit at the top level, so the file also loads as a
/// plain [`WorkspaceManager`].
pub const SESSION_FILE: &str = crate::workspace::WORKSPACE_FILE;

/// Why a session edit did not happen
#[derive(Debug, Error)]
pub enum SessionError {
    /// Workspace lookup or persistence failed
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// The document rejected the edit
    #[error(transparent)]
    Edit(#[from] EditError),
}

/// Result of a session operation
pub type SessionResult<T> = Result<T, SessionError>;

/// Canvas state that follows the document but is not part of it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    /// Service highlighted on the canvas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_service: Option<String>,
    /// Services drawn collapsed
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub collapsed_services: IndexSet<String>,
}

impl UiState {
    fn rename(&mut self, old: &str, new: &str) {
        if self.selected_service.as_deref() == Some(old) {
            self.selected_service = Some(new.to_string());
        }
        if let Some(index) = self.collapsed_services.get_index_of(old) {
            self.collapsed_services.shift_remove(old);
            self.collapsed_services.shift_insert(index, new.to_string());
        }
    }

    fn forget(&mut self, service: &str) {
        if self.selected_service.as_deref() == Some(service) {
            self.selected_service = None;
        }
        self.collapsed_services.shift_remove(service);
    }
}

/// The workspace plus what the user is currently looking at
#[derive(Debug, Serialize, Deserialize)]
pub struct Session {
    /// All workspace items
    #[serde(flatten)]
    pub manager: WorkspaceManager,
    /// Id of the item being edited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_item: Option<String>,
    /// Canvas state for the selected item
    #[serde(default)]
    pub ui: UiState,
    #[serde(skip, default = "StdRng::from_entropy")]
    rng: StdRng,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// An empty session seeded from the OS
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// An empty session with a fixed random source
    #[must_use]
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            manager: WorkspaceManager::default(),
            selected_item: None,
            ui: UiState::default(),
            rng,
        }
    }

    /// Load the session from `dir`, or an empty one if none was saved
    pub fn load(dir: &Path) -> Result<Self, WorkspaceError> {
        let path = dir.join(SESSION_FILE);
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(&path).map_err(|source| WorkspaceError::Io {
            path: path.clone(),
            source,
        })?;
        let mut session: Self = serde_json::from_str(&content)
            .map_err(|source| WorkspaceError::Json { path, source })?;

        if let Some(id) = session.selected_item.as_deref() {
            if !session.manager.contains(id) {
                warn!(id, "Selected item no longer exists; clearing selection");
                session.selected_item = None;
                session.ui = UiState::default();
            }
        }
        Ok(session)
    }

    /// Save the session into `dir`
    pub fn save(&self, dir: &Path) -> Result<(), WorkspaceError> {
        fs::create_dir_all(dir).map_err(|source| WorkspaceError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(SESSION_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|source| WorkspaceError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| WorkspaceError::Io { path, source })
    }

    // =====================================================================
    // Workspace items
    // =====================================================================

    /// Create an item with a generated name and an empty document, select
    /// it and return its id
    pub fn add_workspace_item(&mut self) -> String {
        let name = names::item_name(&mut self.rng);
        let base = format!("item-{}", Utc::now().timestamp_millis());
        let id = if self.manager.contains(&base) {
            (1..)
                .map(|n| format!("{base}-{n}"))
                .find(|candidate| !self.manager.contains(candidate))
                .unwrap_or(base)
        } else {
            base
        };

        let item =
            WorkspaceItem::new(id.clone(), name.clone()).with_container(ServiceContainer::named(name));
        if let Err(err) = self.manager.add(item) {
            warn!(error = %err, "Generated item id collided");
        }
        self.select_item(&id);
        id
    }

    /// Remove an item, clearing the selection if it was selected
    pub fn remove_workspace_item(&mut self, id: &str) -> bool {
        let removed = self.manager.remove(id);
        if removed && self.selected_item.as_deref() == Some(id) {
            self.selected_item = None;
            self.ui = UiState::default();
        }
        removed
    }

    /// Make `id` the item being edited
    pub fn select_item(&mut self, id: &str) -> bool {
        if !self.manager.contains(id) {
            return false;
        }
        if self.selected_item.as_deref() != Some(id) {
            self.ui = UiState::default();
        }
        self.selected_item = Some(id.to_string());
        true
    }

    /// The selected item, if any
    #[must_use]
    pub fn selected(&self) -> Option<&WorkspaceItem> {
        self.selected_item
            .as_deref()
            .and_then(|id| self.manager.get(id))
    }

    /// The selected item's document, if any
    #[must_use]
    pub fn container(&self) -> Option<&ServiceContainer> {
        self.selected().and_then(|i| i.service_container.as_ref())
    }

    /// Change an item's display name
    pub fn rename_item(&mut self, id: &str, name: &str) -> SessionResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::EmptyName.into());
        }
        let item = self
            .manager
            .get_mut(id)
            .ok_or_else(|| WorkspaceError::ItemNotFound(id.to_string()))?;
        item.name = name.to_string();
        item.touch();
        Ok(())
    }

    fn edit<T>(
        &mut self,
        edit: impl FnOnce(&mut ServiceContainer, &mut StdRng) -> Result<T, EditError>,
    ) -> SessionResult<T> {
        let id = self
            .selected_item
            .as_deref()
            .ok_or(WorkspaceError::NoSelection)?;
        let item = self
            .manager
            .get_mut(id)
            .ok_or_else(|| WorkspaceError::ItemNotFound(id.to_string()))?;
        let rng = &mut self.rng;
        let out = item.edit_container(|doc| edit(doc, rng))?;
        Ok(out)
    }

    // =====================================================================
    // Document header
    // =====================================================================

    /// Set the selected document's project name
    pub fn set_compose_name(&mut self, name: &str) -> SessionResult<()> {
        self.edit(|doc, _| doc.set_project_name(name))
    }

    /// Set the selected document's file format version
    pub fn set_compose_version(&mut self, version: &str) -> SessionResult<()> {
        self.edit(|doc, _| doc.set_version(version))
    }

    // =====================================================================
    // Services
    // =====================================================================

    /// Add a generated service to the selected document
    ///
    /// Returns `None` when no item is selected.
    pub fn add_service(&mut self) -> Option<String> {
        self.edit(|doc, rng| Ok(doc.add_service(rng))).ok()
    }

    /// Delete a service from the selected document
    pub fn remove_service(&mut self, service: &str) -> SessionResult<()> {
        self.edit(|doc, _| doc.remove_service(service))?;
        self.ui.forget(service);
        Ok(())
    }

    /// Rename a service in the selected document
    pub fn rename_service(&mut self, old: &str, new: &str) -> SessionResult<()> {
        self.edit(|doc, _| doc.rename_service(old, new))?;
        self.ui.rename(old, new.trim());
        Ok(())
    }

    /// Assign a service field by its Compose key
    pub fn update_service_property(
        &mut self,
        service: &str,
        property: &str,
        value: Value,
    ) -> SessionResult<()> {
        self.edit(|doc, _| doc.update_service_property(service, property, value))
    }

    /// Append to a list or map property
    pub fn add_array_item(&mut self, service: &str, property: &str, value: &str) -> SessionResult<()> {
        self.edit(|doc, _| doc.add_array_item(service, property, value))
    }

    /// Remove an entry from a list or map property
    pub fn remove_array_item(
        &mut self,
        service: &str,
        property: &str,
        index: usize,
    ) -> SessionResult<()> {
        self.edit(|doc, _| doc.remove_array_item(service, property, index))
    }

    /// Attach a service to a network
    pub fn add_network_to_service(&mut self, service: &str, network: &str) -> SessionResult<bool> {
        self.edit(|doc, _| doc.add_network_to_service(service, network))
    }

    /// Publish a port on a service
    pub fn add_port_to_service(
        &mut self,
        service: &str,
        local: u32,
        container: u32,
    ) -> SessionResult<()> {
        self.edit(|doc, _| doc.add_port_to_service(service, local, container))
    }

    /// Change a service's canvas icon
    pub fn set_service_icon(&mut self, service: &str, icon: ServiceIcon) -> SessionResult<()> {
        self.edit(|doc, _| doc.set_service_icon(service, icon))
    }

    /// Highlight a service on the canvas
    pub fn select_service(&mut self, service: Option<&str>) -> SessionResult<()> {
        if let Some(name) = service {
            let exists = self
                .container()
                .is_some_and(|doc| doc.services.contains_key(name));
            if !exists {
                return Err(EditError::ServiceNotFound(name.to_string()).into());
            }
        }
        self.ui.selected_service = service.map(str::to_string);
        Ok(())
    }

    /// Flip a service between collapsed and expanded; returns the new state
    pub fn toggle_collapsed(&mut self, service: &str) -> bool {
        if self.ui.collapsed_services.shift_remove(service) {
            false
        } else {
            self.ui.collapsed_services.insert(service.to_string());
            true
        }
    }

    // =====================================================================
    // Networks
    // =====================================================================

    /// Declare a network in the selected document; returns its color
    pub fn add_network(&mut self, name: &str, definition: NetworkDefinition) -> SessionResult<String> {
        self.edit(|doc, rng| doc.add_network(name, definition, rng))
    }

    /// Replace or rename a network in the selected document
    pub fn update_network(
        &mut self,
        original: &str,
        name: &str,
        definition: NetworkDefinition,
    ) -> SessionResult<()> {
        self.edit(|doc, _| doc.update_network(original, name, definition))
    }

    /// Delete a network from the selected document
    pub fn remove_network(&mut self, name: &str) -> SessionResult<()> {
        self.edit(|doc, _| doc.remove_network(name))?;
        Ok(())
    }

    /// Edges between services of the selected document
    #[must_use]
    pub fn network_edges(&self) -> Vec<NetworkEdge> {
        let edges = self
            .container()
            .map(|doc| derive_edges(&doc.services, doc.networks.as_ref()))
            .unwrap_or_default();
        debug!(count = edges.len(), "Derived network edges");
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> Session {
        Session::with_rng(StdRng::seed_from_u64(9))
    }

    #[test]
    fn test_add_workspace_item_selects_empty_document() {
        let mut s = session();
        let id = s.add_workspace_item();

        assert_eq!(s.manager.len(), 1);
        assert_eq!(s.selected_item.as_deref(), Some(id.as_str()));
        let doc = s.container().unwrap();
        assert!(doc.services.is_empty());
        assert_eq!(doc.name.as_deref(), Some(s.selected().unwrap().name.as_str()));
    }

    #[test]
    fn test_item_ids_do_not_collide() {
        let mut s = session();
        let a = s.add_workspace_item();
        let b = s.add_workspace_item();
        assert_ne!(a, b);
        assert_eq!(s.manager.len(), 2);
    }

    #[test]
    fn test_add_service_without_selection() {
        let mut s = session();
        assert!(s.add_service().is_none());
        assert!(matches!(
            s.add_network("net", NetworkDefinition::default()),
            Err(SessionError::Workspace(WorkspaceError::NoSelection))
        ));
    }

    #[test]
    fn test_rename_service_moves_ui_state() {
        let mut s = session();
        s.add_workspace_item();
        let name = s.add_service().unwrap();
        s.select_service(Some(&name)).unwrap();
        s.toggle_collapsed(&name);

        s.rename_service(&name, "api").unwrap();

        assert_eq!(s.ui.selected_service.as_deref(), Some("api"));
        assert!(s.ui.collapsed_services.contains("api"));
        assert!(!s.ui.collapsed_services.contains(&name));
    }

    #[test]
    fn test_remove_service_clears_ui_state() {
        let mut s = session();
        s.add_workspace_item();
        let name = s.add_service().unwrap();
        s.select_service(Some(&name)).unwrap();

        s.remove_service(&name).unwrap();

        assert!(s.ui.selected_service.is_none());
        assert!(s.container().unwrap().services.is_empty());
    }

    #[test]
    fn test_failed_edit_keeps_modified_at() {
        let mut s = session();
        let id = s.add_workspace_item();
        let before = s.manager.get(&id).unwrap().modified_at;

        assert!(s.rename_service("missing", "x").is_err());
        assert_eq!(s.manager.get(&id).unwrap().modified_at, before);
    }

    #[test]
    fn test_edges_follow_edits() {
        let mut s = session();
        s.add_workspace_item();
        let a = s.add_service().unwrap();
        let b = s.add_service().unwrap();
        let color = s.add_network("shared", NetworkDefinition::default()).unwrap();
        s.add_network_to_service(&a, "shared").unwrap();
        s.add_network_to_service(&b, "shared").unwrap();

        let edges = s.network_edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].color, color);

        s.remove_network("shared").unwrap();
        assert!(s.network_edges().is_empty());
    }

    #[test]
    fn test_remove_selected_item_clears_selection() {
        let mut s = session();
        let id = s.add_workspace_item();

        assert!(s.remove_workspace_item(&id));
        assert!(s.selected_item.is_none());
        assert!(!s.remove_workspace_item(&id));
    }

    #[test]
    fn test_property_edit_through_session() {
        let mut s = session();
        s.add_workspace_item();
        let name = s.add_service().unwrap();

        s.update_service_property(&name, "image", json!("redis:7")).unwrap();

        let doc = s.container().unwrap();
        assert_eq!(doc.services[&name].image.as_deref(), Some("redis:7"));
    }

    #[test]
    fn test_session_file_loads_as_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session();
        s.add_workspace_item();
        s.save(dir.path()).unwrap();

        let manager = WorkspaceManager::load(dir.path()).unwrap();
        assert_eq!(manager, s.manager);
    }

    #[test]
    fn test_save_and_load_keeps_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session();
        let id = s.add_workspace_item();
        s.add_service();
        s.save(dir.path()).unwrap();

        let loaded = Session::load(dir.path()).unwrap();
        assert_eq!(loaded.selected_item.as_deref(), Some(id.as_str()));
        assert_eq!(loaded.container().unwrap().services.len(), 1);
    }
}
