// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Stackyard library - visual workspace for Docker Compose stacks
//!
//! This crate holds the editing core behind the canvas: a workspace of
//! Compose documents, service and network CRUD, network color allocation,
//! shared-network edge derivation and a small Docker Hub client.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod commands;
pub mod compose;
pub mod config;
pub mod edit;
pub mod hub;
pub mod names;
pub mod palette;
pub mod session;
pub mod topology;
pub mod workspace;

/// Prelude for common imports
pub mod prelude {
    pub use crate::compose::{NetworkDefinition, NetworksSpec, ServiceContainer, ServiceIcon, ServiceNode};
    pub use crate::edit::{EditError, EditResult};
    pub use crate::session::{Session, SessionError};
    pub use crate::topology::{derive_edges, NetworkEdge, NetworkTopology};
    pub use crate::workspace::{ItemUpdate, WorkspaceError, WorkspaceItem, WorkspaceManager};
    pub use anyhow::{Context, Result};
}
