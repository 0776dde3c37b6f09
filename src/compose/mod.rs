// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! In-memory model of a Docker Compose document

pub mod network;
pub mod service;

pub use network::{
    ExternalSpec, IpamPool, IpamSpec, NetworkDefinition, SecretConfigDefinition, VolumeDefinition,
};
pub use service::{NetworksSpec, ServiceIcon, ServiceNode};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Compose file format versions the editor offers, newest first
///
/// An unset version means a version-less (Compose Specification) file.
pub const COMPOSE_VERSIONS: &[&str] = &[
    "latest", "3.9", "3.8", "3.7", "3.6", "3.5", "3.4", "3.3", "3.2", "3.1", "3.0", "2.4", "2.3",
    "2.2", "2.1", "2.0", "1.0",
];

/// Whether `version` is one of [`COMPOSE_VERSIONS`]
#[must_use]
pub fn is_known_version(version: &str) -> bool {
    COMPOSE_VERSIONS.contains(&version)
}

/// A complete Compose document: services plus top-level networks, volumes,
/// secrets and configs
///
/// Service keys are unique and their insertion order is the default canvas
/// layout order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceContainer {
    /// Compose project name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// File format version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Services by name
    #[serde(default)]
    pub services: IndexMap<String, ServiceNode>,
    /// Networks by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<IndexMap<String, NetworkDefinition>>,
    /// Volumes by name; a null entry declares a default local volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<IndexMap<String, Option<VolumeDefinition>>>,
    /// Secrets by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<IndexMap<String, SecretConfigDefinition>>,
    /// Configs by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configs: Option<IndexMap<String, SecretConfigDefinition>>,
}

impl ServiceContainer {
    /// An empty document with a project name
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Look up a network definition
    #[must_use]
    pub fn network(&self, name: &str) -> Option<&NetworkDefinition> {
        self.networks.as_ref().and_then(|n| n.get(name))
    }

    /// Number of declared networks
    #[must_use]
    pub fn network_count(&self) -> usize {
        self.networks.as_ref().map_or(0, IndexMap::len)
    }

    /// Copy of the document with canvas-only metadata removed
    ///
    /// Network `color` and service `icon` are dropped; what remains is plain
    /// Compose.
    #[must_use]
    pub fn to_compose(&self) -> Self {
        let mut doc = self.clone();
        for service in doc.services.values_mut() {
            service.icon = None;
        }
        if let Some(networks) = doc.networks.as_mut() {
            for network in networks.values_mut() {
                network.color = None;
            }
        }
        doc
    }

    /// Render the document as Compose YAML
    pub fn to_compose_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.to_compose())
    }
}
