// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Service and network mutators on a Compose document
//!
//! Every mutator either applies fully or returns an [`EditError`] with the
//! document untouched.

use crate::compose::service::{DependsOnSpec, PortSpec};
use crate::compose::{
    is_known_version, NetworkDefinition, NetworksSpec, ServiceContainer, ServiceIcon, ServiceNode,
};
use crate::{names, palette};
use indexmap::IndexMap;
use rand::Rng;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Rejected edit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Blank service, network or project name
    #[error("Name must not be empty")]
    EmptyName,
    /// No service with that name
    #[error("Service not found: {0}")]
    ServiceNotFound(String),
    /// Target service name is taken
    #[error("Service already exists: {0}")]
    ServiceExists(String),
    /// No network with that name
    #[error("Network not found: {0}")]
    NetworkNotFound(String),
    /// Target network name is taken
    #[error("Network already exists: {0}")]
    NetworkExists(String),
    /// Blank entry for a list property
    #[error("Empty value for {0}")]
    EmptyValue(String),
    /// Property holds neither a list nor a map
    #[error("{0} is not a list")]
    NotAList(String),
    /// Removal index past the end of the property
    #[error("Index {index} out of range for {property}")]
    IndexOutOfRange {
        /// Property name
        property: String,
        /// Requested index
        index: usize,
    },
    /// Value does not fit the property's shape
    #[error("Invalid value for {property}: {reason}")]
    InvalidValue {
        /// Property name
        property: String,
        /// Deserializer message
        reason: String,
    },
    /// Port outside 1-65535
    #[error("Port out of range: {0} (expected 1-65535)")]
    InvalidPort(u32),
    /// Version not in the supported list
    #[error("Unknown Compose version: {0}")]
    UnknownVersion(String),
}

/// Result alias for edits
pub type EditResult<T> = Result<T, EditError>;

fn node_fields(node: &ServiceNode, property: &str) -> EditResult<Map<String, Value>> {
    match serde_json::to_value(node) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Ok(Map::new()),
        Err(e) => Err(EditError::InvalidValue {
            property: property.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn node_from_fields(fields: Map<String, Value>, property: &str) -> EditResult<ServiceNode> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| EditError::InvalidValue {
        property: property.to_string(),
        reason: e.to_string(),
    })
}

/// Service properties whose object form is a user-keyed map rather than a
/// fixed record
const MAP_PROPERTIES: &[&str] = &[
    "labels",
    "environment",
    "sysctls",
    "extra_hosts",
    "ulimits",
    "networks",
    "depends_on",
];

fn is_map_property(property: &str) -> bool {
    MAP_PROPERTIES.contains(&property) || property.starts_with("x-")
}

/// Key and value stored for a new entry in a map-valued property
fn map_entry(property: &str, raw: &str) -> EditResult<(String, Value)> {
    let (key, value) = match raw.split_once('=') {
        Some((key, value)) => (key.trim(), Value::from(value.trim())),
        None => match property {
            "networks" | "depends_on" | "environment" => (raw, Value::Null),
            _ => (raw, Value::from("")),
        },
    };
    if key.is_empty() {
        return Err(EditError::EmptyValue(property.to_string()));
    }
    Ok((key.to_string(), value))
}

/// First key of `expected` that did not survive into `actual`, as a dotted path
///
/// Fixed records drop keys they do not model when deserialized, which would
/// turn an edit into a silent no-op. Null entries are skipped since unset
/// fields are not serialized back.
fn dropped_key(expected: &Value, actual: Option<&Value>, path: &str) -> Option<String> {
    match (expected, actual) {
        (Value::Object(want), Some(Value::Object(have))) => {
            want.iter().filter(|(_, v)| !v.is_null()).find_map(|(key, v)| {
                let at = format!("{path}.{key}");
                match have.get(key) {
                    Some(got) => dropped_key(v, Some(got), &at),
                    None => Some(at),
                }
            })
        }
        (Value::Object(want), _) => want
            .iter()
            .find(|(_, v)| !v.is_null())
            .map(|(key, _)| format!("{path}.{key}")),
        (Value::Array(want), Some(Value::Array(have))) if want.len() == have.len() => want
            .iter()
            .zip(have)
            .enumerate()
            .find_map(|(i, (w, h))| dropped_key(w, Some(h), &format!("{path}[{i}]"))),
        (Value::Array(_), _) => Some(path.to_string()),
        _ => None,
    }
}

/// Reject an update whose value lost keys on the way into `updated`
fn check_kept(updated: &ServiceNode, property: &str, expected: &Value) -> EditResult<()> {
    let fields = node_fields(updated, property)?;
    match dropped_key(expected, fields.get(property), property) {
        Some(path) => Err(EditError::InvalidValue {
            property: property.to_string(),
            reason: format!("`{path}` is not a known key"),
        }),
        None => Ok(()),
    }
}

fn link_target(link: &str) -> &str {
    link.split_once(':').map_or(link, |(service, _)| service)
}

fn check_port(port: u32) -> EditResult<u16> {
    u16::try_from(port)
        .ok()
        .filter(|p| *p > 0)
        .ok_or(EditError::InvalidPort(port))
}

impl ServiceContainer {
    fn service_mut(&mut self, name: &str) -> EditResult<&mut ServiceNode> {
        self.services
            .get_mut(name)
            .ok_or_else(|| EditError::ServiceNotFound(name.to_string()))
    }

    fn service_ref(&self, name: &str) -> EditResult<&ServiceNode> {
        self.services
            .get(name)
            .ok_or_else(|| EditError::ServiceNotFound(name.to_string()))
    }

    // =====================================================================
    // Document header
    // =====================================================================

    /// Set the Compose project name
    pub fn set_project_name(&mut self, name: &str) -> EditResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::EmptyName);
        }
        self.name = Some(name.to_string());
        Ok(())
    }

    /// Set the file format version; an empty string clears it
    pub fn set_version(&mut self, version: &str) -> EditResult<()> {
        let version = version.trim();
        if version.is_empty() {
            self.version = None;
            return Ok(());
        }
        if !is_known_version(version) {
            return Err(EditError::UnknownVersion(version.to_string()));
        }
        self.version = Some(version.to_string());
        Ok(())
    }

    // =====================================================================
    // Services
    // =====================================================================

    /// Add a service with a generated `adjective_noun` name and default fields
    pub fn add_service<R: Rng + ?Sized>(&mut self, rng: &mut R) -> String {
        let name = names::unique_service_name(rng, |n| self.services.contains_key(n));
        self.services.insert(name.clone(), ServiceNode::with_defaults());
        debug!(service = %name, "Added service");
        name
    }

    /// Move a service to a new key, keeping its position
    ///
    /// `depends_on` and `links` entries in other services follow the rename.
    pub fn rename_service(&mut self, old: &str, new: &str) -> EditResult<()> {
        let new = new.trim();
        if new.is_empty() {
            return Err(EditError::EmptyName);
        }
        let index = self
            .services
            .get_index_of(old)
            .ok_or_else(|| EditError::ServiceNotFound(old.to_string()))?;
        if new == old {
            return Ok(());
        }
        if self.services.contains_key(new) {
            return Err(EditError::ServiceExists(new.to_string()));
        }

        if let Some(node) = self.services.shift_remove(old) {
            self.services.shift_insert(index, new.to_string(), node);
        }
        for node in self.services.values_mut() {
            rename_dependency(node, old, new);
        }
        debug!(from = old, to = new, "Renamed service");
        Ok(())
    }

    /// Delete a service and drop references to it from other services
    pub fn remove_service(&mut self, name: &str) -> EditResult<ServiceNode> {
        let removed = self
            .services
            .shift_remove(name)
            .ok_or_else(|| EditError::ServiceNotFound(name.to_string()))?;

        for node in self.services.values_mut() {
            if let Some(deps) = node.depends_on.as_mut() {
                if deps.remove(name) && deps.is_empty() {
                    node.depends_on = None;
                }
            }
            if let Some(links) = node.links.as_mut() {
                let before = links.len();
                links.retain(|l| link_target(l) != name);
                if links.len() < before && links.is_empty() {
                    node.links = None;
                }
            }
        }
        debug!(service = name, "Removed service");
        Ok(removed)
    }

    /// Assign a field by its Compose key
    ///
    /// No semantic validation happens here; the value only has to fit the
    /// field's shape. `null` unsets the field.
    pub fn update_service_property(
        &mut self,
        service: &str,
        property: &str,
        value: Value,
    ) -> EditResult<()> {
        if property.trim().is_empty() {
            return Err(EditError::EmptyName);
        }
        let mut fields = node_fields(self.service_ref(service)?, property)?;
        let expected = value.clone();
        if value.is_null() {
            fields.remove(property);
        } else {
            fields.insert(property.to_string(), value);
        }
        let updated = node_from_fields(fields, property)?;
        check_kept(&updated, property, &expected)?;
        *self.service_mut(service)? = updated;
        debug!(service, property, "Updated service property");
        Ok(())
    }

    /// Append an entry to a list property
    ///
    /// Map-valued properties get a `KEY=VALUE` (or bare `KEY`) entry instead,
    /// so a keyed `networks` or `depends_on` keeps its form. Record-valued
    /// properties such as `deploy` are rejected. Anything else is replaced by
    /// a one-element list.
    pub fn add_array_item(&mut self, service: &str, property: &str, value: &str) -> EditResult<()> {
        let value = value.trim();
        if value.is_empty() {
            return Err(EditError::EmptyValue(property.to_string()));
        }
        let mut fields = node_fields(self.service_ref(service)?, property)?;

        let entry = match fields.remove(property) {
            Some(Value::Array(mut items)) => {
                items.push(Value::from(value));
                Value::Array(items)
            }
            Some(Value::Object(mut map)) => {
                if !is_map_property(property) {
                    return Err(EditError::NotAList(property.to_string()));
                }
                let (key, entry) = map_entry(property, value)?;
                map.insert(key, entry);
                Value::Object(map)
            }
            _ => Value::Array(vec![Value::from(value)]),
        };
        fields.insert(property.to_string(), entry.clone());

        let updated = node_from_fields(fields, property)?;
        check_kept(&updated, property, &entry)?;
        *self.service_mut(service)? = updated;
        debug!(service, property, value, "Added list entry");
        Ok(())
    }

    /// Remove the entry at `index` from a list or map property
    ///
    /// Removing the last entry unsets the property.
    pub fn remove_array_item(&mut self, service: &str, property: &str, index: usize) -> EditResult<()> {
        let mut fields = node_fields(self.service_ref(service)?, property)?;
        let out_of_range = || EditError::IndexOutOfRange {
            property: property.to_string(),
            index,
        };

        let remaining = match fields.remove(property) {
            Some(Value::Array(mut items)) => {
                if index >= items.len() {
                    return Err(out_of_range());
                }
                items.remove(index);
                (!items.is_empty()).then_some(Value::Array(items))
            }
            Some(Value::Object(map)) => {
                if index >= map.len() {
                    return Err(out_of_range());
                }
                let kept: Map<String, Value> = map
                    .into_iter()
                    .enumerate()
                    .filter(|(i, _)| *i != index)
                    .map(|(_, entry)| entry)
                    .collect();
                (!kept.is_empty()).then_some(Value::Object(kept))
            }
            _ => return Err(EditError::NotAList(property.to_string())),
        };
        if let Some(value) = remaining {
            fields.insert(property.to_string(), value);
        }

        let updated = node_from_fields(fields, property)?;
        *self.service_mut(service)? = updated;
        debug!(service, property, index, "Removed list entry");
        Ok(())
    }

    /// Attach a service to a network; returns false if it was already attached
    pub fn add_network_to_service(&mut self, service: &str, network: &str) -> EditResult<bool> {
        let network = network.trim();
        if network.is_empty() {
            return Err(EditError::EmptyName);
        }
        let node = self.service_mut(service)?;
        let added = node.networks.get_or_insert_with(Default::default).insert(network);
        if added {
            debug!(service, network, "Attached service to network");
        }
        Ok(added)
    }

    /// Publish `container` on host port `local` as a `"local:container"` entry
    pub fn add_port_to_service(&mut self, service: &str, local: u32, container: u32) -> EditResult<()> {
        let local = check_port(local)?;
        let container = check_port(container)?;
        let node = self.service_mut(service)?;
        node.ports
            .get_or_insert_with(Vec::new)
            .push(PortSpec::Short(format!("{local}:{container}")));
        Ok(())
    }

    /// Change the canvas icon of a service
    pub fn set_service_icon(&mut self, service: &str, icon: ServiceIcon) -> EditResult<()> {
        self.service_mut(service)?.icon = Some(icon);
        Ok(())
    }

    // =====================================================================
    // Networks
    // =====================================================================

    /// Declare a network and give it a palette color not used by any other
    /// network in this document
    ///
    /// Returns the assigned color.
    pub fn add_network<R: Rng + ?Sized>(
        &mut self,
        name: &str,
        definition: NetworkDefinition,
        rng: &mut R,
    ) -> EditResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::EmptyName);
        }
        let networks = self.networks.get_or_insert_with(IndexMap::new);
        if networks.contains_key(name) {
            return Err(EditError::NetworkExists(name.to_string()));
        }

        let color = {
            let used = palette::used_colors(networks);
            palette::pick_color(&used, rng).to_string()
        };
        networks.insert(
            name.to_string(),
            NetworkDefinition {
                color: Some(color.clone()),
                ..definition
            },
        );
        debug!(network = name, color = %color, "Added network");
        Ok(color)
    }

    /// Replace a network definition, optionally renaming it
    ///
    /// The network keeps its color whatever the new definition says.
    /// Services attached under the old name follow a rename.
    pub fn update_network(
        &mut self,
        original: &str,
        name: &str,
        definition: NetworkDefinition,
    ) -> EditResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditError::EmptyName);
        }
        let not_found = || EditError::NetworkNotFound(original.to_string());
        let networks = self.networks.as_mut().ok_or_else(not_found)?;
        let index = networks.get_index_of(original).ok_or_else(not_found)?;
        if name != original && networks.contains_key(name) {
            return Err(EditError::NetworkExists(name.to_string()));
        }

        let color = networks
            .get_index(index)
            .and_then(|(_, existing)| existing.color.clone());
        let definition = NetworkDefinition { color, ..definition };

        if name == original {
            if let Some((_, slot)) = networks.get_index_mut(index) {
                *slot = definition;
            }
        } else {
            networks.shift_remove_index(index);
            networks.shift_insert(index, name.to_string(), definition);
            for node in self.services.values_mut() {
                rename_network(node, original, name);
            }
        }
        debug!(from = original, to = name, "Updated network");
        Ok(())
    }

    /// Delete a network and detach every service from it
    pub fn remove_network(&mut self, name: &str) -> EditResult<NetworkDefinition> {
        let removed = self
            .networks
            .as_mut()
            .and_then(|n| n.shift_remove(name))
            .ok_or_else(|| EditError::NetworkNotFound(name.to_string()))?;

        for node in self.services.values_mut() {
            if let Some(networks) = node.networks.as_mut() {
                if networks.remove(name) && networks.is_empty() {
                    node.networks = None;
                }
            }
        }
        debug!(network = name, "Removed network");
        Ok(removed)
    }
}

fn rename_network(node: &mut ServiceNode, old: &str, new: &str) {
    match node.networks.as_mut() {
        Some(NetworksSpec::List(names)) => {
            for n in names.iter_mut().filter(|n| *n == old) {
                *n = new.to_string();
            }
        }
        Some(NetworksSpec::Keyed(map)) => {
            if let Some(index) = map.get_index_of(old) {
                if let Some(attachment) = map.shift_remove(old) {
                    map.shift_insert(index, new.to_string(), attachment);
                }
            }
        }
        None => {}
    }
}

fn rename_dependency(node: &mut ServiceNode, old: &str, new: &str) {
    match node.depends_on.as_mut() {
        Some(DependsOnSpec::List(names)) => {
            for n in names.iter_mut().filter(|n| *n == old) {
                *n = new.to_string();
            }
        }
        Some(DependsOnSpec::Keyed(map)) => {
            if let Some(index) = map.get_index_of(old) {
                if let Some(condition) = map.shift_remove(old) {
                    map.shift_insert(index, new.to_string(), condition);
                }
            }
        }
        None => {}
    }
    if let Some(links) = node.links.as_mut() {
        for link in links.iter_mut() {
            if link_target(link) == old {
                *link = match link.split_once(':') {
                    Some((_, alias)) => format!("{new}:{alias}"),
                    None => new.to_string(),
                };
            }
        }
    }
}
