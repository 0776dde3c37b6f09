// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Network edges between services and the graph built from them

use crate::compose::{NetworkDefinition, ServiceContainer, ServiceIcon, ServiceNode};
use indexmap::IndexMap;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Edge color when the first shared network has no color of its own
pub const DEFAULT_EDGE_COLOR: &str = "#9CA3AF";

/// Two services joined by at least one common network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEdge {
    /// `"{source}-{target}"`
    pub id: String,
    /// Earlier service in declaration order
    pub source: String,
    /// Later service in declaration order
    pub target: String,
    /// Hex color taken from the first shared network
    pub color: String,
    /// Every network both services join, in `source` order
    pub shared_networks: Vec<String>,
}

impl NetworkEdge {
    /// Whether this edge joins `a` and `b`, in either direction
    #[must_use]
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// Networks shared by two services, in `a`'s order, without repeats
fn shared_networks<'a>(a: &'a ServiceNode, b: &ServiceNode) -> Vec<&'a str> {
    let theirs = b.network_names();
    let mut shared: Vec<&str> = Vec::new();
    for name in a.network_names() {
        if theirs.contains(&name) && !shared.contains(&name) {
            shared.push(name);
        }
    }
    shared
}

/// Compute the edge set for a document's services
///
/// Every unordered pair of services is checked once, pairs taken in
/// declaration order. A pair sharing one or more networks gets a single
/// edge colored after the first shared network in the earlier service's
/// list. Keyed `networks` sections count by their keys. The result is built
/// fresh on each call.
#[must_use]
pub fn derive_edges(
    services: &IndexMap<String, ServiceNode>,
    networks: Option<&IndexMap<String, NetworkDefinition>>,
) -> Vec<NetworkEdge> {
    let entries: Vec<(&String, &ServiceNode)> = services.iter().collect();
    let mut edges = Vec::new();

    for (i, (source, a)) in entries.iter().enumerate() {
        for (target, b) in &entries[i + 1..] {
            let shared = shared_networks(a, b);
            let Some(first) = shared.first() else {
                continue;
            };

            let color = networks
                .and_then(|n| n.get(*first))
                .and_then(|n| n.color.clone())
                .unwrap_or_else(|| DEFAULT_EDGE_COLOR.to_string());

            edges.push(NetworkEdge {
                id: format!("{source}-{target}"),
                source: (*source).clone(),
                target: (*target).clone(),
                color,
                shared_networks: shared.iter().map(|s| (*s).to_string()).collect(),
            });
        }
    }

    edges
}

/// Services and their network edges with petgraph backing for queries
pub struct NetworkTopology {
    /// Undirected graph of service names
    graph: UnGraph<String, usize>,
    /// Map from service name to node index
    node_indices: HashMap<String, NodeIndex>,
    /// Services in declaration order with their icons
    services: Vec<(String, ServiceIcon)>,
    /// Derived edges
    edges: Vec<NetworkEdge>,
    /// Network names and colors for the legend
    legend: Vec<(String, Option<String>)>,
}

impl NetworkTopology {
    /// Build the topology of a document
    #[must_use]
    pub fn from_container(container: &ServiceContainer) -> Self {
        let edges = derive_edges(&container.services, container.networks.as_ref());
        let mut graph = UnGraph::new_undirected();
        let mut node_indices = HashMap::new();

        let services: Vec<(String, ServiceIcon)> = container
            .services
            .iter()
            .map(|(name, node)| (name.clone(), node.icon.unwrap_or_default()))
            .collect();

        for (name, _) in &services {
            let idx = graph.add_node(name.clone());
            node_indices.insert(name.clone(), idx);
        }
        for (pos, edge) in edges.iter().enumerate() {
            if let (Some(&a), Some(&b)) = (
                node_indices.get(&edge.source),
                node_indices.get(&edge.target),
            ) {
                graph.add_edge(a, b, pos);
            }
        }

        let legend = container
            .networks
            .iter()
            .flatten()
            .map(|(name, def)| (name.clone(), def.color.clone()))
            .collect();

        Self {
            graph,
            node_indices,
            services,
            edges,
            legend,
        }
    }

    /// All edges in pair order
    #[must_use]
    pub fn edges(&self) -> &[NetworkEdge] {
        &self.edges
    }

    /// Consume the topology, keeping only its edges
    #[must_use]
    pub fn into_edges(self) -> Vec<NetworkEdge> {
        self.edges
    }

    /// Services sharing a network with `service`, sorted by name
    #[must_use]
    pub fn neighbors(&self, service: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(service) else {
            return Vec::new();
        };
        let mut names: Vec<&str> = self
            .graph
            .neighbors(idx)
            .map(|n| self.graph[n].as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Edges touching `service`
    #[must_use]
    pub fn edges_of(&self, service: &str) -> Vec<&NetworkEdge> {
        self.edges
            .iter()
            .filter(|e| e.source == service || e.target == service)
            .collect()
    }

    /// Services sharing no network with any other service
    #[must_use]
    pub fn isolated(&self) -> Vec<&str> {
        self.services
            .iter()
            .filter(|(name, _)| {
                self.node_indices
                    .get(name)
                    .is_some_and(|&idx| self.graph.neighbors(idx).next().is_none())
            })
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Get node count
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get edge count
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Export to DOT format for Graphviz
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("graph services {\n");
        dot.push_str("  layout=neato;\n");
        dot.push_str("  overlap=false;\n");
        dot.push_str("  node [style=rounded];\n\n");

        for (name, icon) in &self.services {
            let name = dot_escape(name);
            dot.push_str(&format!(
                "  \"{}\" [label=\"{}\", shape={}];\n",
                name,
                name,
                icon.dot_shape()
            ));
        }

        dot.push('\n');

        for edge in &self.edges {
            dot.push_str(&format!(
                "  \"{}\" -- \"{}\" [color=\"{}\", penwidth=2, tooltip=\"{}\"];\n",
                dot_escape(&edge.source),
                dot_escape(&edge.target),
                dot_escape(&edge.color),
                dot_escape(&edge.shared_networks.join(", "))
            ));
        }

        if !self.legend.is_empty() {
            dot.push_str("\n  subgraph cluster_legend {\n");
            dot.push_str("    label=\"networks\";\n");
            dot.push_str("    style=dashed;\n");
            for (name, color) in &self.legend {
                let color = dot_escape(color.as_deref().unwrap_or(DEFAULT_EDGE_COLOR));
                let name = dot_escape(name);
                dot.push_str(&format!(
                    "    \"net:{}\" [label=\"{}\", shape=note, color=\"{}\"];\n",
                    name, name, color
                ));
            }
            dot.push_str("  }\n");
        }

        dot.push_str("}\n");
        dot
    }
}

/// Escape a string for use inside a double-quoted DOT id
fn dot_escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::NetworksSpec;

    fn service(networks: &[&str]) -> ServiceNode {
        ServiceNode {
            networks: Some(NetworksSpec::List(
                networks.iter().map(|n| (*n).to_string()).collect(),
            )),
            ..ServiceNode::default()
        }
    }

    fn colored(color: &str) -> NetworkDefinition {
        NetworkDefinition {
            color: Some(color.into()),
            ..NetworkDefinition::default()
        }
    }

    #[test]
    fn test_edge_uses_first_shared_network_color() {
        let services = IndexMap::from([
            ("a".to_string(), service(&["back", "front"])),
            ("b".to_string(), service(&["front", "back"])),
        ]);
        let networks = IndexMap::from([
            ("front".to_string(), colored("#111111")),
            ("back".to_string(), colored("#222222")),
        ]);

        let edges = derive_edges(&services, Some(&networks));

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].id, "a-b");
        assert_eq!(edges[0].color, "#222222");
        assert_eq!(edges[0].shared_networks, vec!["back", "front"]);
    }

    #[test]
    fn test_uncolored_or_undeclared_network_is_gray() {
        let services = IndexMap::from([
            ("a".to_string(), service(&["ghost"])),
            ("b".to_string(), service(&["ghost"])),
        ]);

        let edges = derive_edges(&services, None);
        assert_eq!(edges[0].color, DEFAULT_EDGE_COLOR);
    }

    #[test]
    fn test_keyed_networks_count() {
        let mut keyed = ServiceNode::default();
        keyed.networks = Some(NetworksSpec::Keyed(IndexMap::from([(
            "front".to_string(),
            None,
        )])));
        let services = IndexMap::from([
            ("a".to_string(), keyed),
            ("b".to_string(), service(&["front"])),
        ]);

        let edges = derive_edges(&services, None);
        assert_eq!(edges.len(), 1);
        assert!(edges[0].connects("b", "a"));
    }

    #[test]
    fn test_services_without_networks_have_no_edges() {
        let services = IndexMap::from([
            ("a".to_string(), ServiceNode::default()),
            ("b".to_string(), ServiceNode::with_defaults()),
        ]);
        assert!(derive_edges(&services, None).is_empty());
    }

    #[test]
    fn test_topology_queries() {
        let mut doc = ServiceContainer::default();
        doc.services.insert("web".into(), service(&["front"]));
        doc.services.insert("api".into(), service(&["front", "back"]));
        doc.services.insert("db".into(), service(&["back"]));
        doc.services.insert("batch".into(), service(&[]));

        let topo = NetworkTopology::from_container(&doc);

        assert_eq!(topo.node_count(), 4);
        assert_eq!(topo.edge_count(), 2);
        assert_eq!(topo.neighbors("api"), vec!["db", "web"]);
        assert_eq!(topo.isolated(), vec!["batch"]);
        assert_eq!(topo.edges_of("db").len(), 1);
        assert!(topo.neighbors("missing").is_empty());
    }

    #[test]
    fn test_to_dot() {
        let mut doc = ServiceContainer::default();
        let mut db = service(&["back"]);
        db.icon = Some(ServiceIcon::Database);
        doc.services.insert("api".into(), service(&["back"]));
        doc.services.insert("db".into(), db);
        doc.networks = Some(IndexMap::from([("back".to_string(), colored("#52B788"))]));

        let dot = NetworkTopology::from_container(&doc).to_dot();

        assert!(dot.contains("graph services"));
        assert!(dot.contains("\"api\" -- \"db\""));
        assert!(dot.contains("#52B788"));
        assert!(dot.contains("shape=cylinder"));
    }

    #[test]
    fn test_to_dot_escapes_names() {
        let mut doc = ServiceContainer::default();
        doc.services.insert("api".into(), service(&["back"]));
        doc.services.insert("db".into(), service(&["back"]));
        doc.networks = Some(IndexMap::from([("back".to_string(), colored("#52B788"))]));
        doc.rename_service("api", "a\"b").unwrap();
        doc.rename_service("db", "c\\d").unwrap();

        let dot = NetworkTopology::from_container(&doc).to_dot();

        assert!(dot.contains(r#""a\"b" [label="a\"b""#));
        assert!(dot.contains(r#""a\"b" -- "c\\d""#));
        assert!(!dot.contains(r#""a"b""#));
    }
}
