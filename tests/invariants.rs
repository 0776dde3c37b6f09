// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for the stackyard editing core
//!
//! These tests verify critical invariants:
//! 1. Workspace store - ids stay unique and removal is idempotent
//! 2. Service and network CRUD - rejected edits change nothing
//! 3. Edge derivation - one edge per pair sharing a network, none otherwise

use indexmap::IndexMap;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use stackyard::compose::{NetworkDefinition, NetworksSpec, ServiceContainer, ServiceNode};
use stackyard::edit::EditError;
use stackyard::palette::{FALLBACK_COLOR, NETWORK_COLORS};
use stackyard::session::Session;
use stackyard::topology::{derive_edges, DEFAULT_EDGE_COLOR};
use stackyard::workspace::{WorkspaceItem, WorkspaceManager};
use std::collections::HashSet;

// =============================================================================
// Test Helpers
// =============================================================================

fn rng() -> StdRng {
    StdRng::seed_from_u64(2025)
}

fn on_networks(networks: &[&str]) -> ServiceNode {
    let mut node = ServiceNode::with_defaults();
    node.networks = Some(NetworksSpec::List(
        networks.iter().map(|n| (*n).to_string()).collect(),
    ));
    node
}

fn colored(color: &str) -> NetworkDefinition {
    NetworkDefinition {
        color: Some(color.to_string()),
        ..NetworkDefinition::bridge()
    }
}

// =============================================================================
// Workspace Store
// =============================================================================

#[test]
fn test_remove_then_get_is_absent() {
    let mut ws = WorkspaceManager::new("test");
    ws.add(WorkspaceItem::new("item-1", "One")).unwrap();
    ws.add(WorkspaceItem::new("item-2", "Two")).unwrap();

    assert!(ws.remove("item-1"));
    assert!(ws.get("item-1").is_none());
    assert!(!ws.remove("item-1"));
    assert_eq!(ws.len(), 1);
}

#[test]
fn test_new_item_on_empty_workspace() {
    let mut session = Session::with_rng(rng());
    assert!(session.manager.is_empty());

    session.add_workspace_item();

    assert_eq!(session.manager.len(), 1);
    let item = &session.manager.items()[0];
    let doc = item.service_container.as_ref().unwrap();
    assert!(doc.services.is_empty());
}

#[test]
fn test_insertion_order_survives_save() {
    let dir = tempfile::tempdir().unwrap();
    let mut ws = WorkspaceManager::new("ordered");
    for id in ["c", "a", "b"] {
        ws.add(WorkspaceItem::new(id, id.to_uppercase())).unwrap();
    }
    ws.save(dir.path()).unwrap();

    let loaded = WorkspaceManager::load(dir.path()).unwrap();
    let ids: Vec<&str> = loaded.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

// =============================================================================
// Service CRUD
// =============================================================================

#[test]
fn test_rename_onto_existing_fails_without_change() {
    let mut doc = ServiceContainer::default();
    doc.services.insert("web".into(), on_networks(&["front"]));
    doc.services.insert("db".into(), on_networks(&["back"]));
    let before = doc.clone();

    let err = doc.rename_service("web", "db").unwrap_err();

    assert_eq!(err, EditError::ServiceExists("db".into()));
    assert_eq!(doc, before);
}

#[test]
fn test_consecutive_add_service_never_collides() {
    let mut doc = ServiceContainer::default();
    let mut rng = rng();
    let mut seen = HashSet::new();

    for _ in 0..200 {
        let name = doc.add_service(&mut rng);
        assert!(seen.insert(name));
    }
    assert_eq!(doc.services.len(), 200);
}

#[test]
fn test_rename_keeps_position() {
    let mut doc = ServiceContainer::default();
    for name in ["a", "b", "c"] {
        doc.services.insert(name.into(), ServiceNode::with_defaults());
    }

    doc.rename_service("b", "beta").unwrap();

    let keys: Vec<&str> = doc.services.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["a", "beta", "c"]);
}

// =============================================================================
// Network CRUD and Colors
// =============================================================================

#[test]
fn test_fifty_one_networks() {
    let mut doc = ServiceContainer::default();
    let mut rng = rng();
    let mut colors = Vec::new();

    for i in 0..51 {
        colors.push(doc.add_network(&format!("net{i}"), NetworkDefinition::default(), &mut rng).unwrap());
    }

    let first_fifty: HashSet<&String> = colors[..50].iter().collect();
    assert_eq!(first_fifty.len(), 50);
    assert!(colors[..50].iter().all(|c| NETWORK_COLORS.contains(&c.as_str())));
    assert_eq!(colors[50], FALLBACK_COLOR);
    assert!(first_fifty.contains(&colors[50]));
}

#[test]
fn test_update_network_in_place_keeps_color() {
    let mut doc = ServiceContainer::default();
    let color = doc
        .add_network("front", NetworkDefinition::default(), &mut rng())
        .unwrap();

    let replacement = NetworkDefinition {
        driver: Some("overlay".into()),
        color: Some("#000000".into()),
        ..NetworkDefinition::default()
    };
    doc.update_network("front", "front", replacement).unwrap();

    let network = doc.network("front").unwrap();
    assert_eq!(network.color.as_deref(), Some(color.as_str()));
    assert_eq!(network.driver.as_deref(), Some("overlay"));
}

#[test]
fn test_rejected_network_edits_change_nothing() {
    let mut doc = ServiceContainer::default();
    let mut rng = rng();
    doc.add_network("front", NetworkDefinition::default(), &mut rng).unwrap();
    doc.add_network("back", NetworkDefinition::default(), &mut rng).unwrap();
    let before = doc.clone();

    assert!(doc.add_network("  ", NetworkDefinition::default(), &mut rng).is_err());
    assert!(doc.add_network("front", NetworkDefinition::default(), &mut rng).is_err());
    assert!(doc.update_network("front", "back", NetworkDefinition::default()).is_err());
    assert!(doc.update_network("ghost", "x", NetworkDefinition::default()).is_err());
    assert!(doc.remove_network("ghost").is_err());

    assert_eq!(doc, before);
}

// =============================================================================
// Edge Derivation
// =============================================================================

#[test]
fn test_web_db_cache_scenario() {
    let services = IndexMap::from([
        ("web".to_string(), on_networks(&["front"])),
        ("db".to_string(), on_networks(&["back"])),
        ("cache".to_string(), on_networks(&["front", "back"])),
    ]);
    let networks = IndexMap::from([
        ("front".to_string(), colored("#AAAAAA")),
        ("back".to_string(), colored("#BBBBBB")),
    ]);

    let edges = derive_edges(&services, Some(&networks));

    assert_eq!(edges.len(), 2);
    let web_cache = edges.iter().find(|e| e.connects("web", "cache")).unwrap();
    let db_cache = edges.iter().find(|e| e.connects("db", "cache")).unwrap();
    assert_eq!(web_cache.color, "#AAAAAA");
    assert_eq!(db_cache.color, "#BBBBBB");
    assert!(!edges.iter().any(|e| e.connects("web", "db")));
}

#[test]
fn test_removed_network_leaves_no_edges() {
    let mut session = Session::with_rng(rng());
    session.add_workspace_item();
    let a = session.add_service().unwrap();
    let b = session.add_service().unwrap();
    session.add_network("shared", NetworkDefinition::default()).unwrap();
    session.add_network_to_service(&a, "shared").unwrap();
    session.add_network_to_service(&b, "shared").unwrap();
    assert_eq!(session.network_edges().len(), 1);

    session.remove_network("shared").unwrap();

    assert!(session.network_edges().is_empty());
    let doc = session.container().unwrap();
    assert!(doc.services[&a].networks.is_none());
}

#[test]
fn test_undeclared_shared_network_is_gray() {
    let services = IndexMap::from([
        ("a".to_string(), on_networks(&["adhoc"])),
        ("b".to_string(), on_networks(&["adhoc"])),
    ]);
    let edges = derive_edges(&services, Some(&IndexMap::new()));
    assert_eq!(edges[0].color, DEFAULT_EDGE_COLOR);
}

const POOL: [&str; 5] = ["n0", "n1", "n2", "n3", "n4"];
const POOL_COLORS: [&str; 5] = ["#000001", "#000002", "#000003", "#000004", "#000005"];

fn service_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0..POOL.len(), 0..4), 0..8)
}

proptest! {
    #[test]
    fn prop_edges_match_shared_networks(memberships in service_strategy()) {
        let services: IndexMap<String, ServiceNode> = memberships
            .iter()
            .enumerate()
            .map(|(i, nets)| {
                let names: Vec<&str> = nets.iter().map(|&n| POOL[n]).collect();
                (format!("s{i}"), on_networks(&names))
            })
            .collect();
        let networks: IndexMap<String, NetworkDefinition> = POOL
            .iter()
            .zip(POOL_COLORS)
            .map(|(name, color)| ((*name).to_string(), colored(color)))
            .collect();

        let edges = derive_edges(&services, Some(&networks));

        let mut pairs = HashSet::new();
        for edge in &edges {
            prop_assert!(pairs.insert((edge.source.clone(), edge.target.clone())));
            let si = services.get_index_of(&edge.source).unwrap();
            let ti = services.get_index_of(&edge.target).unwrap();
            prop_assert!(si < ti);
            prop_assert_eq!(&edge.id, &format!("{}-{}", edge.source, edge.target));
        }

        for i in 0..memberships.len() {
            for j in (i + 1)..memberships.len() {
                let first_shared = memberships[i]
                    .iter()
                    .find(|n| memberships[j].contains(n));
                let edge = edges
                    .iter()
                    .find(|e| e.source == format!("s{i}") && e.target == format!("s{j}"));
                match (first_shared, edge) {
                    (Some(&n), Some(edge)) => prop_assert_eq!(edge.color.as_str(), POOL_COLORS[n]),
                    (None, None) => {}
                    _ => prop_assert!(false, "edge presence mismatch for s{} and s{}", i, j),
                }
            }
        }
    }
}
