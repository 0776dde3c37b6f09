// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration tests for the stackyard CLI commands

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// A stackyard command bound to a scratch data directory
fn stackyard(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stackyard").unwrap();
    cmd.env("STACKYARD_DATA_DIR", data_dir.path())
        .env("STACKYARD_CONFIG", data_dir.path().join("config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

/// Run with `--json` and parse stdout
fn json_output(data_dir: &TempDir, args: &[&str]) -> Value {
    let output = stackyard(data_dir).arg("--json").args(args).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Create an item and return it selected
fn with_item() -> TempDir {
    let data_dir = TempDir::new().unwrap();
    std::fs::write(data_dir.path().join("config.toml"), "").unwrap();
    stackyard(&data_dir)
        .args(["item", "new"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Created item-"));
    data_dir
}

/// Add a service and return its generated name
fn add_service(data_dir: &TempDir) -> String {
    let output = stackyard(data_dir).args(["service", "add"]).output().unwrap();
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout)
        .trim()
        .trim_start_matches("Added service ")
        .to_string()
}

#[test]
fn test_item_lifecycle() {
    let data_dir = with_item();

    let items = json_output(&data_dir, &["item", "list"]);
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["selected"], true);
    assert_eq!(items[0]["services"], 0);

    let id = items[0]["id"].as_str().unwrap().to_string();
    stackyard(&data_dir)
        .args(["item", "rename", &id, "Shop"])
        .assert()
        .success();
    let shown = json_output(&data_dir, &["item", "show"]);
    assert_eq!(shown["name"], "Shop");

    stackyard(&data_dir)
        .args(["item", "remove", &id])
        .assert()
        .success();
    stackyard(&data_dir)
        .args(["item", "remove", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_service_commands_without_selection_fail() {
    let data_dir = TempDir::new().unwrap();
    std::fs::write(data_dir.path().join("config.toml"), "").unwrap();

    stackyard(&data_dir)
        .args(["service", "add"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No workspace item selected"));
}

#[test]
fn test_service_edit_and_compose_export() {
    let data_dir = with_item();
    let name = add_service(&data_dir);

    stackyard(&data_dir)
        .args(["service", "rename", &name, "web"])
        .assert()
        .success();
    stackyard(&data_dir)
        .args(["service", "set", "web", "image", "nginx:1.27"])
        .assert()
        .success();
    stackyard(&data_dir)
        .args(["service", "push", "web", "environment", "MODE=prod"])
        .assert()
        .success();
    stackyard(&data_dir)
        .args(["service", "port", "web", "8080", "80"])
        .assert()
        .success();
    stackyard(&data_dir)
        .args(["service", "port", "web", "0", "80"])
        .assert()
        .failure();

    let services = json_output(&data_dir, &["service", "list"]);
    assert_eq!(services["web"]["image"], "nginx:1.27");
    assert_eq!(services["web"]["ports"][0], "8080:80");

    stackyard(&data_dir)
        .args(["export", "--format", "compose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nginx:1.27"))
        .stdout(predicate::str::contains("8080:80"))
        .stdout(predicate::str::contains("icon").not());
}

#[test]
fn test_rename_onto_existing_service_fails() {
    let data_dir = with_item();
    let first = add_service(&data_dir);
    let second = add_service(&data_dir);

    stackyard(&data_dir)
        .args(["service", "rename", &first, &second])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let services = json_output(&data_dir, &["service", "list"]);
    assert!(services.get(&first).is_some());
}

#[test]
fn test_network_colors_and_edges() {
    let data_dir = with_item();
    let a = add_service(&data_dir);
    let b = add_service(&data_dir);
    let c = add_service(&data_dir);

    stackyard(&data_dir)
        .args(["network", "add", "front"])
        .assert()
        .success();
    stackyard(&data_dir)
        .args(["network", "add", "front"])
        .assert()
        .failure();

    for service in [&a, &b] {
        stackyard(&data_dir)
            .args(["service", "connect", service, "front"])
            .assert()
            .success();
    }

    let networks = json_output(&data_dir, &["network", "list"]);
    let color = networks["front"]["color"].as_str().unwrap().to_string();
    assert!(color.starts_with('#'));

    let edges = json_output(&data_dir, &["edges"]);
    let edges = edges.as_array().unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0]["source"], a.as_str());
    assert_eq!(edges[0]["target"], b.as_str());
    assert_eq!(edges[0]["color"], color.as_str());

    let of_c = json_output(&data_dir, &["edges", &c]);
    assert!(of_c.as_array().unwrap().is_empty());

    stackyard(&data_dir)
        .args(["export", "--format", "compose"])
        .assert()
        .success()
        .stdout(predicate::str::contains(color.as_str()).not());

    stackyard(&data_dir)
        .args(["export", "--format", "dot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("graph services"))
        .stdout(predicate::str::contains(color.as_str()));
}

#[test]
fn test_network_rename_keeps_color() {
    let data_dir = with_item();
    let a = add_service(&data_dir);
    stackyard(&data_dir)
        .args(["network", "add", "front"])
        .assert()
        .success();
    stackyard(&data_dir)
        .args(["service", "connect", &a, "front"])
        .assert()
        .success();
    let before = json_output(&data_dir, &["network", "list"]);

    stackyard(&data_dir)
        .args(["network", "update", "front", "--name", "public", "--driver", "overlay"])
        .assert()
        .success();

    let after = json_output(&data_dir, &["network", "list"]);
    assert_eq!(after["public"]["color"], before["front"]["color"]);
    assert_eq!(after["public"]["driver"], "overlay");
    let services = json_output(&data_dir, &["service", "list"]);
    assert_eq!(services[&a]["networks"][0], "public");
}

#[test]
fn test_short_search_query_skips_network() {
    let data_dir = TempDir::new().unwrap();
    std::fs::write(data_dir.path().join("config.toml"), "").unwrap();

    stackyard(&data_dir)
        .args(["search", "ng"])
        .assert()
        .success()
        .stdout(predicate::str::contains("at least 3"));
}

#[test]
fn test_config_set_and_get() {
    let data_dir = TempDir::new().unwrap();
    std::fs::write(data_dir.path().join("config.toml"), "").unwrap();

    stackyard(&data_dir)
        .args(["config", "hub.page_size", "25"])
        .assert()
        .success();
    stackyard(&data_dir)
        .args(["config", "hub.page_size"])
        .assert()
        .success()
        .stdout("25\n");
    stackyard(&data_dir)
        .args(["config", "colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_completions() {
    let data_dir = TempDir::new().unwrap();
    std::fs::write(data_dir.path().join("config.toml"), "").unwrap();

    stackyard(&data_dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stackyard"));
}
