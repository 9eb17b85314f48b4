//! Tests for configuration building and change detection.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use consul_client_cli::application::services::config_builder::build_config;
use consul_client_cli::application::services::reconciler::reconcile;
use consul_client_cli::domain::{ConfigInputs, PortSet};

use crate::mocks::MemFiles;

const CONFIG: &str = "/var/snap/consul-client_abc123/common/consul/config/client.json";
const PROBE: &str = "/var/snap/consul-client_abc123/common/consul/data/tcp-health-check";

fn join() -> Vec<String> {
    vec!["10.20.0.10:8301".to_string()]
}

fn inputs<'a>(join: &'a [String], socket: Option<&'a str>, tcp_check: bool) -> ConfigInputs<'a> {
    ConfigInputs {
        bind_address: None,
        datacenter: "dc1",
        node_name: "host-1",
        tcp_check,
        join_addresses: join,
        healthcheck_addresses: None,
        ports: PortSet::client(8301),
        socket_path: socket,
        probe_command: Path::new(PROBE),
    }
}

#[tokio::test]
async fn test_build_without_health_check_places_no_probe() {
    let files = MemFiles::default();
    let join = join();
    let built = build_config(&files, &inputs(&join, Some("data/socket.sock"), false))
        .await
        .unwrap();

    assert!(!built.artifact_installed);
    assert!(files.installs.borrow().is_empty());
    assert!(built.config.health_check().is_none());
    assert_eq!(built.config.enable_script_checks, None);
}

#[tokio::test]
async fn test_build_with_health_check_places_probe_once() {
    let files = MemFiles::default();
    let join = join();
    let i = inputs(&join, Some("data/socket.sock"), true);

    let first = build_config(&files, &i).await.unwrap();
    let second = build_config(&files, &i).await.unwrap();

    assert!(first.artifact_installed);
    assert!(!second.artifact_installed);
    assert_eq!(files.installs.borrow().len(), 1);
    assert_eq!(first.config, second.config);
}

#[tokio::test]
async fn test_build_fails_when_check_script_cannot_be_installed() {
    let files = MemFiles {
        fail_install: true,
        ..MemFiles::default()
    };
    let join = join();

    let result = build_config(&files, &inputs(&join, Some("data/socket.sock"), true)).await;

    assert!(result.is_err());
    assert!(files.installs.borrow().is_empty());
    assert_eq!(files.writes.get(), 0);
}

#[tokio::test]
async fn test_reconcile_writes_when_file_missing() {
    let files = MemFiles::default();
    let join = join();
    let config = inputs(&join, None, false).build();

    let changed = reconcile(&files, Path::new(CONFIG), &config).await.unwrap();

    assert!(changed);
    assert_eq!(files.get(Path::new(CONFIG)), Some(config.to_json().unwrap()));
}

#[tokio::test]
async fn test_reconcile_is_noop_for_identical_text() {
    let join = join();
    let config = inputs(&join, None, false).build();
    let files = MemFiles::with_file(Path::new(CONFIG), &config.to_json().unwrap());

    let changed = reconcile(&files, Path::new(CONFIG), &config).await.unwrap();

    assert!(!changed);
    assert_eq!(files.writes.get(), 0);
}

#[tokio::test]
async fn test_reconcile_rewrites_on_any_difference() {
    let join = join();
    let config = inputs(&join, None, false).build();
    let stale = config.to_json().unwrap().replace("dc1", "dc0");
    let files = MemFiles::with_file(Path::new(CONFIG), &stale);

    let changed = reconcile(&files, Path::new(CONFIG), &config).await.unwrap();

    assert!(changed);
    assert_eq!(files.writes.get(), 1);
}

#[tokio::test]
async fn test_reconcile_propagates_write_failure() {
    let files = MemFiles {
        fail_write: true,
        ..MemFiles::default()
    };
    let join = join();
    let config = inputs(&join, None, false).build();

    assert!(reconcile(&files, Path::new(CONFIG), &config).await.is_err());
}
