//! Tests for trigger dispatch in the agent manager.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use consul_client_cli::application::services::lifecycle::{AgentManager, Trigger};
use consul_client_cli::domain::{ClientConfig, ConsulConfig, SnapPaths, UnitStatus};

use crate::mocks::{FixedHost, MemFiles, MockSnap, RecordingReporter, StaticRelations};

struct Harness {
    snap: MockSnap,
    files: MemFiles,
    relations: StaticRelations,
    reporter: RecordingReporter,
    settings: ClientConfig,
    paths: SnapPaths,
}

impl Harness {
    fn new(snap: MockSnap, relations: StaticRelations) -> Self {
        let paths = SnapPaths::new(Path::new("/var/snap"), &snap.name);
        Self {
            snap,
            files: MemFiles::default(),
            relations,
            reporter: RecordingReporter::default(),
            settings: ClientConfig::default(),
            paths,
        }
    }

    async fn fire(&self, trigger: Trigger) -> anyhow::Result<()> {
        let manager = AgentManager {
            snap: &self.snap,
            files: &self.files,
            relations: &self.relations,
            host: &FixedHost("host-1"),
            reporter: &self.reporter,
            settings: &self.settings,
            paths: &self.paths,
            bind_address: None,
        };
        manager.handle(trigger).await
    }

    fn written(&self) -> Option<ConsulConfig> {
        self.files
            .get(&self.paths.config_file())
            .map(|text| serde_json::from_str(&text).unwrap())
    }
}

#[tokio::test]
async fn test_cluster_changed_without_relation_blocks() {
    let h = Harness::new(MockSnap::installed(), StaticRelations::default());

    h.fire(Trigger::ClusterChanged).await.unwrap();

    assert_eq!(h.reporter.last(), Some(UnitStatus::cluster_missing()));
    assert!(h.written().is_none());
    assert!(h.snap.log().is_empty());
}

#[tokio::test]
async fn test_empty_join_list_blocks() {
    let h = Harness::new(MockSnap::installed(), StaticRelations::joined("dc1", &[]));

    h.fire(Trigger::ClusterChanged).await.unwrap();

    assert_eq!(h.reporter.last(), Some(UnitStatus::cluster_missing()));
}

#[tokio::test]
async fn test_cluster_changed_writes_config_and_restarts() {
    let h = Harness::new(
        MockSnap::installed(),
        StaticRelations::joined("dc1", &["10.20.0.10:8301"]),
    );

    h.fire(Trigger::ClusterChanged).await.unwrap();

    let config = h.written().unwrap();
    assert_eq!(config.datacenter, "dc1");
    assert_eq!(config.node_name, "host-1");
    assert_eq!(config.bind_addr, "0.0.0.0");
    assert_eq!(config.retry_join, vec!["10.20.0.10:8301".to_string()]);
    assert!(config.health_check().is_none());
    assert_eq!(h.snap.log(), vec!["restart consul".to_string()]);
    assert_eq!(h.reporter.last(), Some(UnitStatus::Active));
}

#[tokio::test]
async fn test_unchanged_config_does_not_restart() {
    let h = Harness::new(
        MockSnap::installed(),
        StaticRelations::joined("dc1", &["10.20.0.10:8301"]),
    );

    h.fire(Trigger::ClusterChanged).await.unwrap();
    h.fire(Trigger::ClusterChanged).await.unwrap();

    assert_eq!(h.snap.log(), vec!["restart consul".to_string()]);
    assert_eq!(h.files.writes.get(), 1);
    assert_eq!(h.reporter.last(), Some(UnitStatus::Active));
}

#[tokio::test]
async fn test_restart_failure_blocks() {
    let mut snap = MockSnap::installed();
    snap.fail_restart = true;
    let h = Harness::new(snap, StaticRelations::joined("dc1", &["10.20.0.10:8301"]));

    h.fire(Trigger::ClusterChanged).await.unwrap();

    assert_eq!(
        h.reporter.last(),
        Some(UnitStatus::Blocked("Failed to restart consul-client_abc123".to_string()))
    );
    assert!(h.written().is_some());
}

#[tokio::test]
async fn test_notify_ready_enables_health_check_end_to_end() {
    let h = Harness::new(
        MockSnap::installed(),
        StaticRelations::joined("dc1", &["10.20.0.10:8301"]).with_notify("ovn", "data/socket.sock"),
    );

    h.fire(Trigger::NotifyChanged).await.unwrap();

    let config = h.written().unwrap();
    assert_eq!(config.enable_script_checks, Some(true));
    let service = config.health_check().unwrap();
    let probe = h.paths.probe_artifact().display().to_string();
    assert_eq!(
        service.check.args,
        vec![
            probe.clone(),
            "10.20.0.10:8301".to_string(),
            "--socket-path".to_string(),
            "data/socket.sock".to_string(),
        ]
    );
    assert_eq!(service.check.interval, "10s");
    assert_eq!(service.check.timeout, "5s");
    assert_eq!(h.files.installs.borrow().len(), 1);
    assert_eq!(
        h.snap.log(),
        vec!["connect ovn:consul-socket".to_string(), "restart consul".to_string()]
    );
}

#[tokio::test]
async fn test_health_check_prefers_dedicated_addresses() {
    let mut relations = StaticRelations::joined("dc1", &["10.20.0.10:8301"])
        .with_notify("ovn", "data/socket.sock");
    relations.cluster.healthcheck_endpoints = Some(vec!["10.30.0.10:8301".to_string()]);
    let h = Harness::new(MockSnap::installed(), relations);

    h.fire(Trigger::ClusterChanged).await.unwrap();

    let config = h.written().unwrap();
    assert_eq!(config.retry_join, vec!["10.20.0.10:8301".to_string()]);
    let args = &config.health_check().unwrap().check.args;
    assert_eq!(args[1], "10.30.0.10:8301");
}

#[tokio::test]
async fn test_health_check_disabled_by_toggle() {
    let mut h = Harness::new(
        MockSnap::installed(),
        StaticRelations::joined("dc1", &["10.20.0.10:8301"]).with_notify("ovn", "data/socket.sock"),
    );
    h.settings.enable_health_check = false;

    h.fire(Trigger::ClusterChanged).await.unwrap();

    let config = h.written().unwrap();
    assert!(config.health_check().is_none());
    assert!(h.files.installs.borrow().is_empty());
}

#[tokio::test]
async fn test_start_sets_maintenance_then_configures() {
    let h = Harness::new(
        MockSnap::installed(),
        StaticRelations::joined("dc1", &["10.20.0.10:8301"]),
    );

    h.fire(Trigger::Start).await.unwrap();

    assert_eq!(
        h.reporter.all(),
        vec![
            UnitStatus::Maintenance("Starting consul-client_abc123 snap".to_string()),
            UnitStatus::Active,
        ]
    );
}

#[tokio::test]
async fn test_install_installs_missing_snap_from_channel() {
    let h = Harness::new(MockSnap::missing(), StaticRelations::default());

    h.fire(Trigger::Install).await.unwrap();

    assert_eq!(h.snap.log(), vec!["install latest/stable".to_string()]);
    assert!(h.reporter.all().is_empty());
}

#[tokio::test]
async fn test_install_failure_blocks() {
    let mut snap = MockSnap::missing();
    snap.fail_install = true;
    let h = Harness::new(snap, StaticRelations::default());

    h.fire(Trigger::Install).await.unwrap();

    assert_eq!(
        h.reporter.last(),
        Some(UnitStatus::Blocked("Failed to install snap consul-client_abc123".to_string()))
    );
}

#[tokio::test]
async fn test_config_changed_stops_after_failed_install() {
    let mut snap = MockSnap::missing();
    snap.fail_install = true;
    let h = Harness::new(snap, StaticRelations::joined("dc1", &["10.20.0.10:8301"]));

    h.fire(Trigger::ConfigChanged).await.unwrap();

    assert!(h.reporter.last().unwrap().is_blocked());
    assert!(h.written().is_none());
}

#[tokio::test]
async fn test_upgrade_with_present_snap_reconciles() {
    let h = Harness::new(
        MockSnap::installed(),
        StaticRelations::joined("dc1", &["10.20.0.10:8301"]),
    );

    h.fire(Trigger::Upgrade).await.unwrap();

    assert!(h.written().is_some());
    assert_eq!(h.reporter.last(), Some(UnitStatus::Active));
}

#[tokio::test]
async fn test_remove_disconnects_then_removes() {
    let h = Harness::new(
        MockSnap::installed(),
        StaticRelations::default().with_notify("ovn", "data/socket.sock"),
    );

    h.fire(Trigger::Remove).await.unwrap();

    assert_eq!(
        h.snap.log(),
        vec!["disconnect ovn:consul-socket".to_string(), "remove".to_string()]
    );
    assert_eq!(
        h.reporter.all(),
        vec![UnitStatus::Maintenance("Uninstalling consul-client_abc123 snap".to_string())]
    );
}

#[tokio::test]
async fn test_remove_continues_after_disconnect_failure_and_blocks_on_remove_failure() {
    let mut snap = MockSnap::installed();
    snap.fail_disconnect = true;
    snap.fail_remove = true;
    let h = Harness::new(snap, StaticRelations::default().with_notify("ovn", "s.sock"));

    h.fire(Trigger::Remove).await.unwrap();

    assert_eq!(h.snap.log().len(), 2);
    assert_eq!(
        h.reporter.last(),
        Some(UnitStatus::Blocked("Failed to remove consul-client_abc123".to_string()))
    );
}

#[tokio::test]
async fn test_config_write_failure_is_an_error() {
    let mut h = Harness::new(
        MockSnap::installed(),
        StaticRelations::joined("dc1", &["10.20.0.10:8301"]),
    );
    h.files.fail_write = true;

    assert!(h.fire(Trigger::ClusterChanged).await.is_err());
    assert!(h.snap.log().is_empty());
}

#[tokio::test]
async fn test_check_script_install_failure_is_an_error() {
    let mut h = Harness::new(
        MockSnap::installed(),
        StaticRelations::joined("dc1", &["10.20.0.10:8301"]).with_notify("ovn", "data/socket.sock"),
    );
    h.files.fail_install = true;

    assert!(h.fire(Trigger::NotifyChanged).await.is_err());
    assert!(h.written().is_none());
    assert_eq!(h.files.writes.get(), 0);
    assert!(!h.snap.log().contains(&"restart consul".to_string()));
}
