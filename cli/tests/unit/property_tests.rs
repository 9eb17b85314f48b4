//! Property-based tests for address handling, the config builder and the
//! failure counter.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use proptest::prelude::*;

use consul_client_cli::domain::snap::instance_key;
use consul_client_cli::domain::{
    ConfigInputs, PortSet, RoundAction, next_action, parse_target, select_addresses,
};

fn endpoint() -> impl Strategy<Value = String> {
    (1u8..=254, 1u8..=254, 1u16..=65535).prop_map(|(a, b, port)| format!("10.{a}.0.{b}:{port}"))
}

// ============================================================================
// Address selection and parsing
// ============================================================================

proptest! {
    /// A non-empty dedicated list always wins over the gossip list.
    #[test]
    fn prop_healthcheck_addresses_win_when_non_empty(
        gossip in prop::collection::vec(endpoint(), 0..4),
        dedicated in prop::collection::vec(endpoint(), 1..4),
    ) {
        prop_assert_eq!(select_addresses(&gossip, Some(dedicated.as_slice())), &dedicated[..]);
        prop_assert_eq!(select_addresses(&gossip, None), &gossip[..]);
        prop_assert_eq!(select_addresses(&gossip, Some(&[][..])), &gossip[..]);
    }

    /// Every well-formed IPv4 endpoint parses back to its parts.
    #[test]
    fn prop_ipv4_endpoints_parse(a in 0u8..=255, b in 0u8..=255, port in 0u16..=65535) {
        let raw = format!("192.168.{a}.{b}:{port}");
        let target = parse_target(&raw).unwrap();
        prop_assert_eq!(target.host, format!("192.168.{a}.{b}"));
        prop_assert_eq!(target.port, port);
        prop_assert_eq!(target.raw, raw);
    }

    /// Ports above the u16 range are rejected.
    #[test]
    fn prop_out_of_range_ports_rejected(port in 65536u32..1_000_000) {
        let raw = format!("10.0.0.1:{port}");
        prop_assert!(parse_target(&raw).is_err());
    }
}

// ============================================================================
// Config builder
// ============================================================================

proptest! {
    /// The join list is always copied verbatim; the check args always end
    /// with the socket flag and contain the selected addresses in order.
    #[test]
    fn prop_builder_preserves_addresses(
        join in prop::collection::vec(endpoint(), 1..5),
        dedicated in prop::option::of(prop::collection::vec(endpoint(), 0..3)),
        tcp_check in any::<bool>(),
    ) {
        let inputs = ConfigInputs {
            bind_address: Some("10.0.0.5"),
            datacenter: "dc1",
            node_name: "node",
            tcp_check,
            join_addresses: &join,
            healthcheck_addresses: dedicated.as_deref(),
            ports: PortSet::client(8301),
            socket_path: Some("data/socket.sock"),
            probe_command: Path::new("/probe"),
        };
        let config = inputs.build();
        prop_assert_eq!(&config.retry_join, &join);
        prop_assert_eq!(config.health_check().is_some(), tcp_check);

        if let Some(service) = config.health_check() {
            let args = &service.check.args;
            let expected = select_addresses(&join, dedicated.as_deref());
            prop_assert_eq!(&args[0], "/probe");
            prop_assert_eq!(&args[1..=expected.len()], expected);
            let tail = ["--socket-path".to_string(), "data/socket.sock".to_string()];
            prop_assert_eq!(&args[args.len() - 2..], &tail[..]);
        }
    }

    /// Building is deterministic: the same inputs render the same text.
    #[test]
    fn prop_builder_renders_deterministically(join in prop::collection::vec(endpoint(), 1..5)) {
        let inputs = ConfigInputs {
            bind_address: None,
            datacenter: "dc1",
            node_name: "node",
            tcp_check: true,
            join_addresses: &join,
            healthcheck_addresses: None,
            ports: PortSet::client(8301),
            socket_path: Some("s.sock"),
            probe_command: Path::new("/probe"),
        };
        prop_assert_eq!(inputs.build().to_json().unwrap(), inputs.build().to_json().unwrap());
    }
}

// ============================================================================
// Failure counter transitions
// ============================================================================

proptest! {
    /// A failing round always increments; alerting starts exactly at the threshold.
    #[test]
    fn prop_failure_increments_and_alerts_at_threshold(prior in 0u32..100, threshold in 1u32..10) {
        match next_action(prior, false, threshold) {
            RoundAction::Degraded { count } => {
                prop_assert_eq!(count, prior + 1);
                prop_assert!(count < threshold);
            }
            RoundAction::Alert { count } => {
                prop_assert_eq!(count, prior + 1);
                prop_assert!(count >= threshold);
            }
            other => prop_assert!(false, "unexpected action {:?}", other),
        }
    }

    /// Instance keys always satisfy the store's key syntax.
    #[test]
    fn prop_instance_key_shape(unit in "[a-z-]{1,20}/[0-9]{1,3}") {
        let key = instance_key(&unit);
        prop_assert_eq!(key.len(), 10);
        prop_assert!(key.chars().all(|c| c.is_ascii_digit() || matches!(c, 'a'..='f')));
    }
}
