//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod addresses;
pub mod config;
pub mod consul_config;
pub mod error;
pub mod health;
pub mod relation;
pub mod snap;
pub mod status;

pub use addresses::{Target, parse_target, parse_targets, select_addresses};
pub use config::ClientConfig;
pub use consul_config::{ConfigInputs, ConsulConfig, PortSet};
pub use error::{RelationError, SnapError, TargetError};
pub use health::{AlertOutcome, MonitorState, RoundAction, next_action};
pub use relation::{ClusterMembership, Databag, NotifyEndpoint};
pub use snap::{SnapName, SnapPaths};
pub use status::UnitStatus;
