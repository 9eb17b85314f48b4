//! Unit tests for the consul client agent manager
//!
//! These tests use mocked dependencies and run fast without external I/O,
//! except for the infra tests which bind loopback sockets and temp files.

mod architecture;
mod lifecycle_service;
mod property_tests;
mod reconciler_service;
