//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, filesystem
//! access, TCP probing, and the alert socket.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod alert;
pub mod command_runner;
pub mod config;
pub mod fs;
pub mod host;
pub mod network;
pub mod relation;
pub mod snap;
pub mod state;
