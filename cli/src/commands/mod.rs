//! Command implementations

pub mod hook;
pub mod probe;
pub mod version;
