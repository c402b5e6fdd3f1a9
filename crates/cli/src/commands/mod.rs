//! CLI command implementations.

pub mod markers;
pub mod session;
