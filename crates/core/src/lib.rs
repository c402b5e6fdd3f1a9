//! Wayfarer Core - Shared types library.
//!
//! This crate provides common types used across all Wayfarer components:
//! - `web` - The locally served map-exploration application
//! - `cli` - Command-line tools for inspecting the session slot and catalog
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, validated coordinates, identities and markers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
