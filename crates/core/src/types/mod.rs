//! Core types for Wayfarer.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod geo;
pub mod id;
pub mod identity;
pub mod marker;

pub use geo::{GeoError, LatLng};
pub use id::*;
pub use identity::{Identity, IdentityError};
pub use marker::Marker;
