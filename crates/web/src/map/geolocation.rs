//! Device geolocation.

use std::str::FromStr;

use futures::FutureExt;
use futures::future::BoxFuture;
use thiserror::Error;
use wayfarer_core::{GeoError, LatLng};

/// Ways a position query can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("location request timed out")]
    Timeout,
}

impl FromStr for LocationError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "denied" => Ok(Self::PermissionDenied),
            "unavailable" => Ok(Self::PositionUnavailable),
            "timeout" => Ok(Self::Timeout),
            other => Err(format!("unknown location failure {other:?}")),
        }
    }
}

/// Single-shot position query.
///
/// Implementations resolve once per call; the controller never retries.
pub trait Geolocator: Send + Sync {
    fn current_position(&self) -> BoxFuture<'_, Result<LatLng, LocationError>>;
}

/// A configured device: either it knows where it is or it fails the same way
/// every time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceLocation {
    Fixed(LatLng),
    Failing(LocationError),
}

impl FromStr for DeviceLocation {
    type Err = GeoError;

    /// Parses `lat,lng` or one of `denied`, `unavailable`, `timeout`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(failure) = s.parse::<LocationError>() {
            return Ok(Self::Failing(failure));
        }
        s.parse().map(Self::Fixed)
    }
}

impl Geolocator for DeviceLocation {
    fn current_position(&self) -> BoxFuture<'_, Result<LatLng, LocationError>> {
        let result = match *self {
            Self::Fixed(position) => Ok(position),
            Self::Failing(e) => Err(e),
        };
        tracing::debug!(?result, "device position queried");
        futures::future::ready(result).boxed()
    }
}
