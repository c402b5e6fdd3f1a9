//! Web app configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional.
//!
//! - `WAYFARER_HOST` - Bind address (default: 127.0.0.1)
//! - `WAYFARER_PORT` - Listen port (default: 3000)
//! - `WAYFARER_DATA_DIR` - Directory holding the identity slot (default: .wayfarer)
//! - `WAYFARER_MAP_CENTER` - Initial map center as `lat,lng` (default: 51.505,-0.09)
//! - `WAYFARER_MAP_ZOOM` - Initial zoom, 0 to 19 (default: 3)
//! - `WAYFARER_TILE_URL` - Tile URL template (default: OpenStreetMap)
//! - `WAYFARER_DEVICE_LOCATION` - Device position as `lat,lng`, or `denied`,
//!   `unavailable`, `timeout` to simulate a failing device. Unset means the
//!   device has no geolocation.
//! - `WAYFARER_CHAT_REPLY_DELAY_MS` - Chat bot reply delay (default: 1500)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use wayfarer_core::LatLng;

use crate::map::{DeviceLocation, MapSetup, MapView, TileLayer};
use crate::map::surface::MAX_ZOOM;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory of the persisted identity slot
    pub data_dir: PathBuf,
    /// Initial viewport and tiles
    pub map: MapSetup,
    /// Simulated device geolocation; `None` when unsupported
    pub device_location: Option<DeviceLocation>,
    /// Delay before the chat bot answers
    pub chat_reply_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

const DEFAULT_DATA_DIR: &str = ".wayfarer";
const DEFAULT_CENTER: &str = "51.505,-0.09";

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env.parse_or_default("WAYFARER_HOST", "127.0.0.1")?;
        let port = env.parse_or_default("WAYFARER_PORT", "3000")?;
        let data_dir = PathBuf::from(env.get_env_or_default("WAYFARER_DATA_DIR", DEFAULT_DATA_DIR));

        let center: LatLng = env.parse_or_default("WAYFARER_MAP_CENTER", DEFAULT_CENTER)?;
        let zoom: u8 = env.parse_or_default("WAYFARER_MAP_ZOOM", "3")?;
        if zoom > MAX_ZOOM {
            return Err(ConfigError::InvalidEnvVar(
                "WAYFARER_MAP_ZOOM".to_string(),
                format!("must be between 0 and {MAX_ZOOM} (got {zoom})"),
            ));
        }

        let mut tiles = TileLayer::openstreetmap();
        if let Some(url) = env.get_optional_env("WAYFARER_TILE_URL") {
            tiles.url_template = url;
        }

        let device_location = env
            .get_optional_env("WAYFARER_DEVICE_LOCATION")
            .map(|raw| {
                raw.parse::<DeviceLocation>().map_err(|e| {
                    ConfigError::InvalidEnvVar("WAYFARER_DEVICE_LOCATION".to_string(), e.to_string())
                })
            })
            .transpose()?;

        let delay_ms: u64 = env.parse_or_default("WAYFARER_CHAT_REPLY_DELAY_MS", "1500")?;

        Ok(Self {
            host,
            port,
            data_dir,
            map: MapSetup {
                view: MapView { center, zoom },
                tiles,
            },
            device_location,
            chat_reply_delay: Duration::from_millis(delay_ms),
            sentry_dsn: env.get_optional_env("SENTRY_DSN"),
            sentry_environment: env.get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional environment variable. Empty values count as unset.
    fn get_optional_env(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get an environment variable with a default value.
    fn get_env_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional_env(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Parse an environment variable, falling back to `default`.
    fn parse_or_default<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_env_or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::map::LocationError;

    fn load(vars: &[(&str, &str)]) -> Result<WebConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        WebConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.data_dir, PathBuf::from(".wayfarer"));
        assert_eq!(config.map.view.center, LatLng::new(51.505, -0.09).unwrap());
        assert_eq!(config.map.view.zoom, 3);
        assert_eq!(config.map.tiles, TileLayer::openstreetmap());
        assert!(config.device_location.is_none());
        assert_eq!(config.chat_reply_delay, Duration::from_millis(1500));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("WAYFARER_HOST", "0.0.0.0"),
            ("WAYFARER_PORT", "8080"),
            ("WAYFARER_DATA_DIR", "/var/lib/wayfarer"),
            ("WAYFARER_MAP_CENTER", "48.8566, 2.3522"),
            ("WAYFARER_MAP_ZOOM", "12"),
            ("WAYFARER_TILE_URL", "https://tiles.example/{z}/{x}/{y}.png"),
            ("WAYFARER_DEVICE_LOCATION", "timeout"),
            ("WAYFARER_CHAT_REPLY_DELAY_MS", "0"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/wayfarer"));
        assert_eq!(config.map.view.zoom, 12);
        assert_eq!(
            config.map.tiles.url_template,
            "https://tiles.example/{z}/{x}/{y}.png"
        );
        assert_eq!(
            config.device_location,
            Some(DeviceLocation::Failing(LocationError::Timeout))
        );
        assert_eq!(config.chat_reply_delay, Duration::ZERO);
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("WAYFARER_PORT", "not-a-port"),
            ("WAYFARER_HOST", "localhost:3000"),
            ("WAYFARER_MAP_CENTER", "100,0"),
            ("WAYFARER_MAP_ZOOM", "20"),
            ("WAYFARER_DEVICE_LOCATION", "somewhere"),
            ("WAYFARER_CHAT_REPLY_DELAY_MS", "-1"),
        ] {
            let err = load(&[(key, value)]).unwrap_err();
            assert!(
                matches!(&err, ConfigError::InvalidEnvVar(k, _) if k == key),
                "{key}={value} gave {err}"
            );
        }
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("WAYFARER_PORT", "  "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.sentry_dsn.is_none());
    }
}
