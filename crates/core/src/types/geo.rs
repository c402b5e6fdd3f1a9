//! Geographic coordinate type.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`LatLng`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// Latitude is outside `[-90, 90]` or not finite.
    #[error("latitude must be within [-90, 90] (got {0})")]
    LatitudeOutOfRange(f64),
    /// Longitude is outside `[-180, 180]` or not finite.
    #[error("longitude must be within [-180, 180] (got {0})")]
    LongitudeOutOfRange(f64),
    /// The text form is not `lat,lng`.
    #[error("coordinates must be written as `lat,lng` (got {0:?})")]
    Malformed(String),
}

/// A WGS84 coordinate in decimal degrees.
///
/// ## Constraints
///
/// - Latitude: finite, within `[-90, 90]`
/// - Longitude: finite, within `[-180, 180]`
///
/// ## Examples
///
/// ```
/// use wayfarer_core::LatLng;
///
/// let london = LatLng::new(51.5074, -0.1278).unwrap();
/// assert_eq!(london.to_string(), "51.507400, -0.127800");
///
/// assert!(LatLng::new(91.0, 0.0).is_err());
/// assert!("48.8566,2.3522".parse::<LatLng>().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLatLng")]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawLatLng> for LatLng {
    type Error = GeoError;

    fn try_from(raw: RawLatLng) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

impl LatLng {
    /// Build a coordinate, rejecting out-of-range or non-finite values.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::LatitudeOutOfRange`] or
    /// [`GeoError::LongitudeOutOfRange`] when a component is invalid.
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::LatitudeOutOfRange(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(GeoError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }
}

/// Six decimals, the precision shown in the details panel.
impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

impl FromStr for LatLng {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || GeoError::Malformed(s.to_owned());
        let (lat, lng) = s.split_once(',').ok_or_else(malformed)?;
        let lat = lat.trim().parse::<f64>().map_err(|_| malformed())?;
        let lng = lng.trim().parse::<f64>().map_err(|_| malformed())?;
        Self::new(lat, lng)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(LatLng::new(90.0, 180.0).is_ok());
        assert!(LatLng::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(matches!(
            LatLng::new(90.5, 0.0),
            Err(GeoError::LatitudeOutOfRange(_))
        ));
        assert!(matches!(
            LatLng::new(0.0, -180.1),
            Err(GeoError::LongitudeOutOfRange(_))
        ));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(LatLng::new(f64::NAN, 0.0).is_err());
        assert!(LatLng::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_parse_text_form() {
        let p: LatLng = " 35.6762 , 139.6503 ".parse().unwrap();
        assert!((p.lat() - 35.6762).abs() < f64::EPSILON);
        assert!((p.lng() - 139.6503).abs() < f64::EPSILON);

        assert!(matches!(
            "35.6762".parse::<LatLng>(),
            Err(GeoError::Malformed(_))
        ));
        assert!(matches!(
            "north,east".parse::<LatLng>(),
            Err(GeoError::Malformed(_))
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: LatLng = serde_json::from_str(r#"{"lat":40.7128,"lng":-74.006}"#).unwrap();
        assert!((ok.lng() + 74.006).abs() < f64::EPSILON);

        let bad = serde_json::from_str::<LatLng>(r#"{"lat":140.0,"lng":0.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_display_six_decimals() {
        let p = LatLng::new(40.7128, -74.006).unwrap();
        assert_eq!(p.to_string(), "40.712800, -74.006000");
    }
}
