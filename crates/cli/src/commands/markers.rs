//! Marker catalog listing.

use std::fmt::Write as _;

use wayfarer_web::map::MarkerCatalog;
use wayfarer_web::map::links::{directions_url, share_url};

/// Render the built-in catalog, one block per marker.
///
/// # Errors
///
/// Returns an error if a link cannot be built.
pub fn list(with_share: bool) -> Result<String, url::ParseError> {
    let catalog = MarkerCatalog::builtin();
    let mut out = String::new();

    for marker in catalog.all() {
        let _ = writeln!(out, "#{} {}", marker.id, marker.title);
        let _ = writeln!(out, "  address:    {}", marker.address);
        let _ = writeln!(out, "  position:   {}", marker.position);
        let _ = writeln!(out, "  directions: {}", directions_url(marker)?);
        if with_share {
            let _ = writeln!(out, "  share:      {}", share_url(marker)?);
        }
    }
    Ok(out.trim_end().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_includes_every_marker() {
        let out = list(false).unwrap();
        for title in ["New York", "London", "Paris", "Tokyo", "San Francisco"] {
            assert!(out.contains(title), "missing {title}");
        }
        assert!(out.contains("destination=51.5074,-0.1278"));
        assert!(!out.contains("wa.me"));
    }

    #[test]
    fn test_list_with_share_links() {
        let out = list(true).unwrap();
        assert_eq!(out.matches("https://wa.me/").count(), 5);
    }
}
