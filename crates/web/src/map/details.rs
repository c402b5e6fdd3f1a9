//! Details panel for the selected marker.

use super::controller::Selection;

/// What the panel shows for an open selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsPanel {
    pub title: String,
    pub address: String,
    /// `lat, lng` with six decimals.
    pub coordinates: String,
    pub navigate_label: &'static str,
    pub share_label: &'static str,
}

impl DetailsPanel {
    pub const NAVIGATE_LABEL: &'static str = "Navigate";
    pub const SHARE_LABEL: &'static str = "WhatsApp";

    /// Panel contents, `None` while the selection is closed.
    #[must_use]
    pub fn for_selection(selection: &Selection) -> Option<Self> {
        selection.marker().map(|marker| Self {
            title: marker.title.clone(),
            address: marker.address.clone(),
            coordinates: marker.position.to_string(),
            navigate_label: Self::NAVIGATE_LABEL,
            share_label: Self::SHARE_LABEL,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wayfarer_core::{LatLng, Marker, MarkerId};

    use super::*;

    #[test]
    fn test_closed_selection_has_no_panel() {
        assert!(DetailsPanel::for_selection(&Selection::Closed).is_none());
    }

    #[test]
    fn test_open_selection_panel() {
        let marker = Marker::new(
            MarkerId::new(1),
            LatLng::new(40.7128, -74.006).unwrap(),
            "New York",
            "Manhattan, NY 10001, USA",
        );
        let panel = DetailsPanel::for_selection(&Selection::Open(marker)).unwrap();

        assert_eq!(panel.title, "New York");
        assert_eq!(panel.address, "Manhattan, NY 10001, USA");
        assert_eq!(panel.coordinates, "40.712800, -74.006000");
        assert_eq!(panel.navigate_label, "Navigate");
        assert_eq!(panel.share_label, "WhatsApp");
    }
}
