//! Outbound links for a selected marker.

use std::sync::{Mutex, PoisonError};

use url::Url;
use wayfarer_core::Marker;

const DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/";
const SHARE_BASE: &str = "https://wa.me/";

/// Driving directions to `marker`.
///
/// # Errors
///
/// Returns an error if the URL cannot be assembled.
pub fn directions_url(marker: &Marker) -> Result<Url, url::ParseError> {
    Url::parse(&format!(
        "{DIRECTIONS_BASE}?api=1&destination={},{}",
        marker.lat(),
        marker.lng()
    ))
}

/// Text sent when sharing `marker`.
#[must_use]
pub fn share_text(marker: &Marker) -> String {
    format!(
        "Hey, check out this location: {} at {}",
        marker.title, marker.address
    )
}

/// A WhatsApp share link for `marker`.
///
/// # Errors
///
/// Returns an error if the URL cannot be assembled.
pub fn share_url(marker: &Marker) -> Result<Url, url::ParseError> {
    Url::parse(&format!(
        "{SHARE_BASE}?text={}",
        urlencoding::encode(&share_text(marker))
    ))
}

/// Opens URLs outside the app. Fire-and-forget.
pub trait ExternalOpener: Send + Sync {
    fn open(&self, url: &Url);
}

/// Remembers the last opened URL so a handler can redirect the browser to it.
#[derive(Debug, Default)]
pub struct PendingRedirect {
    url: Mutex<Option<Url>>,
}

impl PendingRedirect {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The URL to redirect to, if any was opened.
    #[must_use]
    pub fn take(&self) -> Option<Url> {
        self.url.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

impl ExternalOpener for PendingRedirect {
    fn open(&self, url: &Url) {
        tracing::info!(%url, "opening external link");
        *self.url.lock().unwrap_or_else(PoisonError::into_inner) = Some(url.clone());
    }
}
