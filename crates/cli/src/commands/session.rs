//! Session slot commands.
//!
//! # Environment Variables
//!
//! - `WAYFARER_DATA_DIR` - slot directory used by the web app

use std::path::PathBuf;

use thiserror::Error;
use wayfarer_core::Identity;
use wayfarer_web::session::{FileSlot, IDENTITY_SLOT_KEY, SlotError, SlotStorage};

const DEFAULT_DATA_DIR: &str = ".wayfarer";

/// Errors that can occur during session commands.
#[derive(Debug, Error)]
pub enum SessionCommandError {
    /// The slot could not be read or modified.
    #[error("Slot error: {0}")]
    Slot(#[from] SlotError),
}

/// Open the slot directory, falling back to `WAYFARER_DATA_DIR`.
pub fn open(data_dir: Option<PathBuf>) -> FileSlot {
    let dir = data_dir.unwrap_or_else(|| {
        dotenvy::dotenv().ok();
        std::env::var("WAYFARER_DATA_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from)
    });
    FileSlot::new(dir)
}

/// Describe the persisted identity.
///
/// A malformed record is reported rather than treated as an error: the app
/// itself starts signed out when it finds one.
///
/// # Errors
///
/// Returns an error if the slot cannot be read.
pub fn show(slot: &impl SlotStorage) -> Result<String, SessionCommandError> {
    let raw = match slot.read(IDENTITY_SLOT_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Ok("No one is signed in".to_string()),
        Err(e @ SlotError::NotText { .. }) => return Ok(malformed(&e)),
        Err(e) => return Err(e.into()),
    };

    Ok(match Identity::from_json(&raw) {
        Ok(identity) => {
            let mut lines = vec![format!("Signed in as {}", identity.label())];
            if let Some(email) = &identity.email {
                lines.push(format!("  email: {email}"));
            }
            if let Some(photo) = &identity.photo_url {
                lines.push(format!("  photo: {photo}"));
            }
            lines.join("\n")
        }
        Err(e) => malformed(&e),
    })
}

fn malformed(error: &dyn std::error::Error) -> String {
    tracing::warn!(error = %error, "stored identity is malformed");
    format!("Stored identity is malformed ({error}); the app will start signed out")
}

/// Remove the persisted identity.
///
/// # Errors
///
/// Returns an error if the slot cannot be modified.
pub fn clear(slot: &impl SlotStorage) -> Result<String, SessionCommandError> {
    let had_identity = match slot.read(IDENTITY_SLOT_KEY) {
        Ok(raw) => raw.is_some(),
        Err(SlotError::NotText { .. }) => true,
        Err(e) => return Err(e.into()),
    };
    slot.remove(IDENTITY_SLOT_KEY)?;
    tracing::info!(had_identity, "session slot cleared");

    Ok(if had_identity {
        "Signed out".to_string()
    } else {
        "No one was signed in".to_string()
    })
}
