//! The session store.

use thiserror::Error;
use wayfarer_core::{Identity, IdentityError};

use super::slot::{SlotError, SlotStorage};
use crate::navigation::{Navigation, Route};

/// Well-known key of the persisted identity record.
pub const IDENTITY_SLOT_KEY: &str = "authUser";

/// Errors surfaced by session transitions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The identity could not be serialized.
    #[error("failed to encode identity: {0}")]
    Encode(#[from] IdentityError),

    /// The identity slot could not be written.
    #[error("failed to persist identity: {0}")]
    Persist(#[from] SlotError),
}

/// Holds the current identity and mirrors it into the identity slot.
///
/// States are `Unauthenticated` (no identity) and `Authenticated`. The initial
/// state comes from [`SessionStore::hydrate`]; afterwards only
/// [`login`](Self::login) and [`logout`](Self::logout) move between them.
pub struct SessionStore {
    slot: Box<dyn SlotStorage>,
    identity: Option<Identity>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Restore the session from `slot`.
    ///
    /// Never fails: an empty slot, an unreadable slot or a malformed payload
    /// all yield an unauthenticated session. A malformed payload is also
    /// deleted so it is not read again.
    pub fn hydrate(slot: Box<dyn SlotStorage>) -> Self {
        let identity = match slot.read(IDENTITY_SLOT_KEY) {
            Ok(None) => None,
            Ok(Some(raw)) => match Identity::from_json(&raw) {
                Ok(identity) => {
                    tracing::info!(user = identity.label(), "session restored");
                    Some(identity)
                }
                Err(e) => {
                    discard_malformed(slot.as_ref(), &e);
                    None
                }
            },
            Err(e @ SlotError::NotText { .. }) => {
                discard_malformed(slot.as_ref(), &e);
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session slot");
                None
            }
        };

        Self { slot, identity }
    }

    /// Sign in as `identity`, replacing any current identity.
    ///
    /// The record is accepted verbatim. It is written to the slot first; the
    /// in-memory session only changes once the write succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the identity cannot be encoded or persisted.
    pub fn login(&mut self, identity: Identity) -> Result<(), SessionError> {
        let raw = identity.to_json()?;
        self.slot.write(IDENTITY_SLOT_KEY, &raw)?;

        tracing::info!(user = identity.label(), "signed in");
        self.identity = Some(identity);
        Ok(())
    }

    /// Sign out and return the navigation that must follow it.
    ///
    /// Always leaves the session unauthenticated. A failure to delete the
    /// slot is logged, not returned.
    pub fn logout(&mut self) -> Navigation {
        if let Err(e) = self.slot.remove(IDENTITY_SLOT_KEY) {
            tracing::warn!(error = %e, "failed to remove session slot");
        }
        if let Some(identity) = self.identity.take() {
            tracing::info!(user = identity.label(), "signed out");
        }
        Navigation::Replace(Route::Entry)
    }

    /// Whether someone is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// The signed-in identity, if any.
    #[must_use]
    pub const fn current_identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

fn discard_malformed(slot: &dyn SlotStorage, error: &dyn std::error::Error) {
    tracing::warn!(error = %error, "discarding malformed session data");
    if let Err(e) = slot.remove(IDENTITY_SLOT_KEY) {
        tracing::warn!(error = %e, "failed to discard malformed session data");
    }
}
