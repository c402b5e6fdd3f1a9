//! Session management.
//!
//! The [`SessionStore`] is the sole owner of the persisted identity slot. It
//! hydrates once at startup and afterwards changes only through
//! [`SessionStore::login`] and [`SessionStore::logout`].

mod slot;
mod store;

pub use slot::{FileSlot, MemorySlot, SlotError, SlotStorage};
pub use store::{IDENTITY_SLOT_KEY, SessionError, SessionStore};
