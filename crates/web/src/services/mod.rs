//! Business logic services.
//!
//! # Services
//!
//! - `auth` - mock sign-in flows (email, phone code, social)
//! - `chat` - scripted chat assistant
//! - `settings` - user preferences

pub mod auth;
pub mod chat;
pub mod settings;
