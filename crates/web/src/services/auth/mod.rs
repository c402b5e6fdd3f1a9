//! Mock sign-in flows.
//!
//! Nothing here verifies credentials: each flow only validates its form and
//! fabricates an [`Identity`] for the session store to persist.

mod error;

pub use error::AuthError;

use std::fmt;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use wayfarer_core::Identity;

/// Longest accepted verification code.
pub const MAX_CODE_LENGTH: usize = 6;

/// Photo shown for Google sign-ins.
pub const GOOGLE_DEFAULT_PHOTO: &str = "https://lh3.googleusercontent.com/a/default-user";

// =============================================================================
// Email
// =============================================================================

/// Sign in with email and password.
///
/// The display name is the part of the address before the first `@`.
///
/// # Errors
///
/// Returns [`AuthError::MissingFields`] if either field is empty.
pub fn email_sign_in(email: &str, password: &SecretString) -> Result<Identity, AuthError> {
    if email.is_empty() || password.expose_secret().is_empty() {
        return Err(AuthError::MissingFields);
    }

    let display_name = email.split('@').next().unwrap_or(email);
    Ok(Identity {
        display_name: Some(display_name.to_string()),
        email: Some(email.to_string()),
        photo_url: None,
    })
}

// =============================================================================
// Phone
// =============================================================================

/// Two-step phone sign-in: enter a number, then the code "sent" to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PhoneSignIn {
    #[default]
    EnterNumber,
    CodeSent {
        phone: String,
    },
}

impl PhoneSignIn {
    /// Pretend to text a code to `phone`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingPhone`] if `phone` is empty.
    pub fn send_code(&mut self, phone: &str) -> Result<(), AuthError> {
        if phone.is_empty() {
            return Err(AuthError::MissingPhone);
        }
        tracing::info!("verification code sent");
        *self = Self::CodeSent {
            phone: phone.to_string(),
        };
        Ok(())
    }

    /// Accept any code of up to six characters. Resets the flow on success.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::CodeNotSent`] before [`send_code`](Self::send_code),
    /// [`AuthError::MissingCode`] for an empty code and
    /// [`AuthError::InvalidCode`] for a code that is too long.
    pub fn verify(&mut self, code: &str) -> Result<Identity, AuthError> {
        let Self::CodeSent { phone } = self else {
            return Err(AuthError::CodeNotSent);
        };
        if code.is_empty() {
            return Err(AuthError::MissingCode);
        }
        if code.chars().count() > MAX_CODE_LENGTH {
            return Err(AuthError::InvalidCode);
        }

        let identity = Identity {
            display_name: Some(format!("User-{}", last_chars(phone, 4))),
            email: None,
            photo_url: None,
        };
        *self = Self::EnterNumber;
        Ok(identity)
    }

    /// Go back to entering a number.
    pub fn back(&mut self) {
        *self = Self::EnterNumber;
    }

    /// The number a code was sent to.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        match self {
            Self::EnterNumber => None,
            Self::CodeSent { phone } => Some(phone),
        }
    }
}

fn last_chars(s: &str, n: usize) -> &str {
    let start = s
        .char_indices()
        .rev()
        .nth(n.saturating_sub(1))
        .map_or(0, |(i, _)| i);
    &s[start..]
}

// =============================================================================
// Social
// =============================================================================

/// Offered social sign-in providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialProvider {
    Google,
    Facebook,
    Twitter,
    Github,
}

impl SocialProvider {
    pub const ALL: [Self; 4] = [Self::Google, Self::Facebook, Self::Twitter, Self::Github];

    /// Lowercase identifier used in URLs and email addresses.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Facebook => "facebook",
            Self::Twitter => "twitter",
            Self::Github => "github",
        }
    }

    /// Capitalized name shown to the user.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Facebook => "Facebook",
            Self::Twitter => "Twitter",
            Self::Github => "Github",
        }
    }

    /// The identity a sign-in with this provider produces.
    #[must_use]
    pub fn sign_in(self) -> Identity {
        Identity {
            display_name: Some(format!("{} User", self.display_name())),
            email: Some(format!("user@{}.com", self.slug())),
            photo_url: matches!(self, Self::Google).then(|| GOOGLE_DEFAULT_PHOTO.to_string()),
        }
    }
}

impl fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for SocialProvider {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.slug() == s)
            .ok_or_else(|| AuthError::UnknownProvider(s.to_string()))
    }
}
