//! Sign-in error types.

use thiserror::Error;

/// Errors raised by the sign-in flows.
///
/// Every variant is a form validation failure: it is shown to the user as a
/// toast and leaves the session untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Email or password left empty.
    #[error("Please fill in all fields")]
    MissingFields,

    /// Phone number left empty.
    #[error("Please enter your phone number")]
    MissingPhone,

    /// Verification code left empty.
    #[error("Please enter the OTP")]
    MissingCode,

    /// Verification code longer than six characters.
    #[error("The OTP must be at most 6 characters")]
    InvalidCode,

    /// Verification attempted before a code was sent.
    #[error("Please request an OTP first")]
    CodeNotSent,

    /// Social provider is not one we offer.
    #[error("unknown sign-in provider: {0}")]
    UnknownProvider(String),
}
