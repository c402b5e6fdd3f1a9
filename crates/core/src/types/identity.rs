//! Identity record produced by the sign-in flows.

use serde::{Deserialize, Serialize};

/// Errors that can occur when decoding a persisted [`Identity`].
#[derive(thiserror::Error, Debug)]
pub enum IdentityError {
    /// The payload is not valid JSON.
    #[error("identity payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The payload is JSON but not an object.
    #[error("identity payload must be a JSON object (got {0})")]
    NotAnObject(&'static str),
}

/// The fabricated user profile produced by any sign-in path.
///
/// Nothing about it is verified: whatever a sign-in flow builds is stored and
/// echoed back verbatim. Field names on the wire follow the persisted layout
/// (`displayName`, `email`, `photoURL`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Name shown in the UI.
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    /// Email address, when the sign-in path had one.
    pub email: Option<String>,
    /// Avatar URL, when the sign-in path had one.
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

impl Identity {
    /// Decode a persisted identity record.
    ///
    /// The payload must be a JSON object. Each of the three fields may be a
    /// string or `null`; a missing field reads as `null` and unknown fields
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Json`] when the text is not JSON or a field
    /// has the wrong type, and [`IdentityError::NotAnObject`] for any other
    /// JSON value (string, number, array, `null`).
    pub fn from_json(raw: &str) -> Result<Self, IdentityError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let kind = match &value {
            serde_json::Value::Object(_) => return Ok(serde_json::from_value(value)?),
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "a boolean",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Array(_) => "an array",
        };
        Err(IdentityError::NotAnObject(kind))
    }

    /// Encode the identity the way it is persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, IdentityError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Best label for greeting the user.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Guest")
    }
}
