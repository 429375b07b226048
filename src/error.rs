//! Error types for the Up Banking client library.

use crate::models::ErrorObject;

/// Convenience alias for results produced by this crate.
pub type Result<T> = core::result::Result<T, UpBankError>;

/// All errors that can occur when using the Up Banking client.
#[derive(Debug, thiserror::Error)]
pub enum UpBankError {
    /// The request failed before a usable response was received.
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    ///
    /// Carries the HTTP status code and any error objects the server
    /// included in its JSON:API error envelope (empty if the body could
    /// not be parsed as one).
    #[error("API error (status {status}): {}", first_title(.errors))]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Server-provided error objects, in response order.
        errors: Vec<ErrorObject>,
    },

    /// The response body did not match the expected schema.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The client was built without an access token.
    #[error("no access token was provided")]
    MissingToken,

    /// The settings backend failed to read or write.
    #[error("settings error: {0}")]
    Settings(Box<dyn core::error::Error + Send + Sync>),
}

/// Returns the first error object's title, or a fallback.
fn first_title(errors: &[ErrorObject]) -> &str {
    errors.first().map_or("unknown error", |err| err.title.as_str())
}

impl UpBankError {
    /// A short human-readable message suitable for display in an error
    /// placeholder.
    ///
    /// For [`UpBankError::Api`] this is the title of the first
    /// server-provided error object; all other variants use their
    /// `Display` form.
    #[inline]
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Api { errors, .. } if !errors.is_empty() => first_title(errors).to_owned(),
            other => other.to_string(),
        }
    }

    /// Returns the HTTP status code if this is an API error.
    #[inline]
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
