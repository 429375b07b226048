//! Webhook model.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::WebhookId;

/// A registered webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    /// Unique identifier (UUID).
    pub id: WebhookId,
    /// Webhook attributes.
    pub attributes: WebhookAttributes,
}

/// Attributes of a [`Webhook`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAttributes {
    /// Delivery URL events are POSTed to.
    pub url: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Signing secret for event payloads.
    ///
    /// Only present in the response to the creating request; never
    /// serialized back out.
    #[serde(default, skip_serializing)]
    pub secret_key: Option<SecretString>,
    /// When the webhook was registered.
    pub created_at: DateTime<Utc>,
}

// The secret key is excluded from equality: it is write-once, absent on
// every read path, and two reads of the same webhook must compare equal.
impl PartialEq for WebhookAttributes {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
            && self.description == other.description
            && self.created_at == other.created_at
    }
}

/// Attributes for registering a new webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookInput {
    /// Delivery URL. Must be HTTPS.
    pub url: String,
    /// Optional description (shown in the app, max 64 characters).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl WebhookInput {
    /// Creates input for a webhook with the given delivery URL.
    #[inline]
    #[must_use]
    pub fn new<T: Into<String>>(url: T) -> Self {
        Self {
            url: url.into(),
            description: None,
        }
    }

    /// Attaches a description.
    #[inline]
    #[must_use]
    pub fn description<T: Into<String>>(mut self, description: T) -> Self {
        self.description = Some(description.into());
        self
    }
}
