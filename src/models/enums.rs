//! Enumeration types for constrained API values.

use serde::{Deserialize, Serialize};

/// Kind of an Up account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    /// A saver (savings) account.
    Saver,
    /// The everyday transactional account.
    Transactional,
}

/// Ownership structure of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnershipType {
    /// Owned by a single customer.
    Individual,
    /// Shared 2Up account.
    Joint,
}

/// Settlement status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Authorized but not yet settled.
    Held,
    /// Fully settled.
    Settled,
}

impl TransactionStatus {
    /// Returns `true` for [`TransactionStatus::Settled`].
    #[inline]
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Settled)
    }

    /// The wire representation, as used in `filter[status]` query
    /// parameters.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Held => "HELD",
            Self::Settled => "SETTLED",
        }
    }
}

/// Event types delivered to webhooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookEventType {
    /// A transaction was created.
    TransactionCreated,
    /// A held transaction settled.
    TransactionSettled,
    /// A transaction was deleted.
    TransactionDeleted,
    /// A manual ping, triggered via the ping endpoint.
    Ping,
}
