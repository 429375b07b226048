//! Transaction model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, CategoryId, Money, TagId, ToMany, ToOne, TransactionId, TransactionStatus};

/// Server-enforced ceiling on the number of tags per transaction.
///
/// Exceeding it yields an API error; clients typically disable further
/// tag selection at this count rather than round-tripping the failure.
pub const MAX_TAGS_PER_TRANSACTION: usize = 6;

/// A transaction on an Up account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier (UUID).
    pub id: TransactionId,
    /// Transaction attributes.
    pub attributes: TransactionAttributes,
    /// Links to related resources.
    pub relationships: TransactionRelationships,
}

/// Attributes of a [`Transaction`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAttributes {
    /// Settlement status.
    pub status: TransactionStatus,
    /// Raw description as it appears on the bank statement.
    pub raw_text: Option<String>,
    /// Cleaned-up, display-ready description (usually the merchant name).
    pub description: String,
    /// Attached message, e.g. a transfer note.
    pub message: Option<String>,
    /// Whether the transaction can be assigned a category.
    pub is_categorizable: bool,
    /// Amount details at the time the transaction was held, if it was.
    pub hold_info: Option<HoldInfo>,
    /// Round-up applied by this transaction, if any.
    pub round_up: Option<RoundUp>,
    /// Cashback earned on this transaction, if any.
    pub cashback: Option<Cashback>,
    /// Amount in the account's currency.
    pub amount: Money,
    /// Amount in the foreign currency, for international purchases.
    pub foreign_amount: Option<Money>,
    /// When the transaction settled; `None` while held.
    pub settled_at: Option<DateTime<Utc>>,
    /// When the transaction first occurred.
    pub created_at: DateTime<Utc>,
}

/// Related resources of a [`Transaction`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRelationships {
    /// The account the transaction belongs to.
    pub account: ToOne<AccountId>,
    /// Assigned category, if any.
    #[serde(default)]
    pub category: ToOne<CategoryId>,
    /// Parent of the assigned category, if any.
    #[serde(default)]
    pub parent_category: ToOne<CategoryId>,
    /// Tags applied to the transaction.
    #[serde(default)]
    pub tags: ToMany<TagId>,
}

/// Amount details captured while a transaction was held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldInfo {
    /// Held amount in the account's currency.
    pub amount: Money,
    /// Held amount in the foreign currency, if applicable.
    pub foreign_amount: Option<Money>,
}

/// Round-up debited alongside a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundUp {
    /// Total round-up amount (negative).
    pub amount: Money,
    /// Portion contributed by a boost, if any.
    pub boost_portion: Option<Money>,
}

/// Cashback credited alongside a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cashback {
    /// Why the cashback was paid.
    pub description: String,
    /// Cashback amount (positive).
    pub amount: Money,
}

impl Transaction {
    /// ID of the account this transaction belongs to, if present.
    #[inline]
    #[must_use]
    pub const fn account_id(&self) -> Option<&AccountId> {
        self.relationships.account.id()
    }

    /// ID of the assigned category, if any.
    #[inline]
    #[must_use]
    pub const fn category_id(&self) -> Option<&CategoryId> {
        self.relationships.category.id()
    }

    /// ID of the assigned category's parent, if any.
    #[inline]
    #[must_use]
    pub const fn parent_category_id(&self) -> Option<&CategoryId> {
        self.relationships.parent_category.id()
    }

    /// Iterates over the applied tag IDs.
    #[inline]
    pub fn tag_ids(&self) -> impl Iterator<Item = &TagId> {
        self.relationships.tags.ids()
    }

    /// Returns `true` if the given tag is applied.
    #[inline]
    #[must_use]
    pub fn has_tag(&self, tag: &TagId) -> bool {
        self.tag_ids().any(|id| id == tag)
    }

    /// Returns `true` once the transaction has settled.
    #[inline]
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.attributes.status.is_settled()
    }
}
