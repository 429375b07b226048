//! Data models for Up Banking API entities.
//!
//! This module contains strongly-typed representations of the Up API's
//! JSON:API resources, newtype ID wrappers, enumeration types for
//! constrained values, and the envelope/pagination types shared by all
//! endpoints.

mod account;
mod category;
mod envelope;
mod enums;
mod ids;
mod money;
mod query;
mod tag;
mod transaction;
mod webhook;

pub use account::{Account, AccountAttributes};
pub use category::{Category, CategoryAttributes, CategoryRelationships};
pub use envelope::{
    CollectionEnvelope, ErrorEnvelope, ErrorObject, Page, PageCursor, PaginationLinks,
    RelationshipData, SingleEnvelope, ToMany, ToOne,
};
pub use enums::{AccountKind, OwnershipType, TransactionStatus, WebhookEventType};
pub use ids::{AccountId, CategoryId, TagId, TransactionId, WebhookId};
pub use money::Money;
pub use query::{CategoryQuery, ListQuery, TransactionQuery};
pub use tag::Tag;
pub use transaction::{
    Cashback, HoldInfo, RoundUp, Transaction, TransactionAttributes, TransactionRelationships,
    MAX_TAGS_PER_TRANSACTION,
};
pub use webhook::{Webhook, WebhookAttributes, WebhookInput};
