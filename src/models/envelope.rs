//! JSON:API envelope, relationship, and pagination types.
//!
//! Every Up API response wraps its payload in a `data` member; list
//! endpoints add a `links` member carrying opaque pagination URLs. These
//! types decode that plumbing once so the per-resource models stay flat.

use serde::{Deserialize, Serialize};

/// Opaque pagination cursor.
///
/// Wraps the absolute `links.next` URL from a list response. The cursor
/// has no client-visible structure; it is handed back to the API verbatim
/// to fetch the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(String);

impl PageCursor {
    /// Creates a cursor from a next-page URL.
    #[inline]
    #[must_use]
    pub const fn new(url: String) -> Self {
        Self(url)
    }

    /// Returns the cursor's URL.
    #[inline]
    #[must_use]
    pub fn as_url(&self) -> &str {
        &self.0
    }
}

/// Pagination links attached to a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLinks {
    /// URL of the previous page, if any.
    pub prev: Option<String>,
    /// URL of the next page, or `None` when this is the last page.
    pub next: Option<String>,
}

/// Envelope for list responses: a `data` array plus pagination links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEnvelope<T> {
    /// The resources on this page, in server order.
    pub data: Vec<T>,
    /// Pagination links (absent on non-paginated endpoints).
    #[serde(default)]
    pub links: PaginationLinks,
}

/// Envelope for single-resource responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleEnvelope<T> {
    /// The resource.
    pub data: T,
}

/// One page of resources plus the cursor to the next page.
///
/// Produced by the fetcher from a [`CollectionEnvelope`]; consumed by
/// appending to an accumulated list. `next` of `None` means the list is
/// exhausted.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Resources on this page, in server order.
    pub resources: Vec<T>,
    /// Cursor to the next page, if any.
    pub next: Option<PageCursor>,
}

impl<T> From<CollectionEnvelope<T>> for Page<T> {
    #[inline]
    fn from(envelope: CollectionEnvelope<T>) -> Self {
        Self {
            resources: envelope.data,
            next: envelope.links.next.map(PageCursor::new),
        }
    }
}

/// A `{type, id}` resource identifier inside a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipData<Id> {
    /// JSON:API type tag, e.g. `"categories"` or `"tags"`.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// The related resource's identifier.
    pub id: Id,
}

impl<Id> RelationshipData<Id> {
    /// Creates an identifier with the given type tag.
    #[inline]
    pub fn new<T: Into<String>>(resource_type: T, id: Id) -> Self {
        Self {
            resource_type: resource_type.into(),
            id,
        }
    }
}

/// A to-one relationship; `data` is `null` when nothing is related.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToOne<Id> {
    /// The related resource identifier, if any.
    pub data: Option<RelationshipData<Id>>,
}

impl<Id> Default for ToOne<Id> {
    #[inline]
    fn default() -> Self {
        Self { data: None }
    }
}

impl<Id> ToOne<Id> {
    /// Returns the related resource's ID, if any.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> Option<&Id> {
        match &self.data {
            Some(data) => Some(&data.id),
            None => None,
        }
    }
}

/// A to-many relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "Id: Deserialize<'de>"))]
pub struct ToMany<Id> {
    /// Related resource identifiers, in server order.
    #[serde(default)]
    pub data: Vec<RelationshipData<Id>>,
}

impl<Id> Default for ToMany<Id> {
    #[inline]
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

impl<Id> ToMany<Id> {
    /// Iterates over the related resource IDs.
    #[inline]
    pub fn ids(&self) -> impl Iterator<Item = &Id> {
        self.data.iter().map(|data| &data.id)
    }
}

/// The JSON:API error envelope returned on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Error objects, most significant first.
    pub errors: Vec<ErrorObject>,
}

/// A single server-provided error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// HTTP status code as a string (may be absent in some responses).
    #[serde(default)]
    pub status: String,
    /// Short human-readable summary.
    pub title: String,
    /// Detailed human-readable explanation.
    #[serde(default)]
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TagId;

    #[test]
    fn collection_envelope_with_next_link() {
        let json = r#"{
            "data": ["a", "b", "c"],
            "links": {
                "prev": null,
                "next": "https://api.up.com.au/api/v1/transactions?page%5Bafter%5D=abc"
            }
        }"#;
        let envelope: CollectionEnvelope<String> = serde_json::from_str(json).unwrap();
        let page = Page::from(envelope);
        assert_eq!(page.resources.len(), 3);
        let next = page.next.unwrap();
        assert!(next.as_url().contains("page%5Bafter%5D"));
    }

    #[test]
    fn collection_envelope_last_page() {
        let json = r#"{
            "data": [],
            "links": { "prev": null, "next": null }
        }"#;
        let envelope: CollectionEnvelope<String> = serde_json::from_str(json).unwrap();
        let page = Page::from(envelope);
        assert!(page.resources.is_empty());
        assert!(page.next.is_none());
    }

    #[test]
    fn collection_envelope_without_links() {
        let json = r#"{ "data": ["only"] }"#;
        let envelope: CollectionEnvelope<String> = serde_json::from_str(json).unwrap();
        assert!(envelope.links.next.is_none());
    }

    #[test]
    fn to_one_relationship_null() {
        let json = r#"{ "data": null }"#;
        let rel: ToOne<TagId> = serde_json::from_str(json).unwrap();
        assert!(rel.id().is_none());
    }

    #[test]
    fn to_many_relationship_ids() {
        let json = r#"{
            "data": [
                { "type": "tags", "id": "Coffee" },
                { "type": "tags", "id": "Holiday" }
            ]
        }"#;
        let rel: ToMany<TagId> = serde_json::from_str(json).unwrap();
        let ids: Vec<&TagId> = rel.ids().collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids.first().map(|id| id.as_inner()), Some("Coffee"));
    }

    #[test]
    fn relationship_write_body_shape() {
        let body = ToMany {
            data: vec![RelationshipData::new("tags", TagId::new("Coffee".to_owned()))],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["data"][0]["type"], "tags");
        assert_eq!(json["data"][0]["id"], "Coffee");
    }

    #[test]
    fn error_envelope_without_status_field() {
        let json = r#"{
            "errors": [
                { "title": "Not Authorized", "detail": "The request was not authenticated." }
            ]
        }"#;
        let envelope: ErrorEnvelope = serde_json::from_str(json).unwrap();
        let first = envelope.errors.first().unwrap();
        assert_eq!(first.title, "Not Authorized");
        assert!(first.status.is_empty());
    }
}
