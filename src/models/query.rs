//! Query builders for list endpoints.
//!
//! Each builder renders to `page[size]` / `filter[...]` query-parameter
//! pairs. Unset criteria are simply omitted from the request.

use chrono::{DateTime, SecondsFormat, Utc};

use super::{CategoryId, TagId, TransactionStatus};

/// Query parameters accepted by every paginated list endpoint.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Number of records per page.
    pub page_size: Option<u32>,
}

impl ListQuery {
    /// Creates a query with server-default page size.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { page_size: None }
    }

    /// Sets the number of records per page.
    #[inline]
    #[must_use]
    pub const fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Renders the query-parameter pairs.
    pub(crate) fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(size) = self.page_size {
            pairs.push(("page[size]".to_owned(), size.to_string()));
        }
        pairs
    }
}

/// Query parameters for the transactions endpoints.
///
/// All criteria combine; the server returns transactions satisfying
/// every set filter, newest first.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    /// Number of records per page.
    pub page_size: Option<u32>,
    /// Settlement status filter.
    pub status: Option<TransactionStatus>,
    /// Only transactions at or after this time.
    pub since: Option<DateTime<Utc>>,
    /// Only transactions before this time.
    pub until: Option<DateTime<Utc>>,
    /// Only transactions in this category (or a child of it).
    pub category: Option<CategoryId>,
    /// Only transactions carrying this tag.
    pub tag: Option<TagId>,
}

impl TransactionQuery {
    /// Creates an unfiltered query with server-default page size.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            page_size: None,
            status: None,
            since: None,
            until: None,
            category: None,
            tag: None,
        }
    }

    /// Sets the number of records per page.
    #[inline]
    #[must_use]
    pub const fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Restricts to transactions with the given settlement status.
    #[inline]
    #[must_use]
    pub const fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to transactions within the given time window.
    #[inline]
    #[must_use]
    pub const fn between(mut self, since: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self.until = Some(until);
        self
    }

    /// Restricts to transactions in the given category.
    #[inline]
    #[must_use]
    pub fn category(mut self, id: CategoryId) -> Self {
        self.category = Some(id);
        self
    }

    /// Restricts to transactions carrying the given tag.
    #[inline]
    #[must_use]
    pub fn tag(mut self, id: TagId) -> Self {
        self.tag = Some(id);
        self
    }

    /// Renders the query-parameter pairs.
    pub(crate) fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(size) = self.page_size {
            pairs.push(("page[size]".to_owned(), size.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("filter[status]".to_owned(), status.as_str().to_owned()));
        }
        if let Some(since) = self.since {
            pairs.push((
                "filter[since]".to_owned(),
                since.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }
        if let Some(until) = self.until {
            pairs.push((
                "filter[until]".to_owned(),
                until.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }
        if let Some(category) = &self.category {
            pairs.push(("filter[category]".to_owned(), category.as_inner().to_owned()));
        }
        if let Some(tag) = &self.tag {
            pairs.push(("filter[tag]".to_owned(), tag.as_inner().to_owned()));
        }
        pairs
    }
}

/// Query parameters for the categories endpoint (not paginated).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategoryQuery {
    /// Only children of this category.
    pub parent: Option<CategoryId>,
}

impl CategoryQuery {
    /// Creates a query returning the full category tree.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { parent: None }
    }

    /// Restricts to children of the given category.
    #[inline]
    #[must_use]
    pub fn parent(mut self, id: CategoryId) -> Self {
        self.parent = Some(id);
        self
    }

    /// Renders the query-parameter pairs.
    pub(crate) fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(parent) = &self.parent {
            pairs.push(("filter[parent]".to_owned(), parent.as_inner().to_owned()));
        }
        pairs
    }
}
