//! Pure filtering of fetched resource lists.
//!
//! [`FilterState`] combines a free-text search with optional category,
//! settlement, and account-scope criteria. Matching is a pure, total
//! function evaluated the same way for an initial snapshot as for a live
//! search-as-you-type loop.

use crate::models::{
    Account, AccountId, Category, CategoryId, Tag, Transaction, TransactionStatus, Webhook,
};

/// Which slice of the dataset a list screen is scoped to.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum FilterScope {
    /// No scoping; the whole resource list.
    #[default]
    All,
    /// Only resources belonging to the given account.
    Account(AccountId),
}

/// Composable filter over a fetched resource list.
///
/// Use builder-style methods to chain criteria. All set criteria must
/// hold for a resource to pass. The default value is the identity
/// filter, which passes everything.
///
/// # Examples
///
/// ```
/// use upbank_rs::filter::FilterState;
/// use upbank_rs::models::CategoryId;
///
/// let filter = FilterState::new()
///     .search("coffee")
///     .category(CategoryId::new("takeaway".to_owned()))
///     .settled_only(true);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Free-text search (case-insensitive substring).
    pub search: Option<String>,
    /// Category the resource must be assigned to.
    pub category: Option<CategoryId>,
    /// Drop held transactions when set.
    pub settled_only: bool,
    /// Account scoping.
    pub scope: FilterScope,
}

impl FilterState {
    /// Creates the identity filter.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free-text search string.
    #[inline]
    #[must_use]
    pub fn search<T: Into<String>>(mut self, text: T) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Restricts to resources assigned to the given category.
    #[inline]
    #[must_use]
    pub fn category(mut self, id: CategoryId) -> Self {
        self.category = Some(id);
        self
    }

    /// Drops held transactions when `true`.
    #[inline]
    #[must_use]
    pub const fn settled_only(mut self, settled_only: bool) -> Self {
        self.settled_only = settled_only;
        self
    }

    /// Scopes to resources belonging to the given account.
    #[inline]
    #[must_use]
    pub fn account(mut self, id: AccountId) -> Self {
        self.scope = FilterScope::Account(id);
        self
    }

    /// Returns `true` if every resource passes this filter.
    ///
    /// Pagination is suspended while a non-identity filter is active:
    /// pages not yet fetched may hold matches the visible list cannot
    /// know about.
    #[inline]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.search.as_deref().is_none_or(|text| text.trim().is_empty())
            && self.category.is_none()
            && !self.settled_only
            && self.scope == FilterScope::All
    }

    /// Returns `true` if the resource satisfies all set criteria.
    #[inline]
    #[must_use]
    pub fn matches<T: Filterable>(&self, resource: &T) -> bool {
        self.matches_search(resource)
            && self.matches_category(resource)
            && self.matches_settlement(resource)
            && self.matches_scope(resource)
    }

    /// Filters a slice, preserving relative order.
    ///
    /// Idempotent: filtering an already-filtered list is a no-op.
    #[inline]
    #[must_use]
    pub fn apply<T: Filterable + Clone>(&self, resources: &[T]) -> Vec<T> {
        resources
            .iter()
            .filter(|resource| self.matches(*resource))
            .cloned()
            .collect()
    }

    /// Checks the free-text criterion.
    fn matches_search<T: Filterable>(&self, resource: &T) -> bool {
        self.search.as_deref().is_none_or(|text| {
            let needle = text.trim().to_lowercase();
            needle.is_empty() || resource.search_field().to_lowercase().contains(&needle)
        })
    }

    /// Checks the category criterion.
    fn matches_category<T: Filterable>(&self, resource: &T) -> bool {
        self.category.as_ref().is_none_or(|want| {
            resource.assigned_category() == Some(want) || resource.assigned_parent_category() == Some(want)
        })
    }

    /// Checks the settlement criterion.
    fn matches_settlement<T: Filterable>(&self, resource: &T) -> bool {
        !self.settled_only || resource.settlement().is_none_or(TransactionStatus::is_settled)
    }

    /// Checks the account-scope criterion.
    fn matches_scope<T: Filterable>(&self, resource: &T) -> bool {
        match &self.scope {
            FilterScope::All => true,
            FilterScope::Account(want) => resource.owning_account() == Some(want),
        }
    }
}

/// Exposes the filterable facets of a resource type.
///
/// Facets a type does not have (settlement on an account, category on a
/// tag) default to `None` and pass the corresponding criterion
/// vacuously, except the category criterion which requires an actual
/// assignment to match.
pub trait Filterable {
    /// The display field free-text search runs against.
    fn search_field(&self) -> &str;

    /// Assigned category, if the type has one.
    #[inline]
    fn assigned_category(&self) -> Option<&CategoryId> {
        None
    }

    /// Parent of the assigned category, if the type has one.
    #[inline]
    fn assigned_parent_category(&self) -> Option<&CategoryId> {
        None
    }

    /// Settlement status, if the type has one.
    #[inline]
    fn settlement(&self) -> Option<TransactionStatus> {
        None
    }

    /// Owning account, if the type has one.
    #[inline]
    fn owning_account(&self) -> Option<&AccountId> {
        None
    }
}

impl Filterable for Transaction {
    #[inline]
    fn search_field(&self) -> &str {
        &self.attributes.description
    }

    #[inline]
    fn assigned_category(&self) -> Option<&CategoryId> {
        self.category_id()
    }

    #[inline]
    fn assigned_parent_category(&self) -> Option<&CategoryId> {
        self.parent_category_id()
    }

    #[inline]
    fn settlement(&self) -> Option<TransactionStatus> {
        Some(self.attributes.status)
    }

    #[inline]
    fn owning_account(&self) -> Option<&AccountId> {
        self.account_id()
    }
}

impl Filterable for Account {
    #[inline]
    fn search_field(&self) -> &str {
        &self.attributes.display_name
    }

    #[inline]
    fn owning_account(&self) -> Option<&AccountId> {
        Some(&self.id)
    }
}

impl Filterable for Category {
    #[inline]
    fn search_field(&self) -> &str {
        &self.attributes.name
    }

    #[inline]
    fn assigned_parent_category(&self) -> Option<&CategoryId> {
        self.parent_id()
    }
}

impl Filterable for Tag {
    #[inline]
    fn search_field(&self) -> &str {
        self.label()
    }
}

impl Filterable for Webhook {
    #[inline]
    fn search_field(&self) -> &str {
        &self.attributes.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TagId, TransactionId};

    /// Builds a minimal transaction for filter tests.
    fn transaction(
        id: &str,
        description: &str,
        status: TransactionStatus,
        category: Option<&str>,
        account: &str,
        tags: &[&str],
    ) -> Transaction {
        let relationships = serde_json::json!({
            "account": { "data": { "type": "accounts", "id": account } },
            "category": {
                "data": category.map(|id| serde_json::json!({ "type": "categories", "id": id }))
            },
            "tags": {
                "data": tags
                    .iter()
                    .map(|id| serde_json::json!({ "type": "tags", "id": id }))
                    .collect::<Vec<_>>()
            }
        });
        let value = serde_json::json!({
            "id": id,
            "attributes": {
                "status": if status.is_settled() { "SETTLED" } else { "HELD" },
                "rawText": null,
                "description": description,
                "message": null,
                "isCategorizable": true,
                "holdInfo": null,
                "roundUp": null,
                "cashback": null,
                "amount": {
                    "currencyCode": "AUD",
                    "value": "-1.00",
                    "valueInBaseUnits": -100
                },
                "foreignAmount": null,
                "settledAt": null,
                "createdAt": "2024-01-15T08:30:00Z"
            },
            "relationships": relationships
        });
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn identity_filter_passes_everything() {
        let filter = FilterState::new();
        assert!(filter.is_identity());
        let tx = transaction(
            "t-1",
            "Coffee Shop",
            TransactionStatus::Held,
            None,
            "acc-1",
            &[],
        );
        assert!(filter.matches(&tx));
    }

    #[test]
    fn blank_search_is_identity() {
        assert!(FilterState::new().search("   ").is_identity());
        assert!(!FilterState::new().search("coffee").is_identity());
        assert!(!FilterState::new().settled_only(true).is_identity());
    }

    #[test]
    fn search_is_case_insensitive_and_order_preserving() {
        let transactions = vec![
            transaction("t-1", "Coffee Shop", TransactionStatus::Settled, None, "a", &[]),
            transaction("t-2", "Bus Fare", TransactionStatus::Settled, None, "a", &[]),
            transaction("t-3", "Coffee Beans", TransactionStatus::Settled, None, "a", &[]),
        ];
        let filter = FilterState::new().search("coffee");
        let matched = filter.apply(&transactions);
        let descriptions: Vec<&str> = matched
            .iter()
            .map(|tx| tx.attributes.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["Coffee Shop", "Coffee Beans"]);
    }

    #[test]
    fn apply_is_idempotent() {
        let transactions = vec![
            transaction("t-1", "Coffee Shop", TransactionStatus::Settled, None, "a", &[]),
            transaction("t-2", "Bus Fare", TransactionStatus::Held, None, "a", &[]),
        ];
        let filter = FilterState::new().search("coffee").settled_only(true);
        let once = filter.apply(&transactions);
        let twice = filter.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn category_filter_matches_child_or_parent() {
        let tx = transaction(
            "t-1",
            "Lunch",
            TransactionStatus::Settled,
            Some("takeaway"),
            "acc-1",
            &[],
        );
        let by_child = FilterState::new().category(CategoryId::new("takeaway".to_owned()));
        assert!(by_child.matches(&tx));
        let by_other = FilterState::new().category(CategoryId::new("transport".to_owned()));
        assert!(!by_other.matches(&tx));

        let uncategorized =
            transaction("t-2", "Transfer", TransactionStatus::Settled, None, "acc-1", &[]);
        assert!(!by_child.matches(&uncategorized));
    }

    #[test]
    fn settled_only_drops_held() {
        let held = transaction("t-1", "Coffee", TransactionStatus::Held, None, "a", &[]);
        let settled = transaction("t-2", "Coffee", TransactionStatus::Settled, None, "a", &[]);
        let filter = FilterState::new().settled_only(true);
        assert!(!filter.matches(&held));
        assert!(filter.matches(&settled));
    }

    #[test]
    fn settled_only_is_vacuous_for_types_without_settlement() {
        let tag = Tag {
            id: TagId::new("Holiday".to_owned()),
        };
        let filter = FilterState::new().settled_only(true);
        assert!(filter.matches(&tag));
    }

    #[test]
    fn account_scope_restricts_by_owning_account() {
        let mine = transaction("t-1", "Coffee", TransactionStatus::Settled, None, "acc-1", &[]);
        let other = transaction("t-2", "Coffee", TransactionStatus::Settled, None, "acc-2", &[]);
        let filter = FilterState::new().account(AccountId::new("acc-1".to_owned()));
        assert!(filter.matches(&mine));
        assert!(!filter.matches(&other));
    }

    #[test]
    fn tag_search_matches_label() {
        let tags = vec![
            Tag { id: TagId::new("Holiday".to_owned()) },
            Tag { id: TagId::new("Groceries".to_owned()) },
        ];
        let filter = FilterState::new().search("holi");
        let matched = filter.apply(&tags);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched.first().map(Tag::label), Some("Holiday"));
    }

    #[test]
    fn transaction_ids_are_preserved_through_apply() {
        let transactions = vec![transaction(
            "t-1",
            "Coffee",
            TransactionStatus::Settled,
            None,
            "a",
            &["Coffee"],
        )];
        let matched = FilterState::new().apply(&transactions);
        assert_eq!(
            matched.first().map(|tx| tx.id.clone()),
            Some(TransactionId::new("t-1".to_owned()))
        );
    }
}
