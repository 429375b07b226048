//! Remote collection feed.
//!
//! [`ResourceFeed`] turns a paginated, filterable remote resource list
//! into a stable, incrementally-updated local list. It owns the
//! accumulated resources, the active filter, the pagination cursor, and
//! the last fetch error, and hands the consumer a [`ListDiff`] after
//! every state change so row updates can animate.
//!
//! The feed performs no I/O. The owning context (one logical UI thread)
//! starts fetches itself, holding the [`FetchTicket`] the feed issues,
//! and marshals each completion back into [`ResourceFeed::complete`].
//! Completions for cancelled or superseded fetches are no-ops.

use crate::error::UpBankError;
use crate::filter::{FilterScope, FilterState, Filterable};
use crate::models::{Page, PageCursor};
use crate::reconcile::{ListDiff, Reconcilable, diff};
use crate::view_state::{ViewState, derive_state};

/// What a fetch does to the accumulated list when it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    /// Replace the list wholesale (the server is the source of truth).
    Refresh,
    /// Append the next page.
    LoadMore,
}

/// Opaque handle pairing an in-flight fetch with the feed state that
/// issued it.
///
/// A ticket is invalidated by any later `begin_*` call and by
/// [`ResourceFeed::invalidate`]; completing with an invalidated ticket
/// changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    /// Feed generation at issue time.
    generation: u64,
    /// Refresh or load-more.
    kind: FetchKind,
}

/// View-model for one remote resource list.
#[derive(Debug)]
pub struct ResourceFeed<T> {
    /// Everything fetched so far, in server order.
    items: Vec<T>,
    /// The post-filter list the consumer displays.
    visible: Vec<T>,
    /// Active filter.
    filter: FilterState,
    /// Cursor to the next page; `None` once exhausted.
    cursor: Option<PageCursor>,
    /// Generation of the fetch currently in flight, if any.
    in_flight: Option<u64>,
    /// Bumped on every begin/invalidate; stale tickets compare unequal.
    generation: u64,
    /// Display message of the last failed fetch.
    error: Option<String>,
}

impl<T> Default for ResourceFeed<T>
where
    T: Filterable + Reconcilable + Clone,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResourceFeed<T>
where
    T: Filterable + Reconcilable + Clone,
{
    /// Creates an empty feed with the identity filter.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            visible: Vec::new(),
            filter: FilterState {
                search: None,
                category: None,
                settled_only: false,
                scope: FilterScope::All,
            },
            cursor: None,
            in_flight: None,
            generation: 0,
            error: None,
        }
    }

    /// Creates an empty feed with the given filter already active.
    #[inline]
    #[must_use]
    pub fn with_filter(filter: FilterState) -> Self {
        let mut feed = Self::new();
        feed.filter = filter;
        feed
    }

    /// The post-filter list the consumer displays.
    #[inline]
    #[must_use]
    pub fn visible(&self) -> &[T] {
        &self.visible
    }

    /// Everything fetched so far, unfiltered.
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The active filter.
    #[inline]
    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Returns `true` while a fetch is in flight.
    #[inline]
    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Returns `true` if an unexhausted pagination cursor is held.
    #[inline]
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    /// Derives the placeholder state for the current feed contents.
    #[inline]
    #[must_use]
    pub fn view_state(&self) -> ViewState {
        derive_state(
            self.is_fetching(),
            self.visible.is_empty(),
            self.error.as_deref(),
        )
    }

    /// Starts a refresh, superseding any fetch already in flight.
    ///
    /// The caller fetches the first page and hands the result back via
    /// [`ResourceFeed::complete`] with the returned ticket.
    #[inline]
    pub fn begin_refresh(&mut self) -> FetchTicket {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        FetchTicket {
            generation: self.generation,
            kind: FetchKind::Refresh,
        }
    }

    /// Starts a load-more fetch if one is warranted.
    ///
    /// Returns the ticket and the cursor to fetch when the consumer is
    /// near the end of the visible list, no fetch is in flight, a next
    /// page exists, and the identity filter is active. Pagination stays
    /// suspended under a non-identity filter: pages not yet fetched may
    /// hold matches the visible list cannot know about.
    #[inline]
    pub fn begin_load_more(&mut self, near_end: bool) -> Option<(FetchTicket, PageCursor)> {
        if !near_end || self.in_flight.is_some() || !self.filter.is_identity() {
            return None;
        }
        let cursor = self.cursor.clone()?;
        self.generation += 1;
        self.in_flight = Some(self.generation);
        Some((
            FetchTicket {
                generation: self.generation,
                kind: FetchKind::LoadMore,
            },
            cursor,
        ))
    }

    /// Applies a fetch result.
    ///
    /// Returns `None` for stale tickets (superseded, cancelled, or
    /// already completed): the completion mutates nothing. Otherwise
    /// returns the edit script for the visible list; an error result
    /// records the display message and returns an empty script so the
    /// consumer re-derives its view state without animating.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Page<T>, UpBankError>,
    ) -> Option<ListDiff> {
        if self.in_flight != Some(ticket.generation) || ticket.generation != self.generation {
            tracing::debug!("dropping completion for a stale fetch ticket");
            return None;
        }
        self.in_flight = None;
        match result {
            Ok(page) => {
                match ticket.kind {
                    FetchKind::Refresh => self.items = page.resources,
                    FetchKind::LoadMore => self.items.extend(page.resources),
                }
                self.cursor = page.next;
                self.error = None;
                Some(self.rebuild_visible())
            }
            Err(err) => {
                tracing::warn!(error = %err, "fetch failed");
                self.error = Some(err.display_message());
                Some(ListDiff::default())
            }
        }
    }

    /// Replaces the active filter, returning the visible-list edit
    /// script.
    #[inline]
    pub fn set_filter(&mut self, filter: FilterState) -> ListDiff {
        self.filter = filter;
        self.rebuild_visible()
    }

    /// Cancels any in-flight fetch (screen teardown).
    ///
    /// Completions holding earlier tickets become no-ops.
    #[inline]
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.in_flight = None;
    }

    /// Recomputes the visible list and diffs it against the previous
    /// one.
    fn rebuild_visible(&mut self) -> ListDiff {
        let next = self.filter.apply(&self.items);
        let script = diff(&self.visible, &next);
        self.visible = next;
        script
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ErrorObject, Tag, TagId, Transaction};

    /// Tag page helper.
    fn tag_page(labels: &[&str], next: Option<&str>) -> Page<Tag> {
        Page {
            resources: labels
                .iter()
                .map(|label| Tag {
                    id: TagId::new((*label).to_owned()),
                })
                .collect(),
            next: next.map(|url| PageCursor::new(url.to_owned())),
        }
    }

    /// Transaction fixture with the given description and tags.
    fn transaction(id: &str, description: &str, tags: &[&str]) -> Transaction {
        let value = serde_json::json!({
            "id": id,
            "attributes": {
                "status": "SETTLED",
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
                "settledAt": "2024-01-16T00:00:00Z",
                "createdAt": "2024-01-15T00:00:00Z"
            },
            "relationships": {
                "account": { "data": { "type": "accounts", "id": "acc-1" } },
                "tags": {
                    "data": tags
                        .iter()
                        .map(|tag| serde_json::json!({ "type": "tags", "id": tag }))
                        .collect::<Vec<_>>()
                }
            }
        });
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn fresh_feed_is_empty_then_loading() {
        let mut feed: ResourceFeed<Tag> = ResourceFeed::new();
        assert_eq!(feed.view_state(), ViewState::Empty);
        let _ticket = feed.begin_refresh();
        assert_eq!(feed.view_state(), ViewState::Loading);
    }

    #[test]
    fn refresh_populates_and_returns_insert_script() {
        let mut feed: ResourceFeed<Tag> = ResourceFeed::new();
        let ticket = feed.begin_refresh();
        let script = feed
            .complete(ticket, Ok(tag_page(&["Coffee", "Holiday"], None)))
            .unwrap();
        assert_eq!(script.inserts, vec![0, 1]);
        assert_eq!(feed.visible().len(), 2);
        assert_eq!(feed.view_state(), ViewState::Content);
        assert!(!feed.has_more());
    }

    #[test]
    fn stale_ticket_after_invalidate_is_a_no_op() {
        let mut feed: ResourceFeed<Tag> = ResourceFeed::new();
        let ticket = feed.begin_refresh();
        feed.invalidate();
        let script = feed.complete(ticket, Ok(tag_page(&["Coffee"], None)));
        assert!(script.is_none());
        assert!(feed.visible().is_empty());
        assert!(!feed.is_fetching());
    }

    #[test]
    fn newer_refresh_supersedes_older_ticket() {
        let mut feed: ResourceFeed<Tag> = ResourceFeed::new();
        let first = feed.begin_refresh();
        let second = feed.begin_refresh();
        assert!(feed.complete(first, Ok(tag_page(&["Old"], None))).is_none());
        assert!(
            feed.complete(second, Ok(tag_page(&["New"], None)))
                .is_some()
        );
        assert_eq!(feed.visible().first().map(Tag::label), Some("New"));
    }

    #[test]
    fn completed_ticket_cannot_complete_twice() {
        let mut feed: ResourceFeed<Tag> = ResourceFeed::new();
        let ticket = feed.begin_refresh();
        assert!(
            feed.complete(ticket, Ok(tag_page(&["Coffee"], None)))
                .is_some()
        );
        assert!(
            feed.complete(ticket, Ok(tag_page(&["Twice"], None)))
                .is_none()
        );
        assert_eq!(feed.visible().len(), 1);
    }

    #[test]
    fn load_more_requires_cursor_and_idle_and_proximity() {
        let mut feed: ResourceFeed<Tag> = ResourceFeed::new();

        // No cursor yet: nothing to load.
        assert!(feed.begin_load_more(true).is_none());

        let ticket = feed.begin_refresh();
        // A fetch is in flight.
        assert!(feed.begin_load_more(true).is_none());
        let _script = feed.complete(ticket, Ok(tag_page(&["A"], Some("https://next/1"))));

        // Not near the end of the list.
        assert!(feed.begin_load_more(false).is_none());
        // All conditions hold.
        assert!(feed.begin_load_more(true).is_some());
    }

    #[test]
    fn load_more_appends_and_updates_cursor() {
        let mut feed: ResourceFeed<Tag> = ResourceFeed::new();
        let ticket = feed.begin_refresh();
        let _script = feed.complete(ticket, Ok(tag_page(&["A", "B"], Some("https://next/1"))));

        let (ticket, cursor) = feed.begin_load_more(true).unwrap();
        assert_eq!(cursor.as_url(), "https://next/1");
        let script = feed.complete(ticket, Ok(tag_page(&["C"], None))).unwrap();
        assert_eq!(script.inserts, vec![2]);
        assert!(script.deletes.is_empty());
        assert_eq!(feed.visible().len(), 3);
        // links.next was null: the list is exhausted.
        assert!(!feed.has_more());
        assert!(feed.begin_load_more(true).is_none());
    }

    #[test]
    fn pagination_is_suspended_while_filtered() {
        let mut feed: ResourceFeed<Tag> = ResourceFeed::new();
        let ticket = feed.begin_refresh();
        let _script = feed.complete(ticket, Ok(tag_page(&["A", "B"], Some("https://next/1"))));

        let _narrow = feed.set_filter(FilterState::new().search("a"));
        assert!(feed.begin_load_more(true).is_none());

        let _restore = feed.set_filter(FilterState::new());
        assert!(feed.begin_load_more(true).is_some());
    }

    #[test]
    fn failed_fetch_surfaces_error_state() {
        let mut feed: ResourceFeed<Tag> = ResourceFeed::new();
        let ticket = feed.begin_refresh();
        let err = UpBankError::Api {
            status: 401,
            errors: vec![ErrorObject {
                status: "401".to_owned(),
                title: "Not Authorized".to_owned(),
                detail: "The request was not authenticated.".to_owned(),
            }],
        };
        let script = feed.complete(ticket, Err(err)).unwrap();
        assert!(script.is_empty());
        assert_eq!(
            feed.view_state(),
            ViewState::Error("Not Authorized".to_owned())
        );
    }

    #[test]
    fn successful_refresh_clears_prior_error() {
        let mut feed: ResourceFeed<Tag> = ResourceFeed::new();
        let ticket = feed.begin_refresh();
        let err = UpBankError::Api {
            status: 503,
            errors: Vec::new(),
        };
        let _script = feed.complete(ticket, Err(err));

        let retry = feed.begin_refresh();
        let _script = feed.complete(retry, Ok(tag_page(&["Coffee"], None)));
        assert_eq!(feed.view_state(), ViewState::Content);
    }

    #[test]
    fn refresh_replaces_wholesale() {
        let mut feed: ResourceFeed<Tag> = ResourceFeed::new();
        let ticket = feed.begin_refresh();
        let _script = feed.complete(ticket, Ok(tag_page(&["A", "B"], None)));

        let ticket = feed.begin_refresh();
        let script = feed.complete(ticket, Ok(tag_page(&["B", "C"], None))).unwrap();
        assert_eq!(script.deletes, vec![0]);
        assert_eq!(script.inserts, vec![1]);
        assert_eq!(
            feed.visible().iter().map(Tag::label).collect::<Vec<_>>(),
            vec!["B", "C"]
        );
    }

    #[test]
    fn set_filter_narrows_and_restores() {
        let mut feed: ResourceFeed<Transaction> = ResourceFeed::new();
        let ticket = feed.begin_refresh();
        let page = Page {
            resources: vec![
                transaction("t-1", "Coffee Shop", &[]),
                transaction("t-2", "Bus Fare", &[]),
                transaction("t-3", "Coffee Beans", &[]),
            ],
            next: None,
        };
        let _script = feed.complete(ticket, Ok(page));

        let script = feed.set_filter(FilterState::new().search("coffee"));
        assert_eq!(script.deletes, vec![1]);
        let descriptions: Vec<&str> = feed
            .visible()
            .iter()
            .map(|tx| tx.attributes.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["Coffee Shop", "Coffee Beans"]);

        let script = feed.set_filter(FilterState::new());
        assert_eq!(script.inserts, vec![1]);
        assert_eq!(feed.visible().len(), 3);
    }

    #[test]
    fn untagging_last_match_empties_a_tag_scoped_feed() {
        // A tag-filtered list: removing the tag from the only matching
        // transaction makes it vanish on the next refresh, leaving the
        // screen empty (the consumer navigates back on Empty).
        let mut feed: ResourceFeed<Transaction> = ResourceFeed::new();
        let ticket = feed.begin_refresh();
        let _script = feed.complete(
            ticket,
            Ok(Page {
                resources: vec![transaction("t-1", "Coffee Shop", &["Coffee"])],
                next: None,
            }),
        );
        assert_eq!(feed.view_state(), ViewState::Content);

        // Server-side the tag was removed; the scoped refetch returns
        // nothing.
        let ticket = feed.begin_refresh();
        let script = feed
            .complete(ticket, Ok(Page { resources: vec![], next: None }))
            .unwrap();
        assert_eq!(script.deletes, vec![0]);
        assert!(script.inserts.is_empty());
        assert_eq!(feed.view_state(), ViewState::Empty);
    }
}
