//! Incremental list reconciliation.
//!
//! [`diff`] computes a minimal edit script between two orderings of a
//! resource list so a consumer can animate row changes instead of
//! reloading wholesale. Identity is the resource ID; an item present in
//! both lists with changed display content is reported as an in-place
//! update, never as a delete plus insert.

use std::collections::{HashMap, HashSet};

use crate::models::{Account, Category, Tag, Transaction, Webhook};

/// An item relocated between two list versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// Index in the old list.
    pub from: usize,
    /// Index in the new list.
    pub to: usize,
}

/// An item whose display content changed without changing identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Update {
    /// Index in the old list.
    pub from: usize,
    /// Index in the new list.
    pub to: usize,
}

/// Edit script between two orderings of a resource list.
///
/// The script is legal and minimal: no index appears twice within a
/// sequence, deletions and insertions are exactly the identity
/// differences, and only items whose relative order actually changed
/// are reported as moves. Consumers apply deletions (old indices),
/// then insertions (new indices), then moves, then content updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDiff {
    /// Indices into the old list of removed items, ascending.
    pub deletes: Vec<usize>,
    /// Indices into the new list of added items, ascending.
    pub inserts: Vec<usize>,
    /// Relocated items, ordered by target index.
    pub moves: Vec<Move>,
    /// In-place content changes.
    pub updates: Vec<Update>,
}

impl ListDiff {
    /// Returns `true` when the script contains no operations, letting
    /// the consumer skip the animated update entirely.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deletes.is_empty()
            && self.inserts.is_empty()
            && self.moves.is_empty()
            && self.updates.is_empty()
    }
}

/// Identity and display equality for reconcilable list items.
///
/// Identities must be unique within a list (the API guarantees unique
/// IDs per resource type).
pub trait Reconcilable {
    /// Stable identity of the item within its list.
    fn identity(&self) -> &str;

    /// Equality of display-relevant content, compared only between
    /// items with equal identity.
    fn content_eq(&self, other: &Self) -> bool;
}

/// Computes the edit script turning `old` into `new`.
///
/// Runs in `O(n log n)`: identity differences come from two hash maps,
/// and moves are the retained items falling outside the longest
/// increasing run of new positions (taken in old order), so items whose
/// relative order is unchanged never move.
#[must_use]
pub fn diff<T: Reconcilable>(old: &[T], new: &[T]) -> ListDiff {
    let old_index: HashMap<&str, usize> = old
        .iter()
        .enumerate()
        .map(|(index, item)| (item.identity(), index))
        .collect();
    let new_index: HashMap<&str, usize> = new
        .iter()
        .enumerate()
        .map(|(index, item)| (item.identity(), index))
        .collect();

    let deletes: Vec<usize> = old
        .iter()
        .enumerate()
        .filter(|(_, item)| !new_index.contains_key(item.identity()))
        .map(|(index, _)| index)
        .collect();
    let inserts: Vec<usize> = new
        .iter()
        .enumerate()
        .filter(|(_, item)| !old_index.contains_key(item.identity()))
        .map(|(index, _)| index)
        .collect();

    // Retained items in old order, paired with their new positions.
    let mut retained: Vec<(usize, usize)> = Vec::new();
    let mut updates: Vec<Update> = Vec::new();
    for (old_pos, item) in old.iter().enumerate() {
        if let Some(&new_pos) = new_index.get(item.identity()) {
            retained.push((old_pos, new_pos));
            if let Some(counterpart) = new.get(new_pos) {
                if !item.content_eq(counterpart) {
                    updates.push(Update {
                        from: old_pos,
                        to: new_pos,
                    });
                }
            }
        }
    }

    let new_positions: Vec<usize> = retained.iter().map(|&(_, new_pos)| new_pos).collect();
    let keep = increasing_run_membership(&new_positions);
    let mut moves: Vec<Move> = retained
        .iter()
        .zip(keep.iter().copied())
        .filter(|&(_, kept)| !kept)
        .map(|(&(from, to), _)| Move { from, to })
        .collect();
    moves.sort_unstable_by_key(|mv| mv.to);

    ListDiff {
        deletes,
        inserts,
        moves,
        updates,
    }
}

/// Marks the members of one longest strictly-increasing subsequence.
///
/// Patience algorithm: `tails` holds, per run length, the input index of
/// the smallest tail value; `parents` chains each element back to the
/// tail it extended, so the winning run can be walked from its last
/// element.
fn increasing_run_membership(values: &[usize]) -> Vec<bool> {
    let mut tails: Vec<usize> = Vec::new();
    let mut parents: Vec<Option<usize>> = Vec::with_capacity(values.len());
    for (index, &value) in values.iter().enumerate() {
        let rank = tails.partition_point(|&tail| {
            values.get(tail).copied().is_some_and(|tail_value| tail_value < value)
        });
        parents.push(rank.checked_sub(1).and_then(|prev| tails.get(prev).copied()));
        if rank == tails.len() {
            tails.push(index);
        } else if let Some(slot) = tails.get_mut(rank) {
            *slot = index;
        }
    }

    let mut member = vec![false; values.len()];
    let mut cursor = tails.last().copied();
    while let Some(index) = cursor {
        if let Some(flag) = member.get_mut(index) {
            *flag = true;
        }
        cursor = parents.get(index).copied().flatten();
    }
    member
}

/// Materializes the edit script, turning `old` into the returned list.
///
/// Applies the script in its documented order: deletions empty their
/// old slots, insertions and moves claim their target positions, items
/// that neither moved nor vanished fill the remaining positions in
/// their original relative order, and updates replace content last.
/// With a script produced by [`diff`] over the same two lists, the
/// result equals `new` in content and order.
#[must_use]
pub fn apply<T: Reconcilable + Clone>(old: &[T], new: &[T], script: &ListDiff) -> Vec<T> {
    let deleted: HashSet<usize> = script.deletes.iter().copied().collect();
    let moved: HashSet<usize> = script.moves.iter().map(|mv| mv.from).collect();

    let mut slots: Vec<Option<T>> = Vec::new();
    slots.resize_with(new.len(), || None);
    for &index in &script.inserts {
        if let (Some(slot), Some(item)) = (slots.get_mut(index), new.get(index)) {
            *slot = Some(item.clone());
        }
    }
    for mv in &script.moves {
        if let (Some(slot), Some(item)) = (slots.get_mut(mv.to), old.get(mv.from)) {
            *slot = Some(item.clone());
        }
    }

    let mut stayed = old
        .iter()
        .enumerate()
        .filter(|(index, _)| !deleted.contains(index) && !moved.contains(index))
        .map(|(_, item)| item);
    let mut result: Vec<T> = Vec::with_capacity(new.len());
    for slot in slots {
        match slot {
            Some(item) => result.push(item),
            None => {
                if let Some(item) = stayed.next() {
                    result.push(item.clone());
                }
            }
        }
    }

    for update in &script.updates {
        if let (Some(slot), Some(item)) = (result.get_mut(update.to), new.get(update.to)) {
            *slot = item.clone();
        }
    }
    result
}

impl Reconcilable for Transaction {
    #[inline]
    fn identity(&self) -> &str {
        self.id.as_inner()
    }

    #[inline]
    fn content_eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes && self.relationships == other.relationships
    }
}

impl Reconcilable for Account {
    #[inline]
    fn identity(&self) -> &str {
        self.id.as_inner()
    }

    #[inline]
    fn content_eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes
    }
}

impl Reconcilable for Category {
    #[inline]
    fn identity(&self) -> &str {
        self.id.as_inner()
    }

    #[inline]
    fn content_eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes
    }
}

impl Reconcilable for Tag {
    #[inline]
    fn identity(&self) -> &str {
        self.id.as_inner()
    }

    #[inline]
    fn content_eq(&self, _other: &Self) -> bool {
        // A tag's identity is its entire content.
        true
    }
}

impl Reconcilable for Webhook {
    #[inline]
    fn identity(&self) -> &str {
        self.id.as_inner()
    }

    #[inline]
    fn content_eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes
    }
}
