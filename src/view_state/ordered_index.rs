//! Recency-ordered conversation storage.
//!
//! # Invariants
//! - Summaries are sorted by `last_message_time`, newest first.
//! - Ties keep their arrival order (bulk loads use a stable sort).
//! - Every stored summary is valid.
//! - No two stored summaries share an id.

use super::types::ItemIndex;
use crate::model::{ConversationId, ConversationSummary};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, trace, warn};

/// What an [`OrderedIndex::update`] did to the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Recency unchanged; the record was replaced at the same position.
    InPlace(ItemIndex),
    /// Recency changed; the record was removed and reinserted.
    Moved {
        /// Position before the update.
        from: ItemIndex,
        /// Position after reinsertion.
        to: ItemIndex,
    },
    /// The replacement was invalid; the slot was removed.
    Removed(ItemIndex),
    /// Stale index or conflicting id; nothing changed.
    Ignored,
}

/// Conversation summaries sorted by recency.
#[derive(Debug, Clone, Default)]
pub struct OrderedIndex {
    items: Vec<ConversationSummary>,
    ids: HashSet<ConversationId>,
}

impl OrderedIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole contents.
    ///
    /// Invalid records are dropped. When an id repeats, the first occurrence
    /// in `items` wins.
    pub fn load(&mut self, items: impl IntoIterator<Item = ConversationSummary>) {
        self.items.clear();
        self.ids.clear();

        let mut rejected = 0usize;
        for item in items {
            if !item.is_valid() || !self.ids.insert(item.id) {
                rejected += 1;
                continue;
            }
            self.items.push(item);
        }

        // Stable: equal times keep input order.
        self.items
            .sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));

        debug!(count = self.items.len(), rejected, "Ordered index loaded");
    }

    /// Position a record with time `time` would be inserted at: the first
    /// slot whose time is not newer than `time`.
    pub fn insertion_point(&self, time: DateTime<Utc>) -> ItemIndex {
        ItemIndex::new(
            self.items
                .partition_point(|existing| existing.last_message_time > time),
        )
    }

    /// Insert a record at its recency position.
    ///
    /// Returns the new position, or `None` if the record is invalid or its id
    /// is already present.
    pub fn insert(&mut self, item: ConversationSummary) -> Option<ItemIndex> {
        if !item.is_valid() {
            trace!(id = %item.id, "Rejected invalid summary");
            return None;
        }
        if self.ids.contains(&item.id) {
            warn!(id = %item.id, "Rejected duplicate conversation id");
            return None;
        }

        let position = self.insertion_point(item.last_message_time);
        self.ids.insert(item.id);
        self.items.insert(position.get(), item);
        Some(position)
    }

    /// Replace the record at `index`.
    ///
    /// A content-only edit is replaced in place. An edit that changes recency
    /// is applied as remove followed by insert, since the order may no longer
    /// hold.
    pub fn update(&mut self, index: ItemIndex, item: ConversationSummary) -> UpdateOutcome {
        let Some(current) = self.items.get(index.get()) else {
            return UpdateOutcome::Ignored;
        };

        if item.id != current.id && self.ids.contains(&item.id) {
            warn!(id = %item.id, "Update would duplicate an existing id");
            return UpdateOutcome::Ignored;
        }

        if !item.is_valid() {
            self.remove(index);
            return UpdateOutcome::Removed(index);
        }

        if item.last_message_time == current.last_message_time {
            let old_id = current.id;
            self.ids.remove(&old_id);
            self.ids.insert(item.id);
            self.items[index.get()] = item;
            return UpdateOutcome::InPlace(index);
        }

        self.remove(index);
        match self.insert(item) {
            Some(to) => UpdateOutcome::Moved { from: index, to },
            // Unreachable in practice: validity and id were checked above.
            None => UpdateOutcome::Removed(index),
        }
    }

    /// Remove the record at `index`; later positions shift down by one.
    ///
    /// Out-of-range indices are ignored.
    pub fn remove(&mut self, index: ItemIndex) -> Option<ConversationSummary> {
        if index.get() >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index.get());
        self.ids.remove(&removed.id);
        Some(removed)
    }

    /// Record at `index`, or a default (invalid, empty) record when out of range.
    pub fn get(&self, index: ItemIndex) -> ConversationSummary {
        self.summary(index).cloned().unwrap_or_default()
    }

    /// Borrow the record at `index`.
    pub fn summary(&self, index: ItemIndex) -> Option<&ConversationSummary> {
        self.items.get(index.get())
    }

    /// Number of records.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Whether the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All records, newest first.
    pub fn all(&self) -> &[ConversationSummary] {
        &self.items
    }

    /// Whether a record with `id` is present.
    pub fn contains(&self, id: ConversationId) -> bool {
        self.ids.contains(&id)
    }

    /// Current position of the record with `id`. O(n).
    pub fn position_of(&self, id: ConversationId) -> Option<ItemIndex> {
        if !self.ids.contains(&id) {
            return None;
        }
        self.items
            .iter()
            .position(|item| item.id == id)
            .map(ItemIndex::new)
    }
}
