//! Materialization: which slots own a visual representation, and how complete it is.
//!
//! A pass evicts every representation outside the expanded window, creates
//! stubs for window slots that have none, and promotes stubs to fully loaded
//! in ascending index order until the pass budget runs out.
//!
//! # Invariants
//! - `reps.len()` equals the item count of the ordered index it mirrors.
//! - `loaded` is exactly the set of slots whose representation is fully loaded.
//! - `materialized` is exactly the set of slots holding any representation.
//! - Eviction is never budgeted.

use super::budget::RenderBudget;
use super::content::{AvatarImage, AvatarSlot, ContentResolver, ResolvedContent};
use super::ordered_index::OrderedIndex;
use super::types::ItemIndex;
use super::window::VisibleWindow;
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Default number of slots promoted synchronously on bulk load.
pub const INITIAL_EAGER_LOADS: usize = 15;

/// Lifecycle state of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepresentationState {
    /// No representation exists; only the slot's position and height do.
    Absent,
    /// Placeholder occupying the slot, content unresolved.
    Stub,
    /// Every display field resolved.
    FullyLoaded,
}

/// Per-slot visual representation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisualRepresentation {
    content: Option<ResolvedContent>,
    selected: bool,
}

impl VisualRepresentation {
    /// Stub or fully loaded, depending on whether content is resolved.
    pub fn state(&self) -> RepresentationState {
        if self.content.is_some() {
            RepresentationState::FullyLoaded
        } else {
            RepresentationState::Stub
        }
    }

    /// Resolved content; `None` for stubs.
    pub fn content(&self) -> Option<&ResolvedContent> {
        self.content.as_ref()
    }

    /// Whether this slot is the user's selection.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    fn is_loaded(&self) -> bool {
        self.content.is_some()
    }
}

/// Outcome of one materialization pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PassReport {
    /// Window the pass ran against.
    pub window: VisibleWindow,
    /// Slots promoted to fully loaded.
    pub promoted: usize,
    /// Representations destroyed because they left the window.
    pub evicted: usize,
    /// In-window slots left as stubs because the budget ran out.
    pub deferred: usize,
    /// Whether the fast-scroll budget applied.
    pub fast_scrolling: bool,
}

impl PassReport {
    /// Whether the window is fully loaded after this pass.
    pub fn is_converged(&self) -> bool {
        self.deferred == 0
    }
}

/// Owns every [`VisualRepresentation`] and the loaded set.
#[derive(Debug)]
pub struct MaterializationController {
    reps: Vec<Option<VisualRepresentation>>,
    loaded: BTreeSet<usize>,
    materialized: BTreeSet<usize>,
    selected: Option<usize>,
    resolver: ContentResolver,
    budget: RenderBudget,
    initial_eager_loads: usize,
}

impl MaterializationController {
    /// Create a controller with no slots.
    pub fn new(
        resolver: ContentResolver,
        budget: RenderBudget,
        initial_eager_loads: usize,
    ) -> Self {
        Self {
            reps: Vec::new(),
            loaded: BTreeSet::new(),
            materialized: BTreeSet::new(),
            selected: None,
            resolver,
            budget,
            initial_eager_loads,
        }
    }

    /// Budget policy in use.
    pub fn budget(&self) -> RenderBudget {
        self.budget
    }

    /// Drop every representation and the selection, and size for `count` slots.
    pub fn reset(&mut self, count: usize) {
        self.reps.clear();
        self.reps.resize(count, None);
        self.loaded.clear();
        self.materialized.clear();
        self.selected = None;
    }

    /// Promote the first `min(initial_eager_loads, count)` slots, ignoring budget and window.
    ///
    /// Returns how many slots were promoted.
    pub fn eager_load(&mut self, index: &OrderedIndex) -> usize {
        let count = self.initial_eager_loads.min(index.count());
        let promoted = (0..count).filter(|&at| self.promote(at, index)).count();
        debug!(promoted, "Eager initial load");
        promoted
    }

    /// Run one pass against `window`.
    pub fn pass(
        &mut self,
        window: &VisibleWindow,
        index: &OrderedIndex,
        is_fast_scrolling: bool,
    ) -> PassReport {
        let expanded = window.expanded();

        let outside: Vec<usize> = self
            .materialized
            .range(..expanded.start)
            .chain(self.materialized.range(expanded.end..))
            .copied()
            .collect();
        for &at in &outside {
            self.destroy(at);
        }

        let max_loads = self.budget.max_loads_per_pass(is_fast_scrolling);
        let mut promoted = 0;
        let mut deferred = 0;
        for at in expanded {
            self.ensure_stub(at);
            if self.loaded.contains(&at) {
                continue;
            }
            if promoted < max_loads {
                if self.promote(at, index) {
                    promoted += 1;
                }
            } else {
                deferred += 1;
            }
        }

        let report = PassReport {
            window: window.clone(),
            promoted,
            evicted: outside.len(),
            deferred,
            fast_scrolling: is_fast_scrolling,
        };
        debug!(
            first = ?window.expanded_bounds().map(|(a, _)| a.get()),
            last = ?window.expanded_bounds().map(|(_, b)| b.get()),
            promoted = report.promoted,
            evicted = report.evicted,
            deferred = report.deferred,
            fast = is_fast_scrolling,
            loaded = self.loaded.len(),
            "Materialization pass"
        );
        report
    }

    /// A slot was inserted at `at`; later slots shift up.
    ///
    /// When `on_screen` is set the new slot is promoted immediately.
    pub fn on_inserted(&mut self, at: ItemIndex, on_screen: bool, index: &OrderedIndex) {
        let at = at.get();
        if at > self.reps.len() {
            return;
        }
        self.reps.insert(at, None);
        shift_up(&mut self.loaded, at);
        shift_up(&mut self.materialized, at);
        if let Some(selected) = self.selected.as_mut() {
            if *selected >= at {
                *selected += 1;
            }
        }
        if on_screen {
            self.promote(at, index);
        }
    }

    /// The slot at `at` was removed; later slots shift down.
    pub fn on_removed(&mut self, at: ItemIndex) {
        let at = at.get();
        if at >= self.reps.len() {
            return;
        }
        self.reps.remove(at);
        shift_down(&mut self.loaded, at);
        shift_down(&mut self.materialized, at);
        self.selected = match self.selected {
            Some(selected) if selected == at => None,
            Some(selected) if selected > at => Some(selected - 1),
            other => other,
        };
    }

    /// Re-resolve the content of `at` if it is fully loaded.
    pub fn refresh(&mut self, at: ItemIndex, index: &OrderedIndex) {
        if self.loaded.contains(&at.get()) {
            self.promote(at.get(), index);
        }
    }

    /// Promote `at` now, outside any pass.
    pub fn promote_now(&mut self, at: ItemIndex, index: &OrderedIndex) -> bool {
        self.promote(at.get(), index)
    }

    /// Move the selection to `at` (or clear it) and promote the new selection.
    ///
    /// The previous selection keeps its representation.
    pub fn select(&mut self, at: Option<ItemIndex>, index: &OrderedIndex) {
        let at = at.map(|i| i.get()).filter(|&i| i < index.count());
        if let Some(previous) = self.selected.take() {
            if let Some(Some(rep)) = self.reps.get_mut(previous) {
                rep.selected = false;
            }
        }
        self.selected = at;
        if let Some(at) = at {
            self.promote(at, index);
        }
    }

    /// Currently selected slot.
    pub fn selection(&self) -> Option<ItemIndex> {
        self.selected.map(ItemIndex::new)
    }

    /// Fill pending avatars of loaded slots that reference `avatar_ref`.
    ///
    /// Returns how many representations changed.
    pub fn deliver_avatar(
        &mut self,
        avatar_ref: &str,
        image: &AvatarImage,
        index: &OrderedIndex,
    ) -> usize {
        let mut filled = 0;
        for &at in &self.loaded {
            let matches = index
                .summary(ItemIndex::new(at))
                .is_some_and(|s| s.avatar_ref == avatar_ref);
            if !matches {
                continue;
            }
            if let Some(Some(rep)) = self.reps.get_mut(at) {
                if let Some(content) = rep.content.as_mut() {
                    if content.avatar == AvatarSlot::Pending {
                        content.avatar = AvatarSlot::Ready(image.clone());
                        filled += 1;
                    }
                }
            }
        }
        trace!(avatar_ref, filled, "Avatar delivered");
        filled
    }

    /// State of slot `at`; out-of-range slots are `Absent`.
    pub fn state_of(&self, at: ItemIndex) -> RepresentationState {
        match self.reps.get(at.get()) {
            Some(Some(rep)) => rep.state(),
            _ => RepresentationState::Absent,
        }
    }

    /// Representation of slot `at`, if any.
    pub fn representation(&self, at: ItemIndex) -> Option<&VisualRepresentation> {
        self.reps.get(at.get()).and_then(Option::as_ref)
    }

    /// Indices currently fully loaded, ascending.
    pub fn loaded_set(&self) -> &BTreeSet<usize> {
        &self.loaded
    }

    /// Fully loaded representations, ascending.
    pub fn loaded(&self) -> impl Iterator<Item = (ItemIndex, &VisualRepresentation)> {
        self.iter_set(&self.loaded)
    }

    /// Every representation (stubs included), ascending.
    pub fn materialized(&self) -> impl Iterator<Item = (ItemIndex, &VisualRepresentation)> {
        self.iter_set(&self.materialized)
    }

    /// Number of representations of any kind.
    pub fn materialized_count(&self) -> usize {
        self.materialized.len()
    }

    fn iter_set<'a>(
        &'a self,
        set: &'a BTreeSet<usize>,
    ) -> impl Iterator<Item = (ItemIndex, &'a VisualRepresentation)> {
        set.iter().filter_map(|&at| {
            self.reps
                .get(at)
                .and_then(Option::as_ref)
                .map(|rep| (ItemIndex::new(at), rep))
        })
    }

    fn ensure_stub(&mut self, at: usize) -> bool {
        let selected = self.selected == Some(at);
        match self.reps.get_mut(at) {
            Some(slot @ None) => {
                *slot = Some(VisualRepresentation {
                    content: None,
                    selected,
                });
                self.materialized.insert(at);
                trace!(index = at, "Stub created");
                true
            }
            Some(Some(_)) => true,
            None => false,
        }
    }

    fn promote(&mut self, at: usize, index: &OrderedIndex) -> bool {
        let Some(summary) = index.summary(ItemIndex::new(at)) else {
            return false;
        };
        if !self.ensure_stub(at) {
            return false;
        }
        let content = self.resolver.resolve(summary);
        let selected = self.selected == Some(at);
        if let Some(Some(rep)) = self.reps.get_mut(at) {
            rep.content = Some(content);
            rep.selected = selected;
        }
        self.loaded.insert(at);
        trace!(index = at, id = %summary.id, "Promoted");
        true
    }

    fn destroy(&mut self, at: usize) {
        if let Some(slot) = self.reps.get_mut(at) {
            if let Some(rep) = slot.take() {
                trace!(index = at, loaded = rep.is_loaded(), "Evicted");
            }
        }
        self.loaded.remove(&at);
        self.materialized.remove(&at);
    }
}

fn shift_up(set: &mut BTreeSet<usize>, from: usize) {
    let tail = set.split_off(&from);
    set.extend(tail.into_iter().map(|i| i + 1));
}

fn shift_down(set: &mut BTreeSet<usize>, removed: usize) {
    let mut tail = set.split_off(&removed);
    tail.remove(&removed);
    set.extend(tail.into_iter().map(|i| i - 1));
}
