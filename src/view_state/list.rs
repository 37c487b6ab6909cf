//! The conversation list engine.
//!
//! [`ConversationList`] ties the ordered index, slot layout, scroll state,
//! debouncer and materialization controller together behind the operations
//! the host application calls: data changes (`ingest`, `apply_upsert`,
//! `apply_remove`), user input (`scroll_by`, `resize`, `select_index`), the
//! timer (`tick`) and painting (`for_each_loaded`, `paint`).
//!
//! Everything runs on the caller's thread. Event methods take the current
//! `Instant`; the host polls [`ConversationList::time_until_pass`] and calls
//! [`ConversationList::tick`] when it elapses.

use super::budget::RenderBudget;
use super::content::{AvatarImage, AvatarResolver, Clock, ContentOptions, ContentResolver};
use super::debouncer::{DebounceConfig, ScrollDebouncer};
use super::layout::{SlotLayout, SlotRect};
use super::materialization::{
    MaterializationController, PassReport, RepresentationState, VisualRepresentation,
    INITIAL_EAGER_LOADS,
};
use super::ordered_index::{OrderedIndex, UpdateOutcome};
use super::scroll::{ScrollPosition, ScrollState};
use super::types::{ItemIndex, LayoutOffset, ViewportDimensions};
use super::window::{VisibleWindow, WindowCalculator};
use crate::model::{ConversationId, ConversationSummary, SummaryPatch};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default slot height in layout units.
pub const DEFAULT_ITEM_HEIGHT: u32 = 72;

/// Paints one row. Implemented by the host's rendering surface.
pub trait Renderer {
    /// Draw the row at `index`. Stubs have no content.
    fn paint(
        &mut self,
        index: ItemIndex,
        summary: &ConversationSummary,
        representation: &VisualRepresentation,
    );
}

/// Engine tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Slot height (or the estimate for unmeasured slots).
    pub item_height: u32,
    /// Whether slot heights are measured per item.
    pub measured_heights: bool,
    /// Pre-fetch margin in slots on each side of the viewport.
    pub window_margin: usize,
    /// Promotions per pass.
    pub budget: RenderBudget,
    /// Slots promoted synchronously on bulk load.
    pub initial_eager_loads: usize,
    /// Debounce timing and fast-scroll thresholds.
    pub debounce: DebounceConfig,
    /// Elision widths.
    pub content: ContentOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            item_height: DEFAULT_ITEM_HEIGHT,
            measured_heights: false,
            window_margin: 1,
            budget: RenderBudget::default(),
            initial_eager_loads: INITIAL_EAGER_LOADS,
            debounce: DebounceConfig::default(),
            content: ContentOptions::default(),
        }
    }
}

/// Lazily materialized, recency-ordered conversation list.
#[derive(Debug)]
pub struct ConversationList {
    index: OrderedIndex,
    layout: SlotLayout,
    calculator: WindowCalculator,
    scroll: ScrollState,
    debouncer: ScrollDebouncer,
    controller: MaterializationController,
    last_pass: Option<PassReport>,
}

impl ConversationList {
    /// Create an empty list with the given collaborators.
    pub fn new(
        config: EngineConfig,
        viewport: ViewportDimensions,
        avatars: Box<dyn AvatarResolver>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let layout = if config.measured_heights {
            SlotLayout::measured(config.item_height)
        } else {
            SlotLayout::uniform(config.item_height)
        };
        let resolver = ContentResolver::new(config.content, avatars, clock);
        Self {
            index: OrderedIndex::new(),
            layout,
            calculator: WindowCalculator::with_margin(config.window_margin),
            scroll: ScrollState::new(viewport),
            debouncer: ScrollDebouncer::new(config.debounce),
            controller: MaterializationController::new(
                resolver,
                config.budget,
                config.initial_eager_loads,
            ),
            last_pass: None,
        }
    }

    // === Data ===

    /// Replace every conversation.
    ///
    /// Invalid records are dropped. The first screen is loaded synchronously
    /// and a pass is scheduled for the rest of the window.
    pub fn ingest(&mut self, items: impl IntoIterator<Item = ConversationSummary>, now: Instant) {
        self.index.load(items);
        let count = self.index.count();
        self.layout.reset(count);
        self.controller.reset(count);
        self.scroll.clamp(self.total_height());
        let eager = self.controller.eager_load(&self.index);
        self.debouncer.request(now);
        info!(count, eager, "Conversations ingested");
    }

    /// Insert or update the conversation `id`.
    ///
    /// For an existing id the patch is applied on top of the stored record.
    /// For a new id the patch must carry a name and a time. Returns the
    /// conversation's position afterwards, or `None` if nothing is stored.
    pub fn apply_upsert(
        &mut self,
        id: ConversationId,
        patch: SummaryPatch,
        now: Instant,
    ) -> Option<ItemIndex> {
        let position = match self.index.position_of(id) {
            Some(at) => self.update_at(at, &patch),
            None => self.insert(patch.into_summary(id)?),
        };
        self.debouncer.request(now);
        position
    }

    /// Remove the conversation `id`. Returns whether it was present.
    pub fn apply_remove(&mut self, id: ConversationId, now: Instant) -> bool {
        let Some(at) = self.index.position_of(id) else {
            return false;
        };
        self.remove_slot(at);
        self.debouncer.request(now);
        debug!(%id, index = at.get(), "Conversation removed");
        true
    }

    fn insert(&mut self, summary: ConversationSummary) -> Option<ItemIndex> {
        let at = self.index.insert(summary)?;
        self.layout.on_inserted(at);
        let on_screen = self.visible_window().is_visible(at);
        self.controller.on_inserted(at, on_screen, &self.index);
        debug!(index = at.get(), on_screen, "Conversation inserted");
        Some(at)
    }

    fn update_at(&mut self, at: ItemIndex, patch: &SummaryPatch) -> Option<ItemIndex> {
        let current = self.index.summary(at)?;
        let updated = patch.apply_to(current);
        let was_selected = self.controller.selection() == Some(at);

        match self.index.update(at, updated) {
            UpdateOutcome::InPlace(at) => {
                self.controller.refresh(at, &self.index);
                Some(at)
            }
            UpdateOutcome::Moved { from, to } => {
                self.layout.on_removed(from);
                self.controller.on_removed(from);
                self.layout.on_inserted(to);
                let on_screen = self.visible_window().is_visible(to);
                self.controller.on_inserted(to, on_screen, &self.index);
                if was_selected {
                    self.controller.select(Some(to), &self.index);
                }
                debug!(from = from.get(), to = to.get(), "Conversation moved");
                Some(to)
            }
            UpdateOutcome::Removed(at) => {
                self.layout.on_removed(at);
                self.controller.on_removed(at);
                self.scroll.clamp(self.total_height());
                None
            }
            UpdateOutcome::Ignored => Some(at),
        }
    }

    fn remove_slot(&mut self, at: ItemIndex) {
        if self.index.remove(at).is_some() {
            self.layout.on_removed(at);
            self.controller.on_removed(at);
            self.scroll.clamp(self.total_height());
        }
    }

    // === Selection ===

    /// Select the conversation at `index` and load it immediately.
    ///
    /// Out-of-range indices are ignored.
    pub fn select_index(&mut self, index: ItemIndex) {
        if index.get() < self.index.count() {
            self.controller.select(Some(index), &self.index);
        }
    }

    /// Drop the selection.
    pub fn clear_selection(&mut self) {
        self.controller.select(None, &self.index);
    }

    /// Currently selected position.
    pub fn current_selection(&self) -> Option<ItemIndex> {
        self.controller.selection()
    }

    // === Input events ===

    /// Scroll by `delta` layout units. Returns the distance actually moved.
    pub fn scroll_by(&mut self, delta: i64, now: Instant) -> i64 {
        let moved = self.scroll.scroll_by(delta, self.total_height());
        if moved != 0 {
            self.debouncer.on_scroll(moved, now);
        }
        moved
    }

    /// Jump to `position` (scrollbar drag, Home/End, programmatic scroll).
    pub fn scroll_to(&mut self, position: ScrollPosition, now: Instant) -> i64 {
        let total = self.total_height();
        let layout = &self.layout;
        let moved = self.scroll.scroll_to(position, total, |i| layout.rect(i));
        if moved != 0 {
            self.debouncer.on_scroll(moved, now);
        }
        moved
    }

    /// Scroll just enough for `index` to be fully visible.
    pub fn ensure_visible(&mut self, index: ItemIndex, now: Instant) -> i64 {
        if index.get() >= self.index.count() {
            return 0;
        }
        let moved = self.scroll.reveal(self.layout.rect(index), self.total_height());
        if moved != 0 {
            self.debouncer.on_scroll(moved, now);
        }
        moved
    }

    /// The viewport changed size.
    pub fn resize(&mut self, viewport: ViewportDimensions, now: Instant) {
        self.scroll.resize(viewport, self.total_height());
        self.debouncer.on_resize(now);
    }

    /// The rendering surface wants fresh content.
    pub fn request_repaint(&mut self, now: Instant) {
        self.debouncer.on_repaint(now);
    }

    /// Record a measured slot height. Only measured layouts honour it.
    pub fn set_item_height(&mut self, index: ItemIndex, height: u32, now: Instant) -> bool {
        let changed = self.layout.set_height(index, height);
        if changed {
            self.scroll.clamp(self.total_height());
            self.debouncer.request(now);
        }
        changed
    }

    /// Hand over an avatar that resolved asynchronously.
    pub fn deliver_avatar(&mut self, avatar_ref: &str, image: AvatarImage) -> usize {
        self.controller.deliver_avatar(avatar_ref, &image, &self.index)
    }

    // === Passes ===

    /// Run the pending pass if its debounce delay has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<PassReport> {
        let trigger = self.debouncer.poll(now)?;
        Some(self.run_pass(trigger.fast_scrolling, now))
    }

    /// Run a pass immediately, consuming any pending one.
    pub fn pass_now(&mut self, now: Instant) -> PassReport {
        let fast = self.debouncer.is_fast_scrolling();
        self.debouncer.cancel();
        self.run_pass(fast, now)
    }

    fn run_pass(&mut self, fast_scrolling: bool, now: Instant) -> PassReport {
        let window = self.visible_window();
        let report = self.controller.pass(&window, &self.index, fast_scrolling);
        self.debouncer.settle();
        if !report.is_converged() {
            self.debouncer.request(now);
        }
        self.last_pass = Some(report.clone());
        report
    }

    /// Time until the pending pass is due; `None` when nothing is scheduled.
    pub fn time_until_pass(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_fire(now)
    }

    /// Whether a pass is scheduled.
    pub fn is_pass_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Whether the next pass uses the fast-scroll budget.
    pub fn is_fast_scrolling(&self) -> bool {
        self.debouncer.is_fast_scrolling()
    }

    /// Report of the most recent pass.
    pub fn last_pass(&self) -> Option<&PassReport> {
        self.last_pass.as_ref()
    }

    // === Painting ===

    /// Visit every fully loaded row in ascending order.
    pub fn for_each_loaded<F>(&self, mut f: F)
    where
        F: FnMut(ItemIndex, &ConversationSummary, &VisualRepresentation),
    {
        for (at, rep) in self.controller.loaded() {
            if let Some(summary) = self.index.summary(at) {
                f(at, summary, rep);
            }
        }
    }

    /// Visit every row with a representation, stubs included, in ascending order.
    pub fn for_each_materialized<F>(&self, mut f: F)
    where
        F: FnMut(ItemIndex, &ConversationSummary, &VisualRepresentation),
    {
        for (at, rep) in self.controller.materialized() {
            if let Some(summary) = self.index.summary(at) {
                f(at, summary, rep);
            }
        }
    }

    /// Paint every materialized row.
    pub fn paint(&self, renderer: &mut dyn Renderer) {
        self.for_each_materialized(|at, summary, rep| renderer.paint(at, summary, rep));
    }

    // === Queries ===

    /// Number of conversations.
    pub fn count(&self) -> usize {
        self.index.count()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Conversation at `index`, or a default record when out of range.
    pub fn get(&self, index: ItemIndex) -> ConversationSummary {
        self.index.get(index)
    }

    /// Borrow the conversation at `index`.
    pub fn summary(&self, index: ItemIndex) -> Option<&ConversationSummary> {
        self.index.summary(index)
    }

    /// All conversations, newest first.
    pub fn all(&self) -> &[ConversationSummary] {
        self.index.all()
    }

    /// Position of conversation `id`.
    pub fn position_of(&self, id: ConversationId) -> Option<ItemIndex> {
        self.index.position_of(id)
    }

    /// Lifecycle state of `index`.
    pub fn state_of(&self, index: ItemIndex) -> RepresentationState {
        self.controller.state_of(index)
    }

    /// Representation of `index`, if materialized.
    pub fn representation(&self, index: ItemIndex) -> Option<&VisualRepresentation> {
        self.controller.representation(index)
    }

    /// Indices currently fully loaded.
    pub fn loaded_set(&self) -> &BTreeSet<usize> {
        self.controller.loaded_set()
    }

    /// Number of representations of any kind.
    pub fn materialized_count(&self) -> usize {
        self.controller.materialized_count()
    }

    /// Window for the current scroll offset and viewport.
    pub fn visible_window(&self) -> VisibleWindow {
        self.calculator.compute(
            self.scroll.offset(),
            self.scroll.viewport().height,
            &self.layout,
            self.index.count(),
        )
    }

    /// Current scroll offset.
    pub fn scroll_offset(&self) -> LayoutOffset {
        self.scroll.offset()
    }

    /// Current viewport.
    pub fn viewport(&self) -> ViewportDimensions {
        self.scroll.viewport()
    }

    /// Rectangle of slot `index`.
    pub fn item_rect(&self, index: ItemIndex) -> SlotRect {
        self.layout.rect(index)
    }

    /// Slot covering the absolute `offset`, if any.
    pub fn slot_at(&self, offset: LayoutOffset) -> Option<ItemIndex> {
        self.layout.slot_at(offset, self.index.count())
    }

    /// Total content height.
    pub fn total_height(&self) -> u64 {
        self.layout.total_height(self.index.count())
    }
}
