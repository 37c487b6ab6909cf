//! Visible window calculation.
//!
//! The window is the index range near enough to the viewport to deserve a
//! materialized representation: every slot intersecting the viewport, plus
//! a pre-fetch margin of one slot on each side so scrolling by exactly one
//! row never shows an unloaded item.
//!
//! The viewport is the half-open interval `[offset, offset + height)`: a slot
//! whose top edge sits exactly on the bottom edge is off-screen.

use super::layout::SlotLayout;
use super::types::{ItemIndex, LayoutOffset};
use std::ops::Range;

/// Result of a window calculation.
///
/// # Invariants
/// - `expanded` contains `visible`
/// - both ranges lie within `0..item_count`
/// - both are empty only when the list is empty
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibleWindow {
    visible: Range<usize>,
    expanded: Range<usize>,
}

impl VisibleWindow {
    /// Window of an empty list.
    pub const EMPTY: Self = Self {
        visible: 0..0,
        expanded: 0..0,
    };

    /// Slots intersecting the viewport (end exclusive).
    pub fn visible(&self) -> Range<usize> {
        self.visible.clone()
    }

    /// Visible slots plus margin (end exclusive).
    pub fn expanded(&self) -> Range<usize> {
        self.expanded.clone()
    }

    /// Inclusive `[first, last]` of the expanded window.
    pub fn expanded_bounds(&self) -> Option<(ItemIndex, ItemIndex)> {
        inclusive(&self.expanded)
    }

    /// Inclusive `[first, last]` of the visible slots.
    pub fn visible_bounds(&self) -> Option<(ItemIndex, ItemIndex)> {
        inclusive(&self.visible)
    }

    /// Whether `index` lies in the expanded window.
    pub fn contains(&self, index: ItemIndex) -> bool {
        self.expanded.contains(&index.get())
    }

    /// Whether `index` intersects the unexpanded viewport.
    pub fn is_visible(&self, index: ItemIndex) -> bool {
        self.visible.contains(&index.get())
    }

    /// Number of slots in the expanded window.
    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    /// True for the window of an empty list.
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Iterate expanded-window indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = ItemIndex> {
        self.expanded.clone().map(ItemIndex::new)
    }
}

fn inclusive(range: &Range<usize>) -> Option<(ItemIndex, ItemIndex)> {
    (!range.is_empty()).then(|| (ItemIndex::new(range.start), ItemIndex::new(range.end - 1)))
}

/// Computes [`VisibleWindow`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCalculator {
    margin: usize,
}

impl Default for WindowCalculator {
    fn default() -> Self {
        Self { margin: 1 }
    }
}

impl WindowCalculator {
    /// Calculator with a custom pre-fetch margin (in slots).
    pub fn with_margin(margin: usize) -> Self {
        Self { margin }
    }

    /// Pre-fetch margin in slots.
    pub fn margin(&self) -> usize {
        self.margin
    }

    /// Window for uniform-height slots, by arithmetic.
    pub fn compute_uniform(
        &self,
        scroll_offset: LayoutOffset,
        viewport_height: u32,
        item_height: u32,
        item_count: usize,
    ) -> VisibleWindow {
        self.compute(
            scroll_offset,
            viewport_height,
            &SlotLayout::uniform(item_height),
            item_count,
        )
    }

    /// Window for any slot layout.
    ///
    /// Uniform layouts divide; measured layouts search the slot rectangles.
    /// Both clamp to `[0, item_count - 1]` before adding the margin.
    pub fn compute(
        &self,
        scroll_offset: LayoutOffset,
        viewport_height: u32,
        layout: &SlotLayout,
        item_count: usize,
    ) -> VisibleWindow {
        let Some(first) = layout.slot_at(scroll_offset, item_count) else {
            return VisibleWindow::EMPTY;
        };
        let last = match viewport_height.checked_sub(1) {
            Some(extent) => {
                let bottom_row = LayoutOffset::new(scroll_offset.get() + u64::from(extent));
                layout
                    .slot_at(bottom_row, item_count)
                    .unwrap_or(first)
                    .max(first)
            }
            None => first,
        };

        let last_index = item_count - 1;
        let expanded_start = first.get().saturating_sub(self.margin);
        let expanded_end = last.get().saturating_add(self.margin).min(last_index);

        VisibleWindow {
            visible: first.get()..last.get() + 1,
            expanded: expanded_start..expanded_end + 1,
        }
    }
}
