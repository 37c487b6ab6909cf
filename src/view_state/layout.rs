//! Slot geometry: where each list position sits vertically.
//!
//! Two strategies share one interface:
//! - `Uniform`: every slot has the same height; positions are arithmetic.
//! - `Measured`: heights are reported by the rendering collaborator after
//!   measurement; unmeasured slots use the estimate. Backed by [`HeightIndex`].

use super::height_index::HeightIndex;
use super::types::{ItemIndex, LayoutOffset};

/// Vertical extent of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRect {
    /// Offset of the top edge.
    pub top: LayoutOffset,
    /// Height in layout units.
    pub height: u64,
}

impl SlotRect {
    /// Offset just past the bottom edge.
    pub fn bottom(&self) -> LayoutOffset {
        LayoutOffset::new(self.top.get() + self.height)
    }
}

/// Slot geometry for the whole list.
#[derive(Debug, Clone)]
pub struct SlotLayout {
    item_height: u64,
    measured: Option<HeightIndex>,
}

impl SlotLayout {
    /// All slots share `item_height`.
    pub fn uniform(item_height: u32) -> Self {
        Self {
            item_height: u64::from(item_height.max(1)),
            measured: None,
        }
    }

    /// Slots start at `estimated_height` and may be resized with [`set_height`](Self::set_height).
    pub fn measured(estimated_height: u32) -> Self {
        Self {
            item_height: u64::from(estimated_height.max(1)),
            measured: Some(HeightIndex::new(0)),
        }
    }

    /// Uniform height, or the estimate used for unmeasured slots.
    pub fn item_height(&self) -> u64 {
        self.item_height
    }

    /// Whether heights come from measurement.
    pub fn is_measured(&self) -> bool {
        self.measured.is_some()
    }

    /// Forget all measurements and size for `count` slots.
    pub fn reset(&mut self, count: usize) {
        if let Some(heights) = &mut self.measured {
            *heights = HeightIndex::uniform(count, self.item_height);
        }
    }

    /// A slot was inserted at `index`.
    pub fn on_inserted(&mut self, index: ItemIndex) {
        if let Some(heights) = &mut self.measured {
            let at = index.get().min(heights.len());
            heights.insert(at, self.item_height);
        }
    }

    /// The slot at `index` was removed.
    pub fn on_removed(&mut self, index: ItemIndex) {
        if let Some(heights) = &mut self.measured {
            if index.get() < heights.len() {
                heights.remove(index.get());
            }
        }
    }

    /// Record a measured height. Returns whether anything changed.
    ///
    /// Uniform layouts ignore measurements.
    pub fn set_height(&mut self, index: ItemIndex, height: u32) -> bool {
        match &mut self.measured {
            Some(heights) if index.get() < heights.len() => {
                let height = u64::from(height);
                if heights.height(index.get()) == height {
                    return false;
                }
                heights.set(index.get(), height);
                true
            }
            _ => false,
        }
    }

    /// Total content height for `count` slots.
    pub fn total_height(&self, count: usize) -> u64 {
        match &self.measured {
            Some(heights) => heights.total(),
            None => self.item_height * count as u64,
        }
    }

    /// Rectangle of slot `index`.
    pub fn rect(&self, index: ItemIndex) -> SlotRect {
        match &self.measured {
            Some(heights) if index.get() < heights.len() => SlotRect {
                top: LayoutOffset::new(heights.top_of(index.get())),
                height: heights.height(index.get()),
            },
            Some(heights) => SlotRect {
                top: LayoutOffset::new(heights.total()),
                height: 0,
            },
            None => SlotRect {
                top: LayoutOffset::new(self.item_height * index.get() as u64),
                height: self.item_height,
            },
        }
    }

    /// Slot containing `offset`, clamped to the last slot when past the end.
    ///
    /// Returns `None` only for an empty list.
    pub fn slot_at(&self, offset: LayoutOffset, count: usize) -> Option<ItemIndex> {
        if count == 0 {
            return None;
        }
        let last = count - 1;
        let slot = match &self.measured {
            Some(heights) => heights.lower_bound(offset.get()).unwrap_or(last),
            None => usize::try_from(offset.get() / self.item_height).unwrap_or(usize::MAX),
        };
        Some(ItemIndex::new(slot.min(last)))
    }
}
